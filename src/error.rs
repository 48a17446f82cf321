//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.
//!
//! Every fatal category maps to a distinct process exit code so that wrapper
//! scripts can distinguish structural problems, mapping problems, schema
//! problems, and data corruption without scraping stderr.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vcfsumm operations
#[derive(Error, Debug)]
pub enum SummError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (invalid CLI arguments)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// VCF file extension not one of .vcf/.gz/.bz2
    #[error("Unrecognized file extension on '{path}': expected .vcf, .gz, or .bz2")]
    UnsupportedExtension { path: PathBuf },

    /// No `#CHROM` header row found before data
    #[error("VCF not structured as expected: no header row starting with #CHROM")]
    MissingHeader,

    /// Internal line-accounting inconsistency (parser bug, not a data problem)
    #[error(
        "Stream accounting error: line counter {counted} does not match \
         expected first data line {expected}"
    )]
    StreamAccounting { counted: u64, expected: u64 },

    /// A VCF sample column has no entry in the population designation file
    #[error(
        "Sample '{sample}' from VCF header not found in the population file; \
         check that the population file designates samples exactly as they \
         appear in the VCF"
    )]
    UnknownSample { sample: String },

    /// The same sample ID appears twice in the population designation file
    #[error("Duplicate sample ID '{sample}' in population file")]
    DuplicateSample { sample: String },

    /// Fewer than two distinct population labels
    #[error("Found {found} population(s), but at least 2 are required")]
    InsufficientPopulations { found: usize },

    /// FORMAT column lacks the mandatory GT subfield
    #[error(
        "GT subfield not found in FORMAT '{format}'; if your VCF uses a \
         subfield delimiter other than ':', pass it with --format-delim"
    )]
    MissingGenotypeField { format: String },

    /// FORMAT declares more subfields than the configured safety bound
    #[error(
        "FORMAT has {found} subfields, above the configured maximum of {max}; \
         rerun with --max-format-subfields {found}"
    )]
    TooManyFormatSubfields { found: usize, max: usize },

    /// Genotype token not of the form `a1/a2` or `a1|a2`
    #[error("Malformed genotype token '{token}' at line {line}: expected allele, '/' or '|', allele")]
    MalformedGenotype { line: u64, token: String },

    /// Data row does not carry one token per declared sample
    #[error(
        "Line {line} has {found} sample columns but {expected} were declared; \
         this suggests uneven numbers of samples per row in the VCF"
    )]
    SampleCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Generic per-line parse errors (bad numeric token, short row, ...)
    #[error("Parse error at line {line}: {message}")]
    Parse { line: u64, message: String },
}

/// Type alias for Results using SummError
pub type Result<T> = std::result::Result<T, SummError>;

impl SummError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Process exit code for this error, one per fatal category.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Config { .. } => 1,
            Self::UnsupportedExtension { .. }
            | Self::MissingHeader
            | Self::StreamAccounting { .. } => 2,
            Self::UnknownSample { .. }
            | Self::DuplicateSample { .. }
            | Self::InsufficientPopulations { .. } => 3,
            Self::MissingGenotypeField { .. } | Self::TooManyFormatSubfields { .. } => 4,
            Self::MalformedGenotype { .. }
            | Self::SampleCountMismatch { .. }
            | Self::Parse { .. } => 5,
        }
    }
}
