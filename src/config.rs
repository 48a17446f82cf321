//! # Configuration Logic
//!
//! CLI argument parsing and validation. All thresholds and flags are carried
//! in one immutable `Config` that is threaded through the pipeline
//! constructors; there is no process-wide mutable configuration.

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::error::{Result, SummError};

/// Per-variant summary statistics and per-population allele frequencies
/// from a VCF, streamed in a single pass.
#[derive(Parser, Debug, Clone)]
#[command(name = "vcfsumm", about, disable_version_flag = true)]
pub struct Config {
    /// Input VCF file (.vcf, .gz, or .bz2)
    #[arg(short = 'V', long = "vcf")]
    pub vcf: PathBuf,

    /// Population designation file: whitespace-separated
    /// `sampleID populationLabel` pairs, one per line
    #[arg(short = 'P', long = "pop-file")]
    pub pop_file: PathBuf,

    /// Skip one header line at the top of the population file
    #[arg(short = 'H', long = "pop-file-header")]
    pub pop_file_header: bool,

    /// Number of distinct FORMAT patterns expected in the VCF
    /// (1 = uniform FORMAT, >1 = re-check FORMAT on every record)
    #[arg(short = 'f', long = "num-formats")]
    pub num_formats: Option<usize>,

    /// FORMAT subfield delimiter
    #[arg(short = 'D', long = "format-delim", default_value = ":")]
    pub format_delim: char,

    /// Safety bound on the number of subfields in FORMAT
    #[arg(short = 'S', long = "max-format-subfields", default_value_t = 30)]
    pub max_format_subfields: usize,

    /// Minimum INFO DP value for a record to be kept
    #[arg(short = 'd', long = "min-depth", default_value_t = 2.0)]
    pub min_depth: f64,

    /// Report progress every 10,000 records
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Config {
    /// Parse CLI arguments and validate them.
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate field values and file existence.
    pub fn validate(&self) -> Result<()> {
        if !self.vcf.exists() {
            return Err(SummError::config(format!(
                "VCF file '{}' not found; check spelling and path",
                self.vcf.display()
            )));
        }
        if !self.pop_file.exists() {
            return Err(SummError::config(format!(
                "Population file '{}' not found; check spelling and path",
                self.pop_file.display()
            )));
        }
        if let Some(n) = self.num_formats {
            if n == 0 {
                return Err(SummError::config("--num-formats must be at least 1"));
            }
        }
        if self.max_format_subfields == 0 {
            return Err(SummError::config(
                "--max-format-subfields must be at least 1",
            ));
        }
        if !self.min_depth.is_finite() || self.min_depth < 0.0 {
            return Err(SummError::config(
                "--min-depth must be a non-negative number",
            ));
        }
        Ok(())
    }

    /// Declared number of FORMAT patterns, warning once when the flag was
    /// omitted and the uniform-FORMAT default is assumed.
    pub fn num_formats(&self) -> usize {
        match self.num_formats {
            Some(n) => n,
            None => {
                warn!("--num-formats not set; assuming a single uniform FORMAT");
                1
            }
        }
    }
}
