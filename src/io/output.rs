//! # Output Writers
//!
//! The primary summary table (`<vcf>_Unfiltered_Summary.tsv`) and the side
//! audit channel listing discarded line numbers
//! (`<vcf>_discardedLineNums.txt`). Both are buffered and must be finished
//! explicitly so a clean run ends with flushed files.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix appended to the VCF path for the summary table
const SUMMARY_SUFFIX: &str = "_Unfiltered_Summary.tsv";
/// Suffix appended to the VCF path for the audit file
const AUDIT_SUFFIX: &str = "_discardedLineNums.txt";

fn derived_path(vcf: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(vcf.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Writer for the per-variant summary table.
pub struct SummaryWriter {
    out: BufWriter<File>,
    path: PathBuf,
}

impl SummaryWriter {
    /// Create the table next to the VCF and write the header row, with one
    /// frequency and one raw-allele-count column per population in
    /// canonical (alphabetical) order.
    pub fn create<'a>(
        vcf: &Path,
        population_labels: impl Iterator<Item = &'a str>,
    ) -> Result<Self> {
        let path = derived_path(vcf, SUMMARY_SUFFIX);
        let mut out = BufWriter::new(File::create(&path)?);

        write!(
            out,
            "VCFlineNum\tCHROM\tPOS\tID\tREF\tALT\tQUAL\tmedianDP\tmedianGQ\t\
             homoRefCount\thetCount\thomoAltCount"
        )?;
        for label in population_labels {
            write!(out, "\tALT_SNP_freq_{label}\trawAlleleCount_{label}")?;
        }
        writeln!(out)?;

        Ok(Self { out, path })
    }

    /// Append one pre-formatted record row (without trailing newline).
    pub fn write_row(&mut self, row: &str) -> Result<()> {
        writeln!(self.out, "{row}")?;
        Ok(())
    }

    /// Flush and return the table path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.out.flush()?;
        Ok(self.path)
    }
}

/// Writer for the discarded-record audit file.
pub struct AuditWriter {
    out: BufWriter<File>,
    path: PathBuf,
}

impl AuditWriter {
    /// Create the audit file next to the VCF and write its header.
    pub fn create(vcf: &Path) -> Result<Self> {
        let path = derived_path(vcf, AUDIT_SUFFIX);
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "VCFfileLinesNotUsed")?;
        Ok(Self { out, path })
    }

    /// Record the 1-based VCF line number of a discarded record.
    pub fn record(&mut self, line: u64) -> Result<()> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    /// Flush and return the audit file path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.out.flush()?;
        Ok(self.path)
    }
}
