//! # Record Filter
//!
//! Per-variant keep/discard decision, made from the fixed metadata fields
//! only: biallelic-SNP shape of REF/ALT, and an optional minimum on the
//! record-level depth extracted from the INFO field's `DP=` annotation.
//!
//! The two depth notions in a VCF do not interact here: INFO DP gates the
//! record, per-sample FORMAT DP only feeds the medianDP statistic.

use tracing::warn;

use crate::error::{Result, SummError};

/// Stateful record filter. The only state is the one-shot latch that stops
/// consulting INFO depth after the first record lacking a DP key.
#[derive(Debug)]
pub struct RecordFilter {
    min_depth: f64,
    look_for_info_depth: bool,
}

impl RecordFilter {
    pub fn new(min_depth: f64) -> Self {
        Self {
            min_depth,
            look_for_info_depth: true,
        }
    }

    /// Decide whether the record on `line` is kept.
    ///
    /// Never consumes sample-column tokens; operates on REF, ALT, and INFO
    /// alone.
    pub fn keep(&mut self, ref_allele: &str, alt_allele: &str, info: &str, line: u64) -> Result<bool> {
        let mut keep = true;

        if self.look_for_info_depth {
            match extract_info_depth(info, line)? {
                Some(depth) => {
                    if depth < self.min_depth {
                        keep = false;
                    }
                }
                None => {
                    warn!(line, "no DP key found in INFO field; skipping the record-depth check from here on");
                    self.look_for_info_depth = false;
                }
            }
        }

        if keep {
            keep = is_biallelic_snp(ref_allele, alt_allele);
        }

        Ok(keep)
    }
}

/// Only single-nucleotide, biallelic, fully-called alleles pass: one base
/// each for REF and ALT, neither starting with 'N'.
fn is_biallelic_snp(ref_allele: &str, alt_allele: &str) -> bool {
    !(ref_allele.starts_with('N')
        || alt_allele.starts_with('N')
        || ref_allele.len() != 1
        || alt_allele.len() != 1)
}

/// Extract the `DP=` value from a semicolon-delimited INFO field.
///
/// The VCF standard tolerates spaces around `=`, so `DP = 8` parses like
/// `DP=8`. A DP key with an empty value is a fatal parse error; an INFO
/// without any DP key yields `None`.
fn extract_info_depth(info: &str, line: u64) -> Result<Option<f64>> {
    for entry in info.split(';') {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        if key.trim() != "DP" {
            continue;
        }
        // a Number=R annotation could carry commas; DP never should, but
        // take the first component as the original parser did
        let value = value.trim();
        let value = value.split(',').next().unwrap_or(value).trim();
        if value.is_empty() {
            return Err(SummError::parse(
                line,
                "DP found in INFO but no value follows it",
            ));
        }
        let depth: f64 = value.parse().map_err(|_| {
            SummError::parse(line, format!("INFO DP value '{value}' is not numeric"))
        })?;
        return Ok(Some(depth));
    }
    Ok(None)
}
