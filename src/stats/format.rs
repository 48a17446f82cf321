//! # FORMAT Schema Cache
//!
//! Parses the VCF FORMAT column into an ordered sequence of operation codes
//! and caches the result. GT is mandatory; DP, GQ, and PL degrade to a
//! missing-data sentinel downstream when absent, with a single warning.
//!
//! Cache policy: with a declared uniform FORMAT the schema is parsed once
//! from the first record. When the caller declares multiple FORMAT patterns
//! the text is re-examined on every record, re-parsing only when it differs
//! from the cached text.

use tracing::warn;

use crate::error::{Result, SummError};
use crate::io::cursor::LineCursor;

/// Operation to perform on one FORMAT subfield of every sample token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// GT: diploid genotype, drives allele and genotype-class counters
    Genotype,
    /// DP: per-sample read depth
    Depth,
    /// GQ: per-sample genotype quality
    Quality,
    /// PL: phred-scaled likelihood triplet, consumed but unused
    Likelihood,
    /// Unrecognized subfield, consumed and discarded
    Skip,
}

/// Ordered operation codes for one FORMAT pattern.
#[derive(Debug, Clone)]
pub struct FormatSchema {
    text: String,
    ops: Vec<FieldOp>,
    has_depth: bool,
    has_quality: bool,
    has_likelihood: bool,
}

impl FormatSchema {
    /// Operation codes, one per FORMAT subfield, in subfield order.
    pub fn ops(&self) -> &[FieldOp] {
        &self.ops
    }

    /// Whether the DP subfield is present (medianDP computable).
    pub fn has_depth(&self) -> bool {
        self.has_depth
    }

    /// Whether the GQ subfield is present (medianGQ computable).
    pub fn has_quality(&self) -> bool {
        self.has_quality
    }

    /// Whether the PL subfield is present.
    pub fn has_likelihood(&self) -> bool {
        self.has_likelihood
    }

    /// The FORMAT text this schema was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Caching parser for FORMAT columns.
#[derive(Debug)]
pub struct FormatSchemaCache {
    delim: char,
    max_subfields: usize,
    /// Re-examine FORMAT text on every record (declared multi-FORMAT file)
    recheck: bool,
    schema: Option<FormatSchema>,
    warned_depth: bool,
    warned_quality: bool,
    warned_likelihood: bool,
}

impl FormatSchemaCache {
    pub fn new(delim: char, max_subfields: usize, recheck: bool) -> Self {
        Self {
            delim,
            max_subfields,
            recheck,
            schema: None,
            warned_depth: false,
            warned_quality: false,
            warned_likelihood: false,
        }
    }

    /// Schema for the given FORMAT text, reusing the cached one when valid.
    pub fn schema_for(&mut self, format_text: &str, line: u64) -> Result<&FormatSchema> {
        let reusable = match &self.schema {
            Some(cached) => !self.recheck || cached.text == format_text,
            None => false,
        };
        if !reusable {
            let schema = self.parse(format_text, line)?;
            self.schema = Some(schema);
        }
        // populated just above when it was absent
        Ok(self.schema.as_ref().unwrap())
    }

    fn parse(&mut self, format_text: &str, line: u64) -> Result<FormatSchema> {
        if format_text.is_empty() {
            return Err(SummError::parse(line, "FORMAT column is empty"));
        }

        let mut ops = Vec::new();
        let mut has_genotype = false;
        let mut has_depth = false;
        let mut has_quality = false;
        let mut has_likelihood = false;

        let mut cursor = LineCursor::new(format_text);
        while let Some(name) = cursor.next_field(self.delim) {
            let op = match name {
                "GT" => {
                    has_genotype = true;
                    FieldOp::Genotype
                }
                "DP" => {
                    has_depth = true;
                    FieldOp::Depth
                }
                "GQ" => {
                    has_quality = true;
                    FieldOp::Quality
                }
                "PL" => {
                    has_likelihood = true;
                    FieldOp::Likelihood
                }
                _ => FieldOp::Skip,
            };
            ops.push(op);
        }

        if ops.len() > self.max_subfields {
            return Err(SummError::TooManyFormatSubfields {
                found: ops.len(),
                max: self.max_subfields,
            });
        }
        if !has_genotype {
            return Err(SummError::MissingGenotypeField {
                format: format_text.to_string(),
            });
        }

        if !has_depth && !self.warned_depth {
            warn!("DP subfield not found in FORMAT; medianDP column will be NA");
            self.warned_depth = true;
        }
        if !has_quality && !self.warned_quality {
            warn!("GQ subfield not found in FORMAT; medianGQ column will be NA");
            self.warned_quality = true;
        }
        if !has_likelihood && !self.warned_likelihood {
            warn!("PL subfield not found in FORMAT; PL-dependent results would be NA");
            self.warned_likelihood = true;
        }

        Ok(FormatSchema {
            text: format_text.to_string(),
            ops,
            has_depth,
            has_quality,
            has_likelihood,
        })
    }
}
