//! # VCF Header Resolution
//!
//! Consumes the meta (`##`) and header (`#CHROM`) lines from the start of a
//! VCF stream, validates the fixed column structure, and binds every sample
//! column to its population index. After `resolve` returns, the stream
//! cursor sits on the first data record.

use std::io::BufRead;

use tracing::debug;

use crate::data::{PopulationRegistry, SampleColumnMap};
use crate::error::{Result, SummError};
use crate::io::cursor::LineCursor;

/// The nine fixed metadata columns preceding sample columns.
pub const META_COLUMNS: [&str; 9] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// Outcome of header resolution.
#[derive(Debug)]
pub struct ResolvedHeader {
    /// Population index per VCF sample column, in column order
    pub column_map: SampleColumnMap,
    /// Physical lines consumed so far (meta lines + header line)
    pub lines_consumed: u64,
    /// Expected 1-based line number of the first data record
    pub first_data_line: u64,
}

impl ResolvedHeader {
    /// Internal line-accounting guard: the pipeline's running counter must
    /// equal `first_data_line` when the first record is read. A violation is
    /// a parser bug, not a data problem.
    pub fn check_accounting(&self, current_line: u64) -> Result<()> {
        if current_line != self.first_data_line {
            return Err(SummError::StreamAccounting {
                counted: current_line,
                expected: self.first_data_line,
            });
        }
        Ok(())
    }
}

/// Resolves the VCF header against a population registry.
pub struct HeaderResolver<'a> {
    registry: &'a PopulationRegistry,
}

impl<'a> HeaderResolver<'a> {
    pub fn new(registry: &'a PopulationRegistry) -> Self {
        Self { registry }
    }

    /// Consume meta/header lines from `reader` and build the column map.
    pub fn resolve<R: BufRead + ?Sized>(&self, reader: &mut R) -> Result<ResolvedHeader> {
        let mut line = String::new();
        let mut lines_consumed: u64 = 0;

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                // only ## rows (or nothing) before EOF
                return Err(SummError::MissingHeader);
            }
            lines_consumed += 1;

            if line.starts_with("##") {
                continue;
            }
            if line.starts_with("#CHROM") {
                let column_map =
                    self.parse_header_row(line.trim_end_matches(['\n', '\r']), lines_consumed)?;
                debug!(
                    samples = column_map.len(),
                    header_line = lines_consumed,
                    "resolved VCF header"
                );
                return Ok(ResolvedHeader {
                    column_map,
                    lines_consumed,
                    first_data_line: lines_consumed + 1,
                });
            }
            return Err(SummError::MissingHeader);
        }
    }

    fn parse_header_row(&self, line: &str, line_no: u64) -> Result<SampleColumnMap> {
        let mut cursor = LineCursor::new(line);

        for expected in META_COLUMNS {
            match cursor.next_column() {
                Some(name) if name == expected => {}
                Some(name) => {
                    return Err(SummError::parse(
                        line_no,
                        format!("expected header column '{expected}', found '{name}'"),
                    ));
                }
                None => return Err(SummError::MissingHeader),
            }
        }

        let num_samples = self.registry.num_samples();
        let mut columns = Vec::with_capacity(num_samples);
        while let Some(sample) = cursor.next_column() {
            match self.registry.pop_of_sample(sample) {
                Some(idx) => columns.push(idx),
                None => {
                    return Err(SummError::UnknownSample {
                        sample: sample.to_string(),
                    });
                }
            }
        }

        if columns.len() != num_samples {
            return Err(SummError::parse(
                line_no,
                format!(
                    "VCF header has {} sample columns but the population file \
                     declares {num_samples}",
                    columns.len()
                ),
            ));
        }

        Ok(SampleColumnMap::new(columns))
    }
}
