//! # Sample-Field Aggregator
//!
//! Walks every sample column of a kept record, consuming one delimited token
//! per FORMAT subfield in strict left-to-right order, and accumulates
//! per-population allele counters plus per-sample depth/quality arrays.
//!
//! All arrays are sized once from the resolved sample/population counts and
//! zeroed per record, so the hot loop performs no allocation.

use crate::data::SampleColumnMap;
use crate::error::{Result, SummError};
use crate::io::cursor::LineCursor;
use crate::stats::format::{FieldOp, FormatSchema};

/// Sentinel stored for a `.` (no-call) depth or quality value
pub const NO_CALL: i32 = -1;

/// Per-record accumulator, reset at the start of every record.
#[derive(Debug)]
pub struct AggregationState {
    /// Line-level diploid genotype class counters
    pub homo_ref: u32,
    pub het: u32,
    pub homo_alt: u32,
    /// Called alleles per population
    pub valid_alleles: Vec<u32>,
    /// ALT alleles per population
    pub alt_alleles: Vec<u32>,
    /// Per-sample read depth (`NO_CALL` for '.')
    pub depths: Vec<i32>,
    /// Per-sample genotype quality (`NO_CALL` for '.')
    pub qualities: Vec<i32>,
    /// Samples with no depth call this record
    pub depth_no_calls: usize,
    /// Samples with no quality call this record
    pub quality_no_calls: usize,
}

impl AggregationState {
    pub fn new(num_samples: usize, num_populations: usize) -> Self {
        Self {
            homo_ref: 0,
            het: 0,
            homo_alt: 0,
            valid_alleles: vec![0; num_populations],
            alt_alleles: vec![0; num_populations],
            depths: vec![0; num_samples],
            qualities: vec![0; num_samples],
            depth_no_calls: 0,
            quality_no_calls: 0,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.depths.len()
    }

    pub fn num_populations(&self) -> usize {
        self.valid_alleles.len()
    }

    /// Zero every counter and array in place.
    pub fn reset(&mut self) {
        self.homo_ref = 0;
        self.het = 0;
        self.homo_alt = 0;
        self.valid_alleles.fill(0);
        self.alt_alleles.fill(0);
        self.depths.fill(0);
        self.qualities.fill(0);
        self.depth_no_calls = 0;
        self.quality_no_calls = 0;
    }
}

/// Consume all sample columns from `cursor` per `schema`, updating `state`.
///
/// `cursor` must be positioned on the first sample column. The number of
/// columns actually present must equal the declared sample count; anything
/// else indicates file corruption and is fatal.
pub fn aggregate_samples(
    cursor: &mut LineCursor<'_>,
    schema: &FormatSchema,
    columns: &SampleColumnMap,
    state: &mut AggregationState,
    subfield_delim: char,
    line: u64,
) -> Result<()> {
    state.reset();
    let num_samples = columns.len();
    let mut sample = 0usize;

    while let Some(token) = cursor.next_column() {
        if sample >= num_samples {
            // count the excess for the diagnostic
            sample += 1 + count_columns(cursor);
            return Err(SummError::SampleCountMismatch {
                line,
                expected: num_samples,
                found: sample,
            });
        }

        let pop = columns.pop_of(sample);
        let mut subfields = LineCursor::new(token);
        for &op in schema.ops() {
            let Some(subfield) = subfields.next_field(subfield_delim) else {
                return Err(SummError::parse(
                    line,
                    format!(
                        "sample column {} has fewer subfields than FORMAT '{}' declares",
                        sample + 1,
                        schema.text()
                    ),
                ));
            };
            match op {
                FieldOp::Genotype => classify_genotype(subfield, pop, state, line)?,
                FieldOp::Depth => {
                    state.depths[sample] =
                        parse_count(subfield, line, "DP", &mut state.depth_no_calls)?;
                }
                FieldOp::Quality => {
                    state.qualities[sample] =
                        parse_count(subfield, line, "GQ", &mut state.quality_no_calls)?;
                }
                // PL triplets are consumed but carry no statistic yet
                FieldOp::Likelihood | FieldOp::Skip => {}
            }
        }
        sample += 1;
    }

    if sample != num_samples {
        return Err(SummError::SampleCountMismatch {
            line,
            expected: num_samples,
            found: sample,
        });
    }
    Ok(())
}

fn count_columns(cursor: &mut LineCursor<'_>) -> usize {
    let mut n = 0;
    while cursor.next_column().is_some() {
        n += 1;
    }
    n
}

/// Classify one diploid genotype token and update the counters.
///
/// The token must be `a1 SEP a2` with SEP one of '/', '|'. Any allele byte
/// other than '0'/'1' counts as uncalled: a fully missing genotype
/// contributes nothing, a half call contributes one valid allele (and one
/// ALT allele if the called allele is alternate).
fn classify_genotype(
    token: &str,
    pop: usize,
    state: &mut AggregationState,
    line: u64,
) -> Result<()> {
    let bytes = token.as_bytes();
    if bytes.len() < 3 || (bytes[1] != b'/' && bytes[1] != b'|') {
        return Err(SummError::MalformedGenotype {
            line,
            token: token.to_string(),
        });
    }
    let a1 = bytes[0];
    let a2 = bytes[2];

    match a1 {
        b'0' => match a2 {
            b'0' => {
                state.homo_ref += 1;
                state.valid_alleles[pop] += 2;
            }
            b'1' => {
                state.het += 1;
                state.valid_alleles[pop] += 2;
                state.alt_alleles[pop] += 1;
            }
            _ => {
                // only the first allele was called
                state.valid_alleles[pop] += 1;
            }
        },
        b'1' => match a2 {
            b'0' => {
                state.het += 1;
                state.valid_alleles[pop] += 2;
                state.alt_alleles[pop] += 1;
            }
            b'1' => {
                state.homo_alt += 1;
                state.valid_alleles[pop] += 2;
                state.alt_alleles[pop] += 2;
            }
            _ => {
                state.valid_alleles[pop] += 1;
                state.alt_alleles[pop] += 1;
            }
        },
        _ => {
            // first allele uncalled
            if a2 == b'0' || a2 == b'1' {
                state.valid_alleles[pop] += 1;
                if a2 == b'1' {
                    state.alt_alleles[pop] += 1;
                }
            }
        }
    }
    Ok(())
}

/// Parse a DP/GQ subfield: '.' records the no-call sentinel, anything else
/// must be an integer.
fn parse_count(token: &str, line: u64, what: &str, no_calls: &mut usize) -> Result<i32> {
    if token == "." {
        *no_calls += 1;
        return Ok(NO_CALL);
    }
    token
        .parse::<i32>()
        .map_err(|_| SummError::parse(line, format!("{what} token '{token}' is not an integer")))
}
