//! # Summarization Pipeline
//!
//! One forward-only pass: resolve the population registry and VCF header,
//! then stream data records through filter → aggregation → reduction,
//! writing kept rows to the summary table and discarded line numbers to the
//! audit file. Exactly one record is in flight at any time and its
//! aggregation state is reused in place.

use tracing::{debug, info};

use crate::config::Config;
use crate::data::PopulationRegistry;
use crate::error::{Result, SummError};
use crate::io::cursor::LineCursor;
use crate::io::header::HeaderResolver;
use crate::io::open::open_vcf;
use crate::io::output::{AuditWriter, SummaryWriter};
use crate::stats::aggregate::{aggregate_samples, AggregationState};
use crate::stats::filter::RecordFilter;
use crate::stats::format::FormatSchemaCache;
use crate::stats::reduce::{self, RecordMeta};

/// Counts and output paths from a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub records: u64,
    pub kept: u64,
    pub discarded: u64,
    pub summary_path: std::path::PathBuf,
    pub audit_path: std::path::PathBuf,
}

/// Single-pass VCF summarization driver.
pub struct SummarizePipeline {
    config: Config,
}

impl SummarizePipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the whole pipeline to completion.
    pub fn run(&mut self) -> Result<RunSummary> {
        let config = &self.config;

        let registry = PopulationRegistry::from_path(&config.pop_file, config.pop_file_header)?;
        info!(
            samples = registry.num_samples(),
            populations = registry.num_populations(),
            "population registry built"
        );

        let mut reader = open_vcf(&config.vcf)?;
        let resolved = HeaderResolver::new(&registry).resolve(reader.as_mut())?;
        let mut line_count = resolved.lines_consumed;

        let mut summary = SummaryWriter::create(&config.vcf, registry.labels())?;
        let mut audit = AuditWriter::create(&config.vcf)?;

        let num_formats = config.num_formats();
        let mut schema_cache = FormatSchemaCache::new(
            config.format_delim,
            config.max_format_subfields,
            num_formats > 1,
        );
        let mut filter = RecordFilter::new(config.min_depth);
        let mut state =
            AggregationState::new(registry.num_samples(), registry.num_populations());

        let mut line = String::new();
        let mut row = String::new();
        let mut records: u64 = 0;
        let mut kept: u64 = 0;
        let mut discarded: u64 = 0;
        let mut first_record = true;

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line_count += 1;
            if first_record {
                resolved.check_accounting(line_count)?;
                first_record = false;
            }
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if trimmed.is_empty() {
                continue;
            }
            records += 1;

            let mut cursor = LineCursor::new(trimmed);
            let (meta, info, format_text) = parse_meta_columns(&mut cursor, line_count)?;

            // schema errors surface even for records the filter would drop
            let schema = schema_cache.schema_for(format_text, line_count)?;

            if filter.keep(meta.ref_allele, meta.alt_allele, info, line_count)? {
                aggregate_samples(
                    &mut cursor,
                    schema,
                    &resolved.column_map,
                    &mut state,
                    config.format_delim,
                    line_count,
                )?;
                reduce::format_row(&mut row, line_count, meta, &mut state, schema);
                summary.write_row(&row)?;
                kept += 1;
            } else {
                audit.record(line_count)?;
                discarded += 1;
                debug!(line = line_count, "record discarded");
            }

            if config.verbose && records % 10_000 == 0 {
                info!(
                    records,
                    chrom = meta.chrom,
                    pos = meta.pos,
                    "progress"
                );
            }
        }

        let summary_path = summary.finish()?;
        let audit_path = audit.finish()?;
        info!(records, kept, discarded, "run complete");

        Ok(RunSummary {
            records,
            kept,
            discarded,
            summary_path,
            audit_path,
        })
    }
}

/// Consume the 9 fixed metadata columns, returning the opaque record tokens
/// plus the INFO and FORMAT texts. FILTER is read and ignored.
fn parse_meta_columns<'a>(
    cursor: &mut LineCursor<'a>,
    line: u64,
) -> Result<(RecordMeta<'a>, &'a str, &'a str)> {
    let mut next = |what: &str| {
        cursor.next_column().ok_or_else(|| {
            SummError::parse(line, format!("record ends before the {what} column"))
        })
    };

    let chrom = next("CHROM")?;
    let pos = next("POS")?;
    let id = next("ID")?;
    let ref_allele = next("REF")?;
    let alt_allele = next("ALT")?;
    let qual = next("QUAL")?;
    let _filter = next("FILTER")?;
    let info = next("INFO")?;
    let format_text = next("FORMAT")?;

    Ok((
        RecordMeta {
            chrom,
            pos,
            id,
            ref_allele,
            alt_allele,
            qual,
        },
        info,
        format_text,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_columns_come_back_in_order() {
        let mut cursor = LineCursor::new(
            "chr2\t555\trs9\tA\tG\t60\tPASS\tDP=12;AF=0.5\tGT:DP\t0/1:3\t1/1:4",
        );
        let (meta, info, format_text) = parse_meta_columns(&mut cursor, 10).unwrap();
        assert_eq!(meta.chrom, "chr2");
        assert_eq!(meta.pos, "555");
        assert_eq!(meta.id, "rs9");
        assert_eq!(meta.ref_allele, "A");
        assert_eq!(meta.alt_allele, "G");
        assert_eq!(meta.qual, "60");
        assert_eq!(info, "DP=12;AF=0.5");
        assert_eq!(format_text, "GT:DP");
        // sample columns are left for the aggregator
        assert_eq!(cursor.next_column(), Some("0/1:3"));
    }

    #[test]
    fn truncated_record_is_a_parse_error() {
        let mut cursor = LineCursor::new("chr2\t555\trs9\tA\tG");
        let err = parse_meta_columns(&mut cursor, 10).unwrap_err();
        assert!(matches!(err, SummError::Parse { line: 10, .. }));
    }
}
