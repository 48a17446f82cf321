//! # Statistics Reducer
//!
//! Turns one record's aggregates into the formatted output row: median
//! depth/quality, line-level genotype class counts, and per-population ALT
//! allele frequencies with raw allele counts.
//!
//! The median is computed at array level: the full per-sample array is
//! sorted ascending with the -1 no-call sentinels in place (they sort
//! first), then the element at `no_calls + (n - no_calls) / 2` is selected.
//! With zero no-calls and an even count this picks the upper-middle element;
//! no averaging is performed.

use std::fmt::Write as _;

use crate::stats::aggregate::AggregationState;
use crate::stats::format::FormatSchema;

/// Printed wherever a statistic cannot be computed
pub const MISSING: &str = "NA";

/// Median of `values` where the first `no_calls` entries after sorting are
/// the no-call sentinels. Sorts in place; callers must not rely on order
/// afterwards.
pub fn median_with_sentinels(values: &mut [i32], no_calls: usize) -> i32 {
    let spot = no_calls + (values.len() - no_calls) / 2;
    values.sort_unstable();
    values[spot]
}

/// Fixed metadata tokens of one kept record, passed through opaquely.
#[derive(Debug, Clone, Copy)]
pub struct RecordMeta<'a> {
    pub chrom: &'a str,
    pub pos: &'a str,
    pub id: &'a str,
    pub ref_allele: &'a str,
    pub alt_allele: &'a str,
    pub qual: &'a str,
}

/// Format one output row into `row`, reusing its allocation.
///
/// Columns: `VCFlineNum CHROM POS ID REF ALT QUAL medianDP medianGQ
/// homoRefCount hetCount homoAltCount` then `freq` and `rawAlleleCount` per
/// population in canonical order. Sorts the state's depth/quality arrays in
/// place; call after aggregation is complete for the record.
pub fn format_row(
    row: &mut String,
    line: u64,
    meta: RecordMeta<'_>,
    state: &mut AggregationState,
    schema: &FormatSchema,
) {
    row.clear();
    // writing to a String is infallible
    let _ = write!(
        row,
        "{line}\t{}\t{}\t{}\t{}\t{}\t{}",
        meta.chrom, meta.pos, meta.id, meta.ref_allele, meta.alt_allele, meta.qual
    );

    let num_samples = state.num_samples();

    if schema.has_depth() && state.depth_no_calls < num_samples {
        let median = median_with_sentinels(&mut state.depths, state.depth_no_calls);
        let _ = write!(row, "\t{median}");
    } else {
        let _ = write!(row, "\t{MISSING}");
    }
    if schema.has_quality() && state.quality_no_calls < num_samples {
        let median = median_with_sentinels(&mut state.qualities, state.quality_no_calls);
        let _ = write!(row, "\t{median}");
    } else {
        let _ = write!(row, "\t{MISSING}");
    }

    let _ = write!(
        row,
        "\t{}\t{}\t{}",
        state.homo_ref, state.het, state.homo_alt
    );

    for pop in 0..state.num_populations() {
        let valid = state.valid_alleles[pop];
        let freq = if valid == 0 {
            // guarded: frequency is undefined without called alleles
            f64::NAN
        } else {
            f64::from(state.alt_alleles[pop]) / f64::from(valid)
        };
        let _ = write!(row, "\t{freq}\t{valid}");
    }
}
