//! # Statistics Module
//!
//! The per-record engine: FORMAT schema resolution, keep/discard filtering,
//! sample-field aggregation, and reduction to the output row.

pub mod aggregate;
pub mod filter;
pub mod format;
pub mod reduce;

pub use aggregate::AggregationState;
pub use filter::RecordFilter;
pub use format::{FieldOp, FormatSchema, FormatSchemaCache};
