//! # vcfsumm Library Root
//!
//! Streaming conversion of a VCF into a per-variant summary-statistics
//! table with per-population allele frequencies, in one forward-only pass.
//!
//! ## Module Structure
//! ```text
//! vcfsumm
//! ├── config     # CLI flags and validation
//! ├── data       # population registry, sample-column map
//! ├── io         # decompression, field cursor, header, output writers
//! ├── stats      # FORMAT schema, record filter, aggregation, reduction
//! └── pipelines  # single-pass orchestration
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod pipelines;
pub mod stats;

pub use config::Config;
pub use error::{Result, SummError};
pub use pipelines::{RunSummary, SummarizePipeline};
