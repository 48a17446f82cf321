//! # I/O Module
//!
//! File reading/writing boundaries: extension-based decompression, the
//! per-line field cursor, VCF header resolution, and the two output writers
//! (summary table and discarded-line audit).

pub mod cursor;
pub mod header;
pub mod open;
pub mod output;

pub use cursor::LineCursor;
pub use header::HeaderResolver;
pub use open::open_vcf;
pub use output::{AuditWriter, SummaryWriter};
