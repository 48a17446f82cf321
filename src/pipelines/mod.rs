//! # Pipeline Module
//!
//! High-level orchestration: wires the registry, header resolver, filter,
//! aggregator, and reducer into one forward-only pass over the VCF stream.

pub mod summarize;

pub use summarize::{RunSummary, SummarizePipeline};
