//! # Data Module
//!
//! Run-lifetime lookup structures: population registry and the mapping from
//! VCF sample columns to population indices. Built once at startup and
//! treated as immutable afterward.

pub mod population;

pub use population::{PopIdx, PopulationRegistry, SampleColumnMap};
