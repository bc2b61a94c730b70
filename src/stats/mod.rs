//! Stats module - grouped species summaries

mod aggregator;

pub use aggregator::{AggregatorError, NativenessShare, SpeciesCount, SpeciesReport};
