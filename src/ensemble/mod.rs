//! Ensemble Module - Vote Combination Engine
//!
//! Combines the per-model predictions of the registry's classifiers into
//! one verdict per row, with an inter-model agreement confidence score.

pub mod aggregator;
pub mod voting;

// Re-export common types
pub use aggregator::{EnsembleAggregator, EnsembleConfig, EnsembleOutput};
pub use voting::VotingPolicy;
