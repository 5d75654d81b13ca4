//! Analysis Module - Orchestration
//!
//! Wires the feature codec and the ensemble aggregator into the one call
//! the process boundary uses: records in, verdict report out.

pub mod analyzer;
pub mod result;

// Re-export common types
pub use analyzer::TrafficAnalyzer;
pub use result::{AnalysisReport, AnalysisSummary, Detection};
