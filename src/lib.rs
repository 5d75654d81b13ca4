//! # NetSentry Core
//!
//! Network intrusion detection ensemble engine. Classifies traffic records
//! into one of five categories (normal, DoS, Probe, R2L, U2R) by combining
//! the predictions of multiple independently-trained classifiers into one
//! verdict with an agreement confidence score.
//!
//! ## Architecture
//!
//! ```text
//! Traffic Records → Feature Codec → Ensemble Aggregator → Verdicts
//!                                        ↑
//!                                Classifier Registry
//! ```
//!
//! - [`features`] - raw records → fixed-width numeric feature matrix
//!   (normalization, one-hot encoding, layout versioning)
//! - [`model`] - classifier artifacts behind a uniform capability trait,
//!   owned by a degraded-mode-tolerant registry
//! - [`ensemble`] - hard/soft voting and agreement confidence
//! - [`analysis`] - the thin orchestrator tying it together
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use netsentry_core::{Registry, TrafficAnalyzer};
//!
//! let mut paths = BTreeMap::new();
//! paths.insert("random_forest".to_string(), "models/rf.onnx".into());
//! paths.insert("linear".to_string(), "models/linear.json".into());
//!
//! // Models that fail to load degrade the ensemble instead of aborting
//! let registry = Arc::new(Registry::load(&paths));
//! let analyzer = TrafficAnalyzer::new(registry);
//!
//! let records = vec![]; // field name → value maps, one per observation
//! let report = analyzer.analyze(&records)?;
//! for detection in &report.results {
//!     println!("{}: {} ({:.0}% agreement)",
//!         detection.source_ip,
//!         detection.attack_type,
//!         detection.confidence * 100.0);
//! }
//! # Ok::<(), netsentry_core::DetectionError>(())
//! ```

#![warn(clippy::all)]

pub mod analysis;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod model;
pub mod taxonomy;

// Re-export main types
pub use analysis::{AnalysisReport, AnalysisSummary, Detection, TrafficAnalyzer};
pub use ensemble::{EnsembleAggregator, EnsembleConfig, EnsembleOutput, VotingPolicy};
pub use error::{DetectionError, DetectionResult};
pub use features::{FeatureCodec, FeatureMatrix, FeatureSpec, RawRecord};
pub use model::{Classifier, ModelInfo, Registry};
pub use taxonomy::{AttackCategory, NUM_CLASSES};
