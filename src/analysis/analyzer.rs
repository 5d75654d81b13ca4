//! Traffic Analyzer - Analysis Orchestrator
//!
//! Thin wiring layer: raw records → feature codec → ensemble → one verdict
//! per input row. The analyzer owns its registry and aggregator; callers
//! construct one and pass it where it is needed. No hidden globals.

use std::sync::Arc;

use serde_json::Value;

use super::result::{AnalysisReport, AnalysisSummary, Detection};
use crate::ensemble::{EnsembleAggregator, EnsembleConfig};
use crate::error::DetectionError;
use crate::features::{FeatureCodec, FeatureSpec, RawRecord};
use crate::model::Registry;
use crate::taxonomy::AttackCategory;

pub struct TrafficAnalyzer {
    spec: FeatureSpec,
    codec: FeatureCodec,
    aggregator: EnsembleAggregator,
}

impl TrafficAnalyzer {
    /// Analyzer over the standard traffic schema with default ensemble config
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, EnsembleConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: EnsembleConfig) -> Self {
        Self {
            spec: FeatureSpec::standard().clone(),
            codec: FeatureCodec::new(),
            aggregator: EnsembleAggregator::with_config(registry, config),
        }
    }

    /// Fully custom wiring, for non-standard schemas
    pub fn with_parts(
        spec: FeatureSpec,
        codec: FeatureCodec,
        aggregator: EnsembleAggregator,
    ) -> Self {
        Self {
            spec,
            codec,
            aggregator,
        }
    }

    pub fn registry(&self) -> &Registry {
        self.aggregator.registry()
    }

    /// Classify a batch of traffic records
    pub fn analyze(&self, records: &[RawRecord]) -> Result<AnalysisReport, DetectionError> {
        if records.is_empty() {
            return Ok(AnalysisReport::empty());
        }

        let features = self.codec.preprocess(records, &self.spec)?;
        let policy = self.aggregator.config().voting;
        let output = self.aggregator.predict(&features, policy)?;
        let confidences = EnsembleAggregator::confidence_for(&output);

        let mut results = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let attack_type = category_for(&output.labels, "ensemble", row)?;

            let mut model_votes = std::collections::BTreeMap::new();
            for (name, labels) in &output.per_model {
                model_votes.insert(name.clone(), category_for(labels, name, row)?);
            }

            results.push(Detection {
                source_ip: string_field(record, "src").unwrap_or_else(|| "unknown".to_string()),
                attack_type,
                confidence: confidences[row],
                timestamp: string_field(record, "timestamp").unwrap_or_default(),
                model_votes,
            });
        }

        let attacks = results.iter().filter(|r| r.attack_type.is_attack()).count();
        let mean_confidence =
            confidences.iter().sum::<f32>() / confidences.len().max(1) as f32;

        log::info!(
            "analyzed {} records: {} flagged as attacks (mean confidence {:.2})",
            results.len(),
            attacks,
            mean_confidence
        );

        Ok(AnalysisReport {
            summary: AnalysisSummary {
                total: results.len(),
                attacks,
                confidence: mean_confidence,
            },
            results,
        })
    }
}

fn category_for(
    labels: &[usize],
    model: &str,
    row: usize,
) -> Result<AttackCategory, DetectionError> {
    AttackCategory::from_index(labels[row]).ok_or(DetectionError::InvalidLabel {
        model: model.to_string(),
        row,
        label: labels[row],
    })
}

fn string_field(record: &RawRecord, field: &str) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================
