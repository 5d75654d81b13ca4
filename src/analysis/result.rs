//! Analysis Results
//!
//! Data only. The JSON field names match the dashboard contract
//! (camelCase for the per-row entries).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::taxonomy::AttackCategory;

/// Verdict for one traffic record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "sourceIp")]
    pub source_ip: String,

    #[serde(rename = "attackType")]
    pub attack_type: AttackCategory,

    /// Inter-model agreement ratio in [0,1]. Not a calibrated probability.
    pub confidence: f32,

    pub timestamp: String,

    /// Raw verdict of every model that answered
    #[serde(rename = "modelVotes")]
    pub model_votes: BTreeMap<String, AttackCategory>,
}

/// Batch-level rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub attacks: usize,
    /// Mean per-row confidence; 0.0 for an empty batch
    pub confidence: f32,
}

/// Full response for one analysis call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub results: Vec<Detection>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            summary: AnalysisSummary {
                total: 0,
                attacks: 0,
                confidence: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_serializes_dashboard_field_names() {
        let detection = Detection {
            source_ip: "192.168.1.10".to_string(),
            attack_type: AttackCategory::Dos,
            confidence: 0.75,
            timestamp: "2025-03-29T12:00:00Z".to_string(),
            model_votes: BTreeMap::new(),
        };
        let json = serde_json::to_value(&detection).unwrap();
        assert_eq!(json["sourceIp"], "192.168.1.10");
        assert_eq!(json["attackType"], "DoS");
        assert_eq!(json["confidence"], 0.75);
    }

    #[test]
    fn test_empty_report() {
        let report = AnalysisReport::empty();
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.confidence, 0.0);
    }
}
