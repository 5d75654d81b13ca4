//! Ensemble Aggregator
//!
//! Runs every loaded classifier over a feature matrix and combines the
//! per-model predictions into one verdict per row. A model that errors,
//! emits an out-of-range label, or exceeds the per-call deadline is
//! unavailable for that call: it is omitted from the vote, never filled
//! with a dummy prediction. The call fails only when no model answers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::voting::VotingPolicy;
use crate::error::DetectionError;
use crate::features::FeatureMatrix;
use crate::model::classifier::{argmax_min_index, Classifier};
use crate::model::Registry;
use crate::taxonomy::NUM_CLASSES;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Voting policy used by the orchestrator
    pub voting: VotingPolicy,

    /// Per-call deadline for each model, milliseconds. 0 disables the bound.
    pub model_timeout_ms: u64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            voting: VotingPolicy::Hard,
            model_timeout_ms: 5_000,
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Combined predictions for one feature matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleOutput {
    /// Per-row ensemble class index
    pub labels: Vec<usize>,
    /// Raw per-row labels of every model that answered this call
    pub per_model: BTreeMap<String, Vec<usize>>,
}

/// One model's answer for the whole matrix
struct ModelVote {
    labels: Vec<usize>,
    proba: Option<Array2<f32>>,
}

// ============================================================================
// AGGREGATOR
// ============================================================================

pub struct EnsembleAggregator {
    registry: Arc<Registry>,
    config: EnsembleConfig,
}

impl EnsembleAggregator {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, EnsembleConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: EnsembleConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Predict one verdict per row under the given voting policy.
    ///
    /// Fails with `NoModelsAvailable` when the registry holds no loaded
    /// models, or when every loaded model failed for this call.
    pub fn predict(
        &self,
        features: &FeatureMatrix,
        policy: VotingPolicy,
    ) -> Result<EnsembleOutput, DetectionError> {
        if self.registry.is_empty() {
            return Err(DetectionError::NoModelsAvailable);
        }

        let votes = self.fan_out(features, policy);
        if votes.is_empty() {
            log::warn!("every loaded model failed for this call");
            return Err(DetectionError::NoModelsAvailable);
        }

        let labels = match policy {
            VotingPolicy::Hard => hard_vote(features.rows(), &votes),
            VotingPolicy::Soft => soft_vote(features.rows(), &votes),
        };

        let per_model = votes
            .into_iter()
            .map(|(name, vote)| (name, vote.labels))
            .collect();

        Ok(EnsembleOutput { labels, per_model })
    }

    /// Per-row agreement confidence in [0,1]: the fraction of answering
    /// models whose label matches the hard-voting ensemble label. Zero
    /// available models yields 0.0 per row, not an error.
    pub fn confidence(&self, features: &FeatureMatrix) -> Vec<f32> {
        match self.predict(features, VotingPolicy::Hard) {
            Ok(output) => Self::confidence_for(&output),
            Err(e) => {
                log::warn!("confidence degraded to zero: {}", e);
                vec![0.0; features.rows()]
            }
        }
    }

    /// Agreement confidence computed from an existing prediction
    pub fn confidence_for(output: &EnsembleOutput) -> Vec<f32> {
        let n_models = output.per_model.len();
        if n_models == 0 {
            return vec![0.0; output.labels.len()];
        }

        output
            .labels
            .iter()
            .enumerate()
            .map(|(row, &label)| {
                let agreeing = output
                    .per_model
                    .values()
                    .filter(|labels| labels[row] == label)
                    .count();
                agreeing as f32 / n_models as f32
            })
            .collect()
    }

    /// Invoke every loaded model in parallel and collect the answers.
    /// Failures and timeouts are logged and dropped.
    fn fan_out(
        &self,
        features: &FeatureMatrix,
        policy: VotingPolicy,
    ) -> BTreeMap<String, ModelVote> {
        let shared = Arc::new(features.clone());
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut expected = 0usize;

        for (name, model) in self.registry.models() {
            let tx = tx.clone();
            let features = Arc::clone(&shared);
            let model = Arc::clone(model);
            let name = name.to_string();
            std::thread::spawn(move || {
                let result = run_model(&name, model.as_ref(), &features, policy);
                let _ = tx.send((name, result));
            });
            expected += 1;
        }
        drop(tx);

        let deadline = if self.config.model_timeout_ms > 0 {
            Some(Instant::now() + Duration::from_millis(self.config.model_timeout_ms))
        } else {
            None
        };

        let mut votes = BTreeMap::new();
        let mut received = 0usize;
        while received < expected {
            let message = match deadline {
                Some(deadline) => match rx.recv_deadline(deadline) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => {
                        log::warn!(
                            "{} of {} models missed the {}ms deadline",
                            expected - received,
                            expected,
                            self.config.model_timeout_ms
                        );
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match rx.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
            };

            received += 1;
            match message {
                (name, Ok(vote)) => {
                    votes.insert(name, vote);
                }
                (name, Err(e)) => {
                    log::warn!("model '{}' unavailable for this call: {}", name, e);
                }
            }
        }
        votes
    }
}

fn run_model(
    name: &str,
    model: &dyn Classifier,
    features: &FeatureMatrix,
    policy: VotingPolicy,
) -> Result<ModelVote, DetectionError> {
    if policy == VotingPolicy::Soft && model.has_probability() {
        let proba = model.predict_proba(features)?;
        if proba.nrows() != features.rows() || proba.ncols() != NUM_CLASSES {
            return Err(DetectionError::ModelPredict {
                model: name.to_string(),
                reason: format!(
                    "probability shape {}x{} does not match {} rows x {} classes",
                    proba.nrows(),
                    proba.ncols(),
                    features.rows(),
                    NUM_CLASSES
                ),
            });
        }
        let labels = proba
            .rows()
            .into_iter()
            .map(|row| argmax_min_index(&row.to_vec()))
            .collect();
        return Ok(ModelVote {
            labels,
            proba: Some(proba),
        });
    }

    let labels = model.predict(features)?;
    if labels.len() != features.rows() {
        return Err(DetectionError::ModelPredict {
            model: name.to_string(),
            reason: format!(
                "{} labels returned for {} rows",
                labels.len(),
                features.rows()
            ),
        });
    }
    for (row, &label) in labels.iter().enumerate() {
        if label >= NUM_CLASSES {
            return Err(DetectionError::InvalidLabel {
                model: name.to_string(),
                row,
                label,
            });
        }
    }
    Ok(ModelVote { labels, proba: None })
}

// ============================================================================
// VOTE COMBINATION
// ============================================================================

/// Per row, the most frequent label across models. Counts are scanned in
/// ascending class index with a strict comparison, so exact ties always
/// resolve to the smallest label regardless of model iteration order.
fn hard_vote(rows: usize, votes: &BTreeMap<String, ModelVote>) -> Vec<usize> {
    (0..rows)
        .map(|row| {
            let mut counts = [0usize; NUM_CLASSES];
            for vote in votes.values() {
                counts[vote.labels[row]] += 1;
            }
            let mut winner = 0;
            for (class, &count) in counts.iter().enumerate().skip(1) {
                if count > counts[winner] {
                    winner = class;
                }
            }
            winner
        })
        .collect()
}

/// Per row, the arg-max of the averaged per-class probability vectors.
/// A label-only model contributes a one-hot vector at its predicted class.
fn soft_vote(rows: usize, votes: &BTreeMap<String, ModelVote>) -> Vec<usize> {
    (0..rows)
        .map(|row| {
            let mut sums = [0.0f32; NUM_CLASSES];
            for vote in votes.values() {
                match &vote.proba {
                    Some(proba) => {
                        for class in 0..NUM_CLASSES {
                            sums[class] += proba[[row, class]];
                        }
                    }
                    None => sums[vote.labels[row]] += 1.0,
                }
            }
            let n = votes.len() as f32;
            for sum in sums.iter_mut() {
                *sum /= n;
            }
            argmax_min_index(&sums)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
