use ndarray::{Array1, ArrayView1};

use crate::normalization::NormalizationStats;
use crate::parse::{Record, DIMENSIONS};

pub const DECISION_THRESHOLD: f64 = 0.5;

/// Logistic function, split on the sign of `logit` so `exp` never overflows.
pub fn sigmoid(logit: f64) -> f64 {
    if logit >= 0.0 {
        1.0 / (1.0 + (-logit).exp())
    } else {
        let exp = logit.exp();
        exp / (1.0 + exp)
    }
}

/// A fitted logistic regression model. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    weights: Array1<f64>,
    bias: f64,
    stats: NormalizationStats,
}

impl Model {
    pub fn new(weights: [f64; DIMENSIONS], bias: f64, stats: NormalizationStats) -> Self {
        Self::from_array(Array1::from(weights.to_vec()), bias, stats)
    }

    pub(crate) fn from_array(weights: Array1<f64>, bias: f64, stats: NormalizationStats) -> Self {
        debug_assert_eq!(weights.len(), DIMENSIONS);
        Self {
            weights,
            bias,
            stats,
        }
    }

    pub fn logit(&self, features: &[f64; DIMENSIONS]) -> f64 {
        self.bias + self.stats.transform(features).dot(&self.weights)
    }

    pub fn predict_probability_features(&self, features: &[f64; DIMENSIONS]) -> f64 {
        sigmoid(self.logit(features))
    }

    pub fn predict_features(&self, features: &[f64; DIMENSIONS]) -> bool {
        self.predict_probability_features(features) >= DECISION_THRESHOLD
    }

    /// Probability that the record belongs to the positive class.
    pub fn predict_probability(&self, record: &Record) -> f64 {
        self.predict_probability_features(record.features())
    }

    pub fn predict(&self, record: &Record) -> bool {
        self.predict_features(record.features())
    }

    /// Probability of whichever class was predicted.
    pub fn confidence(&self, features: &[f64; DIMENSIONS]) -> f64 {
        let probability = self.predict_probability_features(features);

        if probability >= DECISION_THRESHOLD {
            probability
        } else {
            1.0 - probability
        }
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }
}
