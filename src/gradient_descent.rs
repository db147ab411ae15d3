use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use crate::logistic_regression::{sigmoid, Model};
use crate::normalization::NormalizationStats;
use crate::parse::{Record, DIMENSIONS};

const WEIGHT_INIT_SCALE: f64 = 0.01;
const MIN_PROBABILITY: f64 = 1e-15;
const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub iterations: usize,
    pub converged: bool,
    /// Average cross-entropy of every completed iteration, in order.
    pub cost_history: Vec<f64>,
}

impl TrainingReport {
    pub fn final_cost(&self) -> Option<f64> {
        self.cost_history.last().copied()
    }
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: Model,
    pub report: TrainingReport,
}

struct Step {
    weight_gradient: Array1<f64>,
    bias_gradient: f64,
    cost: f64,
}

/// Batch gradient descent for logistic regression.
///
/// Holds only its configuration; every `fit` is independent of the previous one.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn fit(&self, records: &[Record]) -> Result<TrainedModel> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.fit_with_rng(records, &mut rng, None)
    }

    /// Like [`Trainer::fit`], but stops with [`Error::Cancelled`] once `cancel`
    /// is set. The flag is only read between iterations.
    pub fn fit_cancellable(
        &self,
        records: &[Record],
        cancel: &AtomicBool,
    ) -> Result<TrainedModel> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.fit_with_rng(records, &mut rng, Some(cancel))
    }

    /// Trains with a caller-supplied generator driving the shuffle and the
    /// initial weights.
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &self,
        records: &[Record],
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<TrainedModel> {
        if records.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut samples = records.to_vec();
        samples.shuffle(rng);

        let stats = NormalizationStats::fit(&samples)?;
        let normalized: Vec<(Array1<f64>, f64)> = samples
            .iter()
            .map(|record| (stats.transform(record.features()), record.label()))
            .collect();

        let mut weights: Array1<f64> = (0..DIMENSIONS)
            .map(|_| rng.sample::<f64, _>(StandardNormal) * WEIGHT_INIT_SCALE)
            .collect();
        let mut bias = 0.0;

        tracing::debug!(
            samples = samples.len(),
            learning_rate = self.config.learning_rate,
            max_iterations = self.config.max_iterations,
            "starting gradient descent"
        );

        let mut previous_cost = f64::MAX;
        let mut cost_history = Vec::new();
        let mut converged = false;

        for iteration in 0..self.config.max_iterations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                tracing::info!(iterations = iteration, "training cancelled");
                return Err(Error::Cancelled {
                    iterations: iteration,
                });
            }

            let step = Self::step(&normalized, &weights, bias);

            weights.scaled_add(-self.config.learning_rate, &step.weight_gradient);
            bias -= self.config.learning_rate * step.bias_gradient;
            cost_history.push(step.cost);

            let completed = iteration + 1;

            if (previous_cost - step.cost).abs() < self.config.convergence_threshold {
                tracing::info!(iterations = completed, cost = step.cost, "converged");
                converged = true;
                break;
            }
            previous_cost = step.cost;

            if completed % PROGRESS_INTERVAL == 0 {
                tracing::info!(iteration = completed, cost = step.cost, "training progress");
            }
        }

        let report = TrainingReport {
            iterations: cost_history.len(),
            converged,
            cost_history,
        };

        Ok(TrainedModel {
            model: Model::from_array(weights, bias, stats),
            report,
        })
    }

    /// Averaged gradients and cost over the whole batch, summed in sample order.
    fn step(samples: &[(Array1<f64>, f64)], weights: &Array1<f64>, bias: f64) -> Step {
        let mut weight_gradient = Array1::<f64>::zeros(DIMENSIONS);
        let mut bias_gradient = 0.0;
        let mut cost = 0.0;

        for (features, label) in samples {
            let prediction = sigmoid(bias + features.dot(weights));
            let error = prediction - label;

            weight_gradient.zip_mut_with(features, |current_gradient, &feature_value| {
                *current_gradient += error * feature_value;
            });
            bias_gradient += error;

            cost -= label * prediction.max(MIN_PROBABILITY).ln()
                + (1.0 - label) * (1.0 - prediction).max(MIN_PROBABILITY).ln();
        }

        let n_samples = samples.len() as f64;

        Step {
            weight_gradient: weight_gradient / n_samples,
            bias_gradient: bias_gradient / n_samples,
            cost: cost / n_samples,
        }
    }
}
