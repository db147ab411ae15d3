//! Training hyperparameters and the optional `config.toml` file.
//!
//! Every key is optional; missing keys fall back to the defaults below and
//! unknown keys are ignored so older binaries accept newer files.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 1e-6;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            seed: DEFAULT_SEED,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::invalid_config(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }

        if self.max_iterations == 0 {
            return Err(Error::invalid_config("max_iterations must be at least 1"));
        }

        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(Error::invalid_config(format!(
                "convergence_threshold must be a non-negative finite number, got {}",
                self.convergence_threshold
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EvaluationSection {
    /// Fraction of rows held back from training. Zero evaluates on the training rows.
    pub holdout_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub training: TrainingConfig,
    pub evaluation: EvaluationSection,
    pub logging: LoggingSection,
}

impl Config {
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| Error::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents, path)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.training.validate()?;

        let ratio = self.evaluation.holdout_ratio;
        if !(0.0..1.0).contains(&ratio) {
            return Err(Error::invalid_config(format!(
                "holdout_ratio must be in [0, 1), got {ratio}"
            )));
        }

        Ok(())
    }
}
