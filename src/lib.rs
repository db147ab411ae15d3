pub mod analysis;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod gradient_descent;
pub mod logging;
pub mod logistic_regression;
pub mod normalization;
pub mod parse;
pub mod plot;

pub use config::TrainingConfig;
pub use error::{Error, Result};
pub use gradient_descent::{TrainedModel, Trainer, TrainingReport};
pub use logistic_regression::Model;
pub use normalization::NormalizationStats;
pub use parse::{Outcome, Record, DIMENSIONS, FEATURE_NAMES};
