use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};
use crate::parse::{Record, DIMENSIONS};

/// Per-feature z-score statistics, captured once from a training set.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationStats {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl NormalizationStats {
    /// Mean and population standard deviation (denominator N) of every feature.
    pub fn fit(records: &[Record]) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let n_records = records.len() as f64;

        let mut means = Array1::<f64>::zeros(DIMENSIONS);
        for record in records {
            means += &ArrayView1::from(record.features());
        }
        means /= n_records;

        let mut variances = Array1::<f64>::zeros(DIMENSIONS);
        for record in records {
            let features = ArrayView1::from(record.features());
            variances.zip_mut_with(&(&features - &means), |variance, &deviation| {
                *variance += deviation.powi(2);
            });
        }
        let stds = (variances / n_records).mapv(f64::sqrt);

        Ok(Self { means, stds })
    }

    /// Builds statistics from known values, e.g. to rebuild a model from stored parameters.
    pub fn from_parts(means: [f64; DIMENSIONS], stds: [f64; DIMENSIONS]) -> Self {
        Self {
            means: Array1::from(means.to_vec()),
            stds: Array1::from(stds.to_vec()),
        }
    }

    /// `(x - mean) / std`, or 0 where the feature had no spread.
    pub fn transform(&self, features: &[f64; DIMENSIONS]) -> Array1<f64> {
        let mut normalized = Array1::from(features.to_vec());

        ndarray::Zip::from(&mut normalized)
            .and(&self.means)
            .and(&self.stds)
            .for_each(|value, &mean, &std| {
                *value = if std == 0.0 {
                    0.0
                } else {
                    (*value - mean) / std
                };
            });

        normalized
    }

    pub fn means(&self) -> ArrayView1<'_, f64> {
        self.means.view()
    }

    pub fn stds(&self) -> ArrayView1<'_, f64> {
        self.stds.view()
    }
}
