//! Descriptive statistics over a loaded dataset. Nothing here feeds back into
//! training; the numbers are for reporting only.

use nalgebra::{DMatrix, DVector};
use std::fmt;

use crate::error::{Error, Result};
use crate::parse::{Record, DIMENSIONS, FEATURE_NAMES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl CorrelationStrength {
    pub fn classify(coefficient: f64) -> Self {
        let magnitude = coefficient.abs();

        if magnitude >= 0.7 {
            Self::Strong
        } else if magnitude >= 0.5 {
            Self::Moderate
        } else if magnitude >= 0.3 {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
            Self::VeryWeak => "Very Weak",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureCorrelation {
    pub feature: &'static str,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

fn records_to_matrix(records: &[Record]) -> DMatrix<f64> {
    DMatrix::from_fn(records.len(), DIMENSIONS, |row, column| {
        records[row].features()[column]
    })
}

fn labels_to_vector(records: &[Record]) -> DVector<f64> {
    DVector::from_iterator(records.len(), records.iter().map(Record::label))
}

/// Pearson coefficient from raw sums; 0 when either side has no variance.
fn pearson(x: &DVector<f64>, y: &DVector<f64>) -> f64 {
    let n = x.len() as f64;

    let sum_x = x.sum();
    let sum_y = y.sum();
    let sum_xy = x.dot(y);
    let sum_x2 = x.norm_squared();
    let sum_y2 = y.norm_squared();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || denominator.is_nan() {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn pearson_correlation(records: &[Record], feature_index: usize) -> f64 {
    assert!(feature_index < DIMENSIONS, "feature index out of range");

    let x = DVector::from_iterator(
        records.len(),
        records.iter().map(|record| record.features()[feature_index]),
    );
    pearson(&x, &labels_to_vector(records))
}

pub fn feature_correlations(records: &[Record]) -> Vec<FeatureCorrelation> {
    let samples = records_to_matrix(records);
    let labels = labels_to_vector(records);

    FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(index, &feature)| {
            let coefficient = pearson(&samples.column(index).into_owned(), &labels);
            FeatureCorrelation {
                feature,
                coefficient,
                strength: CorrelationStrength::classify(coefficient),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of(records: &[Record], value: impl Fn(&Record) -> f64) -> Self {
        records.iter().map(value).fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |range, value| Self {
                min: range.min.min(value),
                max: range.max.max(value),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub age: Range,
    pub glucose: Range,
    pub bmi: Range,
    /// Mean of every feature among positive records; `None` if there are none.
    pub positive_means: Option<[f64; DIMENSIONS]>,
    pub negative_means: Option<[f64; DIMENSIONS]>,
}

fn class_means<'a>(records: impl Iterator<Item = &'a Record>) -> Option<[f64; DIMENSIONS]> {
    let mut sums = [0.0; DIMENSIONS];
    let mut count = 0usize;

    for record in records {
        for (sum, value) in sums.iter_mut().zip(record.features()) {
            *sum += value;
        }
        count += 1;
    }

    (count > 0).then(|| sums.map(|sum| sum / count as f64))
}

impl DatasetSummary {
    pub fn from_records(records: &[Record]) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let positive = records
            .iter()
            .filter(|record| record.outcome().is_positive())
            .count();

        Ok(Self {
            total: records.len(),
            positive,
            negative: records.len() - positive,
            age: Range::of(records, Record::age),
            glucose: Range::of(records, Record::glucose),
            bmi: Range::of(records, Record::bmi),
            positive_means: class_means(
                records.iter().filter(|record| record.outcome().is_positive()),
            ),
            negative_means: class_means(
                records.iter().filter(|record| !record.outcome().is_positive()),
            ),
        })
    }

    pub fn positive_percentage(&self) -> f64 {
        self.positive as f64 * 100.0 / self.total as f64
    }

    pub fn negative_percentage(&self) -> f64 {
        self.negative as f64 * 100.0 / self.total as f64
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Patients: {}", self.total)?;
        writeln!(
            f,
            "Diabetes Cases: {} ({:.1}%)",
            self.positive,
            self.positive_percentage()
        )?;
        writeln!(
            f,
            "Non-Diabetes Cases: {} ({:.1}%)",
            self.negative,
            self.negative_percentage()
        )?;
        writeln!(f, "Age Range: {:.0} - {:.0} years", self.age.min, self.age.max)?;
        writeln!(
            f,
            "Glucose Range: {:.0} - {:.0} mg/dL",
            self.glucose.min, self.glucose.max
        )?;
        write!(f, "BMI Range: {:.1} - {:.1}", self.bmi.min, self.bmi.max)?;

        if let (Some(positive), Some(negative)) = (self.positive_means, self.negative_means) {
            writeln!(f)?;
            writeln!(
                f,
                "{:<25} {:<15} {:<15} {:<10}",
                "Feature", "Diabetes", "No Diabetes", "Difference"
            )?;
            write!(f, "{}", "-".repeat(70))?;
            for ((name, with), without) in FEATURE_NAMES.iter().zip(positive).zip(negative) {
                write!(
                    f,
                    "\n{name:<25} {with:<15.2} {without:<15.2} {:<10.2}",
                    with - without
                )?;
            }
        }

        Ok(())
    }
}
