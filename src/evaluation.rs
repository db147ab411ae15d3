use std::fmt;

use crate::error::{Error, Result};
use crate::logistic_regression::Model;
use crate::parse::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(model: &Model, records: &[Record]) -> Self {
        let mut matrix = Self::default();

        for record in records {
            match (record.outcome().is_positive(), model.predict(record)) {
                (true, true) => matrix.true_positives += 1,
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_positives += 1,
                (true, false) => matrix.false_negatives += 1,
            }
        }

        matrix
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl Metrics {
    /// Precision and recall are reported as 0 whenever there are no true
    /// positives, even when their denominators are non-zero.
    pub fn from_confusion(confusion: ConfusionMatrix) -> Result<Self> {
        let total = confusion.total();
        if total == 0 {
            return Err(Error::EmptyDataset);
        }

        let ConfusionMatrix {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        } = confusion;

        let accuracy = (tp + tn) as f64 / total as f64;
        let precision = if tp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            confusion,
            accuracy,
            precision,
            recall,
            f1_score,
        })
    }
}

pub fn evaluate(model: &Model, records: &[Record]) -> Result<Metrics> {
    let metrics = Metrics::from_confusion(ConfusionMatrix::from_predictions(model, records))?;

    tracing::debug!(
        accuracy = metrics.accuracy,
        precision = metrics.precision,
        recall = metrics.recall,
        f1 = metrics.f1_score,
        "model evaluated"
    );

    Ok(metrics)
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.2}%", self.accuracy * 100.0)?;
        writeln!(f, "Precision: {:.2}%", self.precision * 100.0)?;
        writeln!(f, "Recall: {:.2}%", self.recall * 100.0)?;
        writeln!(f, "F1-Score: {:.2}%", self.f1_score * 100.0)?;
        writeln!(f, "True Positives: {}", self.confusion.true_positives)?;
        writeln!(f, "True Negatives: {}", self.confusion.true_negatives)?;
        writeln!(f, "False Positives: {}", self.confusion.false_positives)?;
        write!(f, "False Negatives: {}", self.confusion.false_negatives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::NormalizationStats;
    use crate::parse::DIMENSIONS;

    fn matrix(tp: usize, tn: usize, fp: usize, fn_: usize) -> ConfusionMatrix {
        ConfusionMatrix {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    #[test]
    fn derives_standard_metrics() {
        let metrics = Metrics::from_confusion(matrix(40, 45, 10, 5)).unwrap();

        assert!((metrics.accuracy - 0.85).abs() < 1e-12);
        assert!((metrics.precision - 0.8).abs() < 1e-12);
        assert!((metrics.recall - 40.0 / 45.0).abs() < 1e-12);
        let expected_f1 = 2.0 * 0.8 * (40.0 / 45.0) / (0.8 + 40.0 / 45.0);
        assert!((metrics.f1_score - expected_f1).abs() < 1e-12);
    }

    #[test]
    fn no_true_positives_zeroes_precision_recall_and_f1() {
        let metrics = Metrics::from_confusion(matrix(0, 10, 0, 0)).unwrap();

        assert!((metrics.accuracy - 1.0).abs() < f64::EPSILON);
        assert!(metrics.precision.abs() < f64::EPSILON);
        assert!(metrics.recall.abs() < f64::EPSILON);
        assert!(metrics.f1_score.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_matrix_is_rejected() {
        assert!(matches!(
            Metrics::from_confusion(ConfusionMatrix::default()),
            Err(Error::EmptyDataset)
        ));
    }

    #[test]
    fn counts_every_record_once() {
        // Positive iff glucose is above 100.
        let mut weights = [0.0; DIMENSIONS];
        weights[1] = 1.0;
        let stats = NormalizationStats::from_parts(
            [0.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0; DIMENSIONS],
        );
        let model = Model::new(weights, 0.0, stats);

        let glucose = |value: f64, label: u8| {
            Record::with_label([0.0, value, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], label)
        };
        let records = vec![
            glucose(150.0, 1),
            glucose(150.0, 0),
            glucose(50.0, 0),
            glucose(50.0, 1),
            glucose(160.0, 1),
        ];

        let confusion = ConfusionMatrix::from_predictions(&model, &records);
        assert_eq!(confusion, matrix(2, 1, 1, 1));
        assert_eq!(confusion.total(), records.len());
    }

    #[test]
    fn report_lists_percentages_and_counts() {
        let metrics = Metrics::from_confusion(matrix(1, 1, 0, 0)).unwrap();
        let report = metrics.to_string();

        assert!(report.contains("Accuracy: 100.00%"));
        assert!(report.contains("False Negatives: 0"));
    }
}
