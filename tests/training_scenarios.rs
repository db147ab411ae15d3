// End-to-end runs: CSV on disk -> loader -> trainer -> model -> evaluator.

use diabetes::analysis::{feature_correlations, DatasetSummary};
use diabetes::evaluation::{evaluate, ConfusionMatrix};
use diabetes::parse::load_dataset;
use diabetes::{Error, NormalizationStats, Record, Trainer, TrainingConfig, DIMENSIONS};
use std::io::Write;

fn patients() -> Vec<Record> {
    vec![
        Record::with_label([1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0], 0),
        Record::with_label([8.0, 183.0, 64.0, 0.0, 0.0, 23.3, 0.672, 32.0], 1),
        Record::with_label([1.0, 89.0, 66.0, 23.0, 94.0, 28.1, 0.167, 21.0], 0),
        Record::with_label([0.0, 137.0, 40.0, 35.0, 168.0, 43.1, 2.288, 33.0], 1),
    ]
}

fn reference_config() -> TrainingConfig {
    TrainingConfig {
        learning_rate: 0.01,
        max_iterations: 1000,
        convergence_threshold: 1e-6,
        seed: 42,
    }
}

#[test]
fn trains_reference_patients() {
    let trainer = Trainer::new(reference_config()).unwrap();
    let trained = trainer.fit(&patients()).unwrap();

    assert_eq!(trained.model.weights().len(), DIMENSIONS);
    assert_eq!(trained.model.stats().means().len(), DIMENSIONS);
    assert_eq!(trained.model.stats().stds().len(), DIMENSIONS);

    for patient in patients() {
        let probability = trained.model.predict_probability(&patient);
        assert!((0.0..=1.0).contains(&probability));
    }

    let again = trainer.fit(&patients()).unwrap();
    assert_eq!(trained.model.weights(), again.model.weights());
    assert_eq!(trained.model.bias().to_bits(), again.model.bias().to_bits());
}

#[test]
fn terminates_by_convergence_or_iteration_limit() {
    let config = reference_config();
    let trained = Trainer::new(config).unwrap().fit(&patients()).unwrap();
    let report = &trained.report;

    if report.converged {
        let history = &report.cost_history;
        let delta = history[history.len() - 2] - history[history.len() - 1];
        assert!(delta.abs() < config.convergence_threshold);
    } else {
        assert_eq!(report.iterations, config.max_iterations);
    }

    let tail = &report.cost_history[report.cost_history.len().saturating_sub(10)..];
    for pair in tail.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12);
    }
}

#[test]
fn learns_reference_patients() {
    let trained = Trainer::new(reference_config())
        .unwrap()
        .fit(&patients())
        .unwrap();
    let metrics = evaluate(&trained.model, &patients()).unwrap();

    assert_eq!(metrics.confusion.total(), 4);
    assert!((metrics.accuracy - 1.0).abs() < f64::EPSILON);
}

#[test]
fn single_class_dataset_predicts_negative() {
    let negatives: Vec<Record> = patients()
        .iter()
        .map(|patient| Record::with_label(*patient.features(), 0))
        .collect();

    let trained = Trainer::new(reference_config())
        .unwrap()
        .fit(&negatives)
        .unwrap();

    for patient in &negatives {
        assert!(!trained.model.predict(patient));
    }
    assert!(!trained
        .model
        .predict_features(&[10.0, 200.0, 90.0, 40.0, 300.0, 40.0, 2.0, 50.0]));
}

#[test]
fn empty_dataset_fails_fast() {
    let trainer = Trainer::new(reference_config()).unwrap();
    assert!(matches!(trainer.fit(&[]), Err(Error::EmptyDataset)));
}

#[test]
fn value_at_training_mean_normalizes_to_zero() {
    let records = patients();
    let stats = NormalizationStats::fit(&records).unwrap();

    // Glucose mean of the reference patients is 123.5.
    let mut query = *records[0].features();
    query[1] = 123.5;

    assert!((stats.means()[1] - 123.5).abs() < 1e-12);
    assert!(stats.stds()[1] > 0.0);
    assert!(stats.transform(&query)[1].abs() < f64::EPSILON);
}

#[test]
fn repeated_predictions_agree() {
    let trained = Trainer::new(reference_config())
        .unwrap()
        .fit(&patients())
        .unwrap();
    let query = Record::with_label([2.0, 120.0, 70.0, 30.0, 100.0, 25.0, 0.5, 30.0], 0);

    let first = trained.model.predict(&query);
    for _ in 0..10 {
        assert_eq!(trained.model.predict(&query), first);
    }
}

#[test]
fn pipeline_from_csv_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome"
    )
    .unwrap();
    for line in [
        "6,148,72,35,0,33.6,0.627,50,1",
        "1,85,66,29,0,26.6,0.351,31,0",
        "8,183,64,0,0,23.3,0.672,32,1",
        "1,89,66,23,94,28.1,0.167,21,0",
        "not,a,number,row,0,0,0,0,0",
        "0,137,40,35,168,43.1,2.288,33,1",
        "5,116,74,0,0,25.6,0.201,30,0",
    ] {
        writeln!(file, "{line}").unwrap();
    }

    let dataset = load_dataset(file.path()).unwrap();
    assert_eq!(dataset.records.len(), 6);
    assert_eq!(dataset.skipped, 1);

    let summary = DatasetSummary::from_records(&dataset.records).unwrap();
    assert_eq!(summary.positive, 3);
    assert_eq!(feature_correlations(&dataset.records).len(), DIMENSIONS);

    let trained = Trainer::new(TrainingConfig::default())
        .unwrap()
        .fit(&dataset.records)
        .unwrap();
    let confusion = ConfusionMatrix::from_predictions(&trained.model, &dataset.records);
    assert_eq!(confusion.total(), dataset.records.len());
}
