use clap::Parser;
use diabetes::{
    analysis::{feature_correlations, DatasetSummary},
    config::Config,
    evaluation::evaluate,
    logging,
    parse::{load_dataset, Record, DIMENSIONS},
    plot::plot_cost_history,
    Trainer,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Train a logistic regression diabetes classifier on a CSV dataset")]
struct Cli {
    /// CSV file with a header row and 9 columns (8 features, then the 0/1 outcome)
    #[arg(long)]
    data: PathBuf,

    /// TOML file with [training], [evaluation] and [logging] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the training cost curve to this SVG file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Comma-separated feature values of one patient to classify
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    query: Option<Vec<f64>>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn split(records: &[Record], train_ratio: f64) -> (Vec<Record>, Vec<Record>) {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let train_size = (records.len() as f64 * train_ratio) as usize;
    let (first, second) = records.split_at(train_size);

    (first.to_vec(), second.to_vec())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    logging::init(cli.debug, config.logging.level.as_deref());

    let query = match cli.query.as_deref() {
        Some(values) => Some(<[f64; DIMENSIONS]>::try_from(values).map_err(|_| {
            format!(
                "--query needs exactly {DIMENSIONS} values, got {}",
                values.len()
            )
        })?),
        None => None,
    };

    let dataset = load_dataset(&cli.data)?;
    let records = dataset.records;

    let summary = DatasetSummary::from_records(&records)?;
    println!("=== Dataset Statistics ===");
    println!("{summary}");
    if dataset.skipped > 0 {
        println!("Skipped rows: {}", dataset.skipped);
    }

    println!("\n=== Correlation With Diabetes ===");
    for correlation in feature_correlations(&records) {
        println!(
            "{:<25}: {:6.3} ({})",
            correlation.feature, correlation.coefficient, correlation.strength
        );
    }

    let holdout_ratio = config.evaluation.holdout_ratio;
    let (train_records, test_records) = if holdout_ratio > 0.0 {
        split(&records, 1.0 - holdout_ratio)
    } else {
        (records.clone(), records)
    };

    let trainer = Trainer::new(config.training)?;
    let trained = trainer.fit(&train_records)?;

    println!("\n=== Training ===");
    println!(
        "Iterations: {} ({})",
        trained.report.iterations,
        if trained.report.converged {
            "converged"
        } else {
            "iteration limit reached"
        }
    );
    if let Some(cost) = trained.report.final_cost() {
        println!("Final cost: {cost:.6}");
    }

    if let Some(path) = &cli.plot {
        plot_cost_history(&trained.report.cost_history, path)?;
    }

    let evaluation_set = if test_records.is_empty() {
        &train_records
    } else {
        &test_records
    };
    let metrics = evaluate(&trained.model, evaluation_set)?;
    println!("\n=== Model Performance ===");
    println!("{metrics}");

    if let Some(features) = query {
        let probability = trained.model.predict_probability_features(&features);
        let positive = trained.model.predict_features(&features);

        println!("\n=== Prediction ===");
        println!(
            "{}",
            if positive {
                "Diabetes detected"
            } else {
                "No diabetes detected"
            }
        );
        println!("Probability: {:.1}%", probability * 100.0);
        println!(
            "Confidence: {:.1}%",
            trained.model.confidence(&features) * 100.0
        );
    }

    Ok(())
}
