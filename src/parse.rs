use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result, RowError};

pub const DIMENSIONS: usize = 8;

pub const FEATURE_NAMES: [&str; DIMENSIONS] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

const GLUCOSE_INDEX: usize = 1;
const BMI_INDEX: usize = 5;
const AGE_INDEX: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Positive,
    Negative,
}

impl Outcome {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "1" => Some(Self::Positive),
            "0" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => 0.0,
        }
    }
}

impl From<bool> for Outcome {
    fn from(positive: bool) -> Self {
        if positive {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// One labeled patient observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    features: [f64; DIMENSIONS],
    outcome: Outcome,
}

impl Record {
    pub fn new(features: [f64; DIMENSIONS], outcome: Outcome) -> Self {
        Self { features, outcome }
    }

    /// Convenience constructor taking the raw 0/1 label.
    pub fn with_label(features: [f64; DIMENSIONS], label: u8) -> Self {
        Self::new(features, Outcome::from(label == 1))
    }

    pub fn features(&self) -> &[f64; DIMENSIONS] {
        &self.features
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn label(&self) -> f64 {
        self.outcome.as_f64()
    }

    pub fn glucose(&self) -> f64 {
        self.features[GLUCOSE_INDEX]
    }

    pub fn bmi(&self) -> f64 {
        self.features[BMI_INDEX]
    }

    pub fn age(&self) -> f64 {
        self.features[AGE_INDEX]
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    pub records: Vec<Record>,
    pub skipped: usize,
}

pub fn parse_row(row: &StringRecord) -> std::result::Result<Record, RowError> {
    const LABEL_FIELD_INDEX: usize = DIMENSIONS;

    if row.len() <= LABEL_FIELD_INDEX {
        return Err(RowError::MissingFields {
            expected: LABEL_FIELD_INDEX + 1,
            found: row.len(),
        });
    }

    let mut features = [0.0; DIMENSIONS];
    for ((feature, value), name) in features.iter_mut().zip(row.iter()).zip(FEATURE_NAMES) {
        *feature = value
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .ok_or_else(|| RowError::NotNumeric {
                name,
                value: value.to_owned(),
            })?;
    }

    let label = &row[LABEL_FIELD_INDEX];
    let outcome = Outcome::from_label(label).ok_or_else(|| RowError::InvalidLabel {
        value: label.to_owned(),
    })?;

    Ok(Record::new(features, outcome))
}

/// Reads comma-separated records after a header row. Malformed rows are
/// skipped with a warning; only I/O failures abort.
pub fn read_records<R: Read>(reader: R) -> Result<LoadedDataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut dataset = LoadedDataset::default();

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(error) if error.is_io_error() => return Err(error.into()),
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable row");
                dataset.skipped += 1;
                continue;
            }
        };

        match parse_row(&row) {
            Ok(record) => dataset.records.push(record),
            Err(error) => {
                let line = row.position().map(csv::Position::line);
                tracing::warn!(?line, %error, "skipping invalid row");
                dataset.skipped += 1;
            }
        }
    }

    tracing::debug!(
        records = dataset.records.len(),
        skipped = dataset.skipped,
        "dataset read"
    );

    Ok(dataset)
}

pub fn load_dataset(file_path: impl AsRef<Path>) -> Result<LoadedDataset> {
    let path = file_path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_records(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        records = dataset.records.len(),
        skipped = dataset.skipped,
        "dataset loaded"
    );

    Ok(dataset)
}
