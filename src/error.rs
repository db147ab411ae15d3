use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dataset contains no usable records")]
    EmptyDataset,

    #[error("invalid training configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("training cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Why a single CSV row was rejected. Rows that fail are skipped, never fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("field '{name}' is not numeric: {value:?}")]
    NotNumeric { name: &'static str, value: String },

    #[error("outcome must be 0 or 1, got {value:?}")]
    InvalidLabel { value: String },
}
