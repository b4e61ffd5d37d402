use std::path::PathBuf;

use thiserror::Error;

/// The source file could not be turned into a [`RideTable`](crate::data::model::RideTable).
///
/// Any variant is fatal for the dataset it was raised for: nothing is shown
/// until a readable file is loaded.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// Non-fatal: a chart or metric has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmptyResultWarning {
    #[error("no rides match the selected filters")]
    NoMatchingRides,

    #[error("no data for {metric}")]
    NoData { metric: &'static str },
}
