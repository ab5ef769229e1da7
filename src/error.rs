//! Error types for loading, filtering and summarizing trip data.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("Unknown city: {0:?} (expected chicago, new york or washington)")]
    UnknownCity(String),

    #[error("Failed to load {}: {message}", path.display())]
    DataLoad { path: PathBuf, message: String },

    #[error("No trip records to analyze")]
    EmptyDataset,

    #[error("Column {0:?} is not present in this dataset")]
    MissingField(&'static str),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExploreError {
    pub(crate) fn data_load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ExploreError::DataLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExploreError>;
