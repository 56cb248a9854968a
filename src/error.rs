use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Column {column:?} not found in the dataset")]
    MissingSchemaField { column: String },

    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed adjacency matrix: {reason}")]
    MalformedMatrix { reason: String },

    #[error("Station {station:?} is not part of the station index")]
    UnknownStation { station: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("internal error building route name regex: {0}")]
    Regex(#[from] regex::Error),
}

impl GraphError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        GraphError::MalformedMatrix {
            reason: reason.into(),
        }
    }
}
