use std::path::PathBuf;

use crate::record::DataError;
use crate::schema::SchemaError;
use crate::value::ValueError;
use crate::writer::{ConfigError, WriterError};

/// Any error a conversion can end with.
///
/// Schema, configuration and data errors abort before the output is opened.
/// Value and writer errors abort mid-write.
#[derive(Debug, thiserror::Error)]
pub enum ParquetifyError {
    /// Invalid schema declaration
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid writer options
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A value could not be mapped onto its column
    #[error(transparent)]
    Value(#[from] ValueError),

    /// No rows to locate
    #[error(transparent)]
    Data(#[from] DataError),

    /// Output or encoder failure
    #[error(transparent)]
    Writer(WriterError),

    /// Job document could not be read
    #[error("Failed to read job file {}: {source}", path.display())]
    JobIo {
        /// Job file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Job document is not valid JSON for a job
    #[error("Invalid job document: {0}")]
    Job(#[from] serde_json::Error),

    /// Neither an explicit output path nor a `fileName` was given
    #[error("No output path: pass one or set fileName in the job")]
    MissingOutput,
}

impl From<WriterError> for ParquetifyError {
    fn from(error: WriterError) -> Self {
        match error {
            WriterError::ValueError(e) => ParquetifyError::Value(e),
            WriterError::ConfigError(e) => ParquetifyError::Config(e),
            other => ParquetifyError::Writer(other),
        }
    }
}
