//! The declarative job document: schema, per-field data and writer options.
//!
//! ```json
//! {
//!   "fileName": "out.parquet",
//!   "schema": [
//!     { "name": "id", "schemaType": "required", "physicalType": "INT32", "data": [1, 2, 3] }
//!   ],
//!   "options": { "compression": "ZSTD" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ParquetifyError;
use crate::schema::{build_schema, FieldSpec, MessageSchema};
use crate::writer::{convert_to_path, WriterOptions, WriterStats};

/// One conversion request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Output path; a caller-supplied path takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Top-level fields in declaration order
    pub schema: Vec<FieldSpec>,

    /// Writer options
    #[serde(default)]
    pub options: WriterOptions,
}

impl JobSpec {
    /// Read a job document from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParquetifyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ParquetifyError::JobIo {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Build the message schema without touching any data
    pub fn message_schema(&self) -> Result<MessageSchema, ParquetifyError> {
        Ok(build_schema(&self.schema)?)
    }

    /// Where the output goes: `explicit` if given, else `fileName`
    pub fn output_path(&self, explicit: Option<&Path>) -> Result<PathBuf, ParquetifyError> {
        match (explicit, &self.file_name) {
            (Some(path), _) => Ok(path.to_path_buf()),
            (None, Some(name)) if !name.trim().is_empty() => Ok(PathBuf::from(name)),
            _ => Err(ParquetifyError::MissingOutput),
        }
    }

    /// Convert into `path`; no file is left behind on failure
    pub fn run_to_path<P: AsRef<Path>>(&self, path: P) -> Result<WriterStats, ParquetifyError> {
        convert_to_path(&self.schema, &self.options, path)
    }
}

impl FromStr for JobSpec {
    type Err = ParquetifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
