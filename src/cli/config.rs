//! TOML configuration file support.
//!
//! Writer defaults can live in a config file instead of every job document:
//!
//! ```toml
//! # parquetify.toml
//! [writer]
//! compression = "ZSTD"
//! compression_level = 9
//! writer_version = "2.0"
//! row_group_size = 67108864
//! page_size = 1048576
//! statistics = true
//! ```
//!
//! A value from the file only applies where the job's `options` leave it unset.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use parquetify::writer::{SizeSetting, WriterOptions};

/// Root configuration structure for parquetify.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Writer defaults.
    #[serde(default)]
    pub writer: WriterDefaults,
}

/// Defaults for the writer options.
#[derive(Debug, Default, Deserialize)]
pub struct WriterDefaults {
    /// Codec name.
    pub compression: Option<String>,

    /// Codec level for GZIP, BROTLI or ZSTD.
    pub compression_level: Option<i32>,

    /// "1.0" or "2.0".
    pub writer_version: Option<String>,

    /// Row-group size in bytes.
    pub row_group_size: Option<u64>,

    /// Data page size in bytes.
    pub page_size: Option<u64>,

    /// Chunk and page statistics.
    pub statistics: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Fill the unset fields of `options` from the file.
    pub fn apply_to(&self, options: &mut WriterOptions) {
        let defaults = &self.writer;
        if options.compression.is_none() {
            options.compression = defaults.compression.clone();
        }
        if options.compression_level.is_none() {
            options.compression_level = defaults.compression_level;
        }
        if options.writer_version.is_none() {
            options.writer_version = defaults.writer_version.clone();
        }
        if options.row_group_size.is_none() {
            options.row_group_size = defaults.row_group_size.map(SizeSetting::Bytes);
        }
        if options.page_size.is_none() {
            options.page_size = defaults.page_size.map(SizeSetting::Bytes);
        }
        if options.statistics.is_none() {
            options.statistics = defaults.statistics;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [writer]
            compression = "ZSTD"
            compression_level = 9
            writer_version = "2.0"
            row_group_size = 200000
            page_size = 4096
            statistics = false
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.writer.compression.as_deref(), Some("ZSTD"));
        assert_eq!(config.writer.compression_level, Some(9));
        assert_eq!(config.writer.writer_version.as_deref(), Some("2.0"));
        assert_eq!(config.writer.row_group_size, Some(200_000));
        assert_eq!(config.writer.page_size, Some(4096));
        assert_eq!(config.writer.statistics, Some(false));
    }

    #[test]
    fn test_job_options_win() {
        let config = Config::from_str(
            r#"
            [writer]
            compression = "GZIP"
            row_group_size = 1024
        "#,
        )
        .unwrap();

        let mut options = WriterOptions {
            compression: Some("BROTLI".to_string()),
            ..Default::default()
        };
        config.apply_to(&mut options);
        assert_eq!(options.compression.as_deref(), Some("BROTLI"));
        assert_eq!(options.row_group_size, Some(SizeSetting::Bytes(1024)));
        assert_eq!(options.page_size, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.writer.compression, None);

        let mut options = WriterOptions::default();
        config.apply_to(&mut options);
        assert_eq!(options, WriterOptions::default());
    }
}
