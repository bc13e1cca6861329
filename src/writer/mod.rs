//! # Writer
//!
//! Writer configuration and the conversion driver.
//!
//! ## Defaults
//!
//! | Option | Default |
//! |--------|---------|
//! | `compression` | SNAPPY |
//! | `writerVersion` | `"1.0"` |
//! | `rowGroupSize` | 128 MiB of buffered values |
//! | `pageSize` | 1 MiB |
//! | `encodings` | PLAIN (dictionary off) |
//! | `bloomFilter` | `"none"` |
//! | `statistics` | on |
//!
//! ## Lifecycle
//!
//! [`Conversion`] moves through [`DriverState`]: Configuring → SchemaBound →
//! Writing → Closed. Nothing is written before Writing, and
//! [`convert_to_path`] only moves the output into place after Closed.

mod config;
mod driver;
mod encryption;
mod error;
mod stats;
mod writer_impl;


pub use config::{
    configure, configure_with, parse_compression, BloomFilterPolicy, BloomFilterSetting, EncryptedColumn,
    EncryptionConfig, EncryptionOptions, SizeSetting, WriterConfig, WriterOptions, DEFAULT_COMPRESSION,
    DEFAULT_PAGE_SIZE, DEFAULT_ROW_GROUP_SIZE, DEFAULT_WRITER_VERSION,
};
pub use driver::{convert_to_path, convert_to_writer, Conversion, DriverState};
pub use encryption::{KeyProvider, LiteralKeyProvider, VALID_KEY_LENGTHS};
pub use error::{ConfigError, WriterError};
pub use stats::WriterStats;
pub use writer_impl::ParquetifyWriter;
