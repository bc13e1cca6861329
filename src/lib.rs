//! # parquetify - Declarative JSON to Parquet
//!
//! `parquetify` writes a Parquet file from a declarative description: a
//! schema of typed fields, the per-field data, and writer options. It covers
//! the full Parquet type system, nested groups with repetition and
//! definition levels, logical annotations, and modular encryption.
//!
//! ## Key Features
//!
//! - **Declarative schema**: fields declare repetition, physical type and an
//!   optional logical type; groups nest arbitrarily deep.
//!
//! - **Exact value mapping**: every raw value is coerced onto its column's
//!   physical type (decimals, FLOAT16, UUID, temporal text, INT96) or fails
//!   with an error naming the column.
//!
//! - **Streaming writer**: rows are shredded into column buffers and flushed
//!   as row groups once the configured size is reached.
//!
//! - **Safe output**: files are written to a temporary path and only moved
//!   into place once the footer is complete.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parquetify::prelude::*;
//!
//! let fields = vec![
//!     FieldSpec::leaf("id", "required", "INT32")
//!         .with_data(vec![RawValue::from(1), RawValue::from(2)]),
//!     FieldSpec::leaf("name", "optional", "BINARY")
//!         .with_logical_type("STRING")
//!         .with_data(vec![RawValue::from("a"), RawValue::Null]),
//! ];
//!
//! let stats = convert_to_path(&fields, &WriterOptions::default(), "out.parquet")?;
//! println!("{}", stats);
//! # Ok::<(), parquetify::ParquetifyError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: field specs, logical type resolution and the message schema
//! - [`value`]: raw values and their coercion onto physical types
//! - [`record`]: row assembly and Dremel level shredding
//! - [`writer`]: writer options, the streaming writer and the conversion driver
//! - [`job`]: the JSON job document

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

mod error;
pub mod job;
pub mod record;
pub mod schema;
pub mod value;
pub mod writer;

pub use error::ParquetifyError;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::error::ParquetifyError;
    pub use crate::job::JobSpec;
    pub use crate::record::{assemble_record, Record, RowAssembler};
    pub use crate::schema::{build_schema, FieldSpec, LogicalAnnotation, MessageSchema, SchemaError};
    pub use crate::value::{coerce, ColumnCell, RawValue, ValueError};
    pub use crate::writer::{
        configure, convert_to_path, convert_to_writer, ConfigError, Conversion, ParquetifyWriter,
        WriterConfig, WriterError, WriterOptions, WriterStats,
    };
}
