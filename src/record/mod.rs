//! # Records
//!
//! Row assembly: pulls one row out of a job's parallel `data` arrays (or a
//! row-shaped object), coerces every leaf value and arranges the cells into a
//! [`Record`] tree that mirrors the schema. [`RowBuffer`] then shreds records
//! into per-column values with definition and repetition levels.
//!
//! ## Row count
//!
//! The number of rows is the shortest **non-zero** `data` array length.
//! Longer arrays are truncated silently.

mod assembler;
mod error;
#[allow(clippy::module_inception)]
mod record;
mod shred;


pub use assembler::{assemble_record, row_count, RowAssembler, ELEMENT_NAME};
pub use error::DataError;
pub use record::{FieldValue, Record};
pub use shred::{ColumnChunkBuffer, RowBuffer};
