//! # Schema
//!
//! Turns the declarative `schema` array of a job into an immutable tree of
//! [`SchemaNode`]s and the matching encoder schema.
//!
//! ## Field tokens
//!
//! | `schemaType` | Node |
//! |--------------|------|
//! | `required` / `optional` / `repeated` | leaf column (needs `physicalType`) |
//! | `requiredGroup` / `optionalGroup` / `repeatedGroup` | group (needs `fields`) |
//!
//! Physical types: `BOOLEAN`, `INT32`, `INT64`, `INT96`, `FLOAT`, `DOUBLE`,
//! `BINARY`, `FIXED_LEN_BYTE_ARRAY` (case-sensitive).
//!
//! Logical types are resolved case-insensitively by [`resolve`]. Column
//! ordinals follow declaration order depth-first, so column *i* of the file
//! is always the *i*-th declared leaf.

mod builder;
mod error;
mod field_spec;
/// Logical type vocabulary and resolver
pub mod logical;
mod node;


pub use builder::{build_node, build_schema, parse_physical_type};
pub use error::SchemaError;
pub use field_spec::FieldSpec;
pub use logical::{resolve, LogicalAnnotation, LogicalParams, TimeUnit};
pub use node::{GroupNode, LeafColumn, MessageSchema, PrimitiveNode, SchemaNode, MESSAGE_NAME};
