//! # Values
//!
//! Dynamically typed input values and their coercion into the exact cell
//! representation a leaf column stores.
//!
//! [`coerce`] is a single exhaustive match over the value variant, the
//! column's physical type and its effective annotation. Combinations with no
//! mapping fail with [`ValueError::UnsupportedType`].

mod coerce;
/// Fixed-point decimal encoding
pub mod decimal;
mod error;
/// IEEE-754 half-precision conversion
pub mod float16;
mod raw;
/// DATE / TIME / TIMESTAMP / INT96 text parsing
pub mod temporal;

#[cfg(test)]
mod tests;

pub use coerce::{coerce, decode_uuid_hex, encode_uuid_hex, ColumnCell, ColumnTarget};
pub use error::ValueError;
pub use raw::RawValue;
