use parquet::basic::Type as PhysicalType;
use parquet::data_type::{ByteArray, FixedLenByteArray, Int96};
use uuid::Uuid;

use crate::schema::{LogicalAnnotation, PrimitiveNode};

use super::decimal::{self, DecimalError};
use super::error::ValueError;
use super::float16;
use super::raw::RawValue;
use super::temporal;

/// On-disk-ready value for one leaf cell, tagged by physical type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnCell {
    /// BOOLEAN
    Boolean(bool),
    /// INT32
    Int32(i32),
    /// INT64
    Int64(i64),
    /// INT96
    Int96(Int96),
    /// FLOAT
    Float(f32),
    /// DOUBLE
    Double(f64),
    /// BINARY
    ByteArray(ByteArray),
    /// FIXED_LEN_BYTE_ARRAY
    FixedLenByteArray(FixedLenByteArray),
}

impl ColumnCell {
    /// Physical type this cell belongs to
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            ColumnCell::Boolean(_) => PhysicalType::BOOLEAN,
            ColumnCell::Int32(_) => PhysicalType::INT32,
            ColumnCell::Int64(_) => PhysicalType::INT64,
            ColumnCell::Int96(_) => PhysicalType::INT96,
            ColumnCell::Float(_) => PhysicalType::FLOAT,
            ColumnCell::Double(_) => PhysicalType::DOUBLE,
            ColumnCell::ByteArray(_) => PhysicalType::BYTE_ARRAY,
            ColumnCell::FixedLenByteArray(_) => PhysicalType::FIXED_LEN_BYTE_ARRAY,
        }
    }

    /// Approximate encoded size in bytes, used for row-group sizing
    pub fn encoded_size(&self) -> usize {
        match self {
            ColumnCell::Boolean(_) => 1,
            ColumnCell::Int32(_) | ColumnCell::Float(_) => 4,
            ColumnCell::Int64(_) | ColumnCell::Double(_) => 8,
            ColumnCell::Int96(_) => 12,
            ColumnCell::ByteArray(v) => 4 + v.len(),
            ColumnCell::FixedLenByteArray(v) => v.len(),
        }
    }
}

/// Leaf column a value is being coerced for
#[derive(Debug, Clone, Copy)]
pub struct ColumnTarget<'a> {
    /// Dotted column path, for diagnostics
    pub column: &'a str,
    /// Storage type
    pub physical_type: PhysicalType,
    /// Effective annotation
    pub annotation: LogicalAnnotation,
    /// Byte width for FIXED_LEN_BYTE_ARRAY
    pub fixed_length: Option<i32>,
}

impl<'a> ColumnTarget<'a> {
    /// Target for a leaf. The leaf's own annotation wins; `hint` only applies
    /// when the leaf declares none.
    pub fn for_leaf(node: &'a PrimitiveNode, hint: Option<LogicalAnnotation>) -> Self {
        let annotation = match (node.annotation, hint) {
            (LogicalAnnotation::None, Some(hint)) => hint,
            (own, _) => own,
        };
        Self {
            column: node.path.as_str(),
            physical_type: node.physical_type,
            annotation,
            fixed_length: node.fixed_length,
        }
    }
}

/// Convert one raw value into the exact representation its column stores.
///
/// `null`, objects and arrays are structural and handled by the row
/// assembler; they only reach this function for JSON-annotated leaves.
pub fn coerce(raw: &RawValue, target: &ColumnTarget<'_>) -> Result<ColumnCell, ValueError> {
    match raw {
        RawValue::Null => Err(unsupported(raw, target)),
        RawValue::Boolean(b) => match target.physical_type {
            PhysicalType::BOOLEAN => Ok(ColumnCell::Boolean(*b)),
            _ => Err(unsupported(raw, target)),
        },
        RawValue::Integer(i) => from_integer(*i, raw, target),
        RawValue::Float(f) => from_float(*f, raw, target),
        RawValue::Text(s) => from_text(s, raw, target),
        RawValue::Bytes(bytes) => from_bytes(bytes, raw, target),
        RawValue::Object(_) | RawValue::Array(_) => {
            match (target.physical_type, target.annotation) {
                (PhysicalType::BYTE_ARRAY, LogicalAnnotation::Json) => {
                    let text = raw.to_json().to_string();
                    Ok(ColumnCell::ByteArray(ByteArray::from(text.into_bytes())))
                }
                _ => Err(unsupported(raw, target)),
            }
        }
    }
}

fn from_integer(i: i128, raw: &RawValue, target: &ColumnTarget<'_>) -> Result<ColumnCell, ValueError> {
    match (target.physical_type, target.annotation) {
        (_, LogicalAnnotation::Decimal { precision, scale }) => {
            let unscaled = decimal::unscaled_from_integer(i, scale)
                .map_err(|e| decimal_error(e, raw, target, precision))?;
            store_decimal(unscaled, raw, target, precision)
        }
        (PhysicalType::INT32, LogicalAnnotation::Int { bit_width, signed }) => {
            let (min, max) = int_bounds(bit_width, signed);
            if i < min || i > max {
                return Err(out_of_range(raw, target, &target.annotation.to_string()));
            }
            // UINT32 keeps its bit pattern in the signed physical width
            Ok(ColumnCell::Int32(i as u32 as i32))
        }
        (PhysicalType::INT32, _) => i32::try_from(i)
            .map(ColumnCell::Int32)
            .map_err(|_| out_of_range(raw, target, "INT32")),
        (PhysicalType::INT64, LogicalAnnotation::Int { signed: false, .. }) => u64::try_from(i)
            .map(|v| ColumnCell::Int64(v as i64))
            .map_err(|_| out_of_range(raw, target, "UINT64")),
        (PhysicalType::INT64, _) => i64::try_from(i)
            .map(ColumnCell::Int64)
            .map_err(|_| out_of_range(raw, target, "INT64")),
        (PhysicalType::INT96, _) => temporal::int96_from_nanos(i)
            .map(ColumnCell::Int96)
            .ok_or_else(|| out_of_range(raw, target, "INT96 timestamp")),
        (PhysicalType::FLOAT, _) => Ok(ColumnCell::Float(i as f32)),
        (PhysicalType::DOUBLE, _) => Ok(ColumnCell::Double(i as f64)),
        (PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalAnnotation::Float16) => {
            fixed_cell(float16::f32_to_f16_le_bytes(i as f32).to_vec(), target)
        }
        (PhysicalType::BOOLEAN | PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY, _) => {
            Err(unsupported(raw, target))
        }
    }
}

fn from_float(f: f64, raw: &RawValue, target: &ColumnTarget<'_>) -> Result<ColumnCell, ValueError> {
    match (target.physical_type, target.annotation) {
        (_, LogicalAnnotation::Decimal { precision, scale }) => {
            let unscaled = decimal::unscaled_from_f64(f, scale)
                .map_err(|e| decimal_error(e, raw, target, precision))?;
            store_decimal(unscaled, raw, target, precision)
        }
        (PhysicalType::FLOAT, _) => Ok(ColumnCell::Float(f as f32)),
        (PhysicalType::DOUBLE, _) => Ok(ColumnCell::Double(f)),
        (PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalAnnotation::Float16) => {
            fixed_cell(float16::f32_to_f16_le_bytes(f as f32).to_vec(), target)
        }
        // Integral floats (`3.0`) are lossless for integer columns
        (PhysicalType::INT32 | PhysicalType::INT64, _) if f.fract() == 0.0 && f.abs() < 1e38 => {
            from_integer(f as i128, raw, target)
        }
        (
            PhysicalType::BOOLEAN
            | PhysicalType::INT32
            | PhysicalType::INT64
            | PhysicalType::INT96
            | PhysicalType::BYTE_ARRAY
            | PhysicalType::FIXED_LEN_BYTE_ARRAY,
            _,
        ) => Err(unsupported(raw, target)),
    }
}

fn from_text(s: &str, raw: &RawValue, target: &ColumnTarget<'_>) -> Result<ColumnCell, ValueError> {
    match (target.physical_type, target.annotation) {
        (_, LogicalAnnotation::Decimal { precision, scale }) => {
            let unscaled = decimal::parse_unscaled(s, scale)
                .map_err(|e| decimal_error(e, raw, target, precision))?;
            store_decimal(unscaled, raw, target, precision)
        }
        (PhysicalType::BYTE_ARRAY, _) => Ok(ColumnCell::ByteArray(ByteArray::from(s.as_bytes().to_vec()))),
        (PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalAnnotation::Uuid) => {
            fixed_cell(decode_uuid_hex(s, target.column)?.to_vec(), target)
        }
        (PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalAnnotation::Float16) => Err(unsupported(raw, target)),
        (PhysicalType::FIXED_LEN_BYTE_ARRAY, _) => fixed_cell(s.as_bytes().to_vec(), target),
        (PhysicalType::INT32, LogicalAnnotation::Date) => temporal::parse_date(s)
            .map(ColumnCell::Int32)
            .ok_or_else(|| invalid_temporal(s, target, "date (YYYY-MM-DD)")),
        (PhysicalType::INT32, LogicalAnnotation::Time(unit)) => temporal::parse_time(s, unit)
            .and_then(|v| i32::try_from(v).ok())
            .map(ColumnCell::Int32)
            .ok_or_else(|| invalid_temporal(s, target, "time (HH:MM:SS)")),
        (PhysicalType::INT64, LogicalAnnotation::Time(unit)) => temporal::parse_time(s, unit)
            .map(ColumnCell::Int64)
            .ok_or_else(|| invalid_temporal(s, target, "time (HH:MM:SS)")),
        (PhysicalType::INT64, LogicalAnnotation::Timestamp(unit)) => temporal::parse_timestamp(s, unit)
            .map(ColumnCell::Int64)
            .ok_or_else(|| invalid_temporal(s, target, "timestamp (RFC 3339)")),
        (PhysicalType::INT96, _) => temporal::parse_int96(s)
            .map(ColumnCell::Int96)
            .ok_or_else(|| invalid_temporal(s, target, "timestamp (RFC 3339)")),
        (
            PhysicalType::BOOLEAN
            | PhysicalType::INT32
            | PhysicalType::INT64
            | PhysicalType::FLOAT
            | PhysicalType::DOUBLE,
            _,
        ) => Err(unsupported(raw, target)),
    }
}

fn from_bytes(bytes: &[u8], raw: &RawValue, target: &ColumnTarget<'_>) -> Result<ColumnCell, ValueError> {
    match target.physical_type {
        PhysicalType::BYTE_ARRAY => Ok(ColumnCell::ByteArray(ByteArray::from(bytes.to_vec()))),
        PhysicalType::FIXED_LEN_BYTE_ARRAY => fixed_cell(bytes.to_vec(), target),
        PhysicalType::INT96 => {
            if bytes.len() != 12 {
                return Err(ValueError::LengthMismatch {
                    column: target.column.to_string(),
                    expected: 12,
                    actual: bytes.len(),
                });
            }
            let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
            let mut value = Int96::new();
            value.set_data(word(0), word(4), word(8));
            Ok(ColumnCell::Int96(value))
        }
        PhysicalType::BOOLEAN
        | PhysicalType::INT32
        | PhysicalType::INT64
        | PhysicalType::FLOAT
        | PhysicalType::DOUBLE => Err(unsupported(raw, target)),
    }
}

fn store_decimal(
    unscaled: i128,
    raw: &RawValue,
    target: &ColumnTarget<'_>,
    precision: i32,
) -> Result<ColumnCell, ValueError> {
    let overflow = || ValueError::DecimalOverflow {
        column: target.column.to_string(),
        value: display(raw),
        precision,
    };
    if !decimal::fits_precision(unscaled, precision) {
        return Err(overflow());
    }
    match target.physical_type {
        PhysicalType::INT32 => i32::try_from(unscaled).map(ColumnCell::Int32).map_err(|_| overflow()),
        PhysicalType::INT64 => i64::try_from(unscaled).map(ColumnCell::Int64).map_err(|_| overflow()),
        PhysicalType::BYTE_ARRAY => Ok(ColumnCell::ByteArray(ByteArray::from(
            decimal::to_minimal_be_bytes(unscaled),
        ))),
        PhysicalType::FIXED_LEN_BYTE_ARRAY => {
            let len = target.fixed_length.unwrap_or(0).max(0) as usize;
            decimal::to_fixed_be_bytes(unscaled, len)
                .map(|bytes| ColumnCell::FixedLenByteArray(FixedLenByteArray::from(bytes)))
                .ok_or_else(overflow)
        }
        PhysicalType::BOOLEAN | PhysicalType::INT96 | PhysicalType::FLOAT | PhysicalType::DOUBLE => {
            Err(unsupported(raw, target))
        }
    }
}

/// Decode 32 hex digits (no dashes) into the 16 UUID bytes
pub fn decode_uuid_hex(text: &str, column: &str) -> Result<[u8; 16], ValueError> {
    let invalid = |reason: String| ValueError::InvalidUuid {
        column: column.to_string(),
        value: text.to_string(),
        reason,
    };
    if text.len() != 32 {
        return Err(invalid(format!("expected 32 hex digits, got {} characters", text.len())));
    }
    Uuid::try_parse(text)
        .map(|uuid| *uuid.as_bytes())
        .map_err(|e| invalid(e.to_string()))
}

/// Lowercase 32-digit hex form of UUID bytes
pub fn encode_uuid_hex(bytes: &[u8; 16]) -> String {
    Uuid::from_bytes(*bytes).simple().to_string()
}

fn fixed_cell(bytes: Vec<u8>, target: &ColumnTarget<'_>) -> Result<ColumnCell, ValueError> {
    let expected = target.fixed_length.unwrap_or(0).max(0) as usize;
    if bytes.len() != expected {
        return Err(ValueError::LengthMismatch {
            column: target.column.to_string(),
            expected,
            actual: bytes.len(),
        });
    }
    Ok(ColumnCell::FixedLenByteArray(FixedLenByteArray::from(bytes)))
}

fn int_bounds(bit_width: u8, signed: bool) -> (i128, i128) {
    let bits = bit_width as u32;
    if signed {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    }
}

fn display(raw: &RawValue) -> String {
    match raw {
        RawValue::Text(s) => s.clone(),
        other => other.to_json().to_string(),
    }
}

fn unsupported(raw: &RawValue, target: &ColumnTarget<'_>) -> ValueError {
    ValueError::UnsupportedType {
        column: target.column.to_string(),
        value_type: raw.type_name(),
        physical_type: target.physical_type,
        annotation: target.annotation,
    }
}

fn out_of_range(raw: &RawValue, target: &ColumnTarget<'_>, width: &str) -> ValueError {
    ValueError::OutOfRange {
        column: target.column.to_string(),
        value: display(raw),
        target: width.to_string(),
    }
}

fn invalid_temporal(text: &str, target: &ColumnTarget<'_>, expected: &'static str) -> ValueError {
    ValueError::InvalidTemporal {
        column: target.column.to_string(),
        value: text.to_string(),
        expected,
    }
}

fn decimal_error(error: DecimalError, raw: &RawValue, target: &ColumnTarget<'_>, precision: i32) -> ValueError {
    match error {
        DecimalError::Malformed => ValueError::InvalidDecimal {
            column: target.column.to_string(),
            value: display(raw),
        },
        DecimalError::Overflow => ValueError::DecimalOverflow {
            column: target.column.to_string(),
            value: display(raw),
            precision,
        },
    }
}
