use parquet::basic::Type as PhysicalType;

use crate::schema::LogicalAnnotation;

/// Errors raised while mapping input values onto columns.
///
/// Raised mid-write: the output of a run that hits one must be discarded.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// No mapping from the value's dynamic type to the column
    #[error("Unsupported data type '{value_type}' for column '{column}' ({physical_type}, {annotation})")]
    UnsupportedType {
        /// Column path
        column: String,
        /// Dynamic type of the offending value
        value_type: &'static str,
        /// Target physical type
        physical_type: PhysicalType,
        /// Target annotation
        annotation: LogicalAnnotation,
    },

    /// Numeric value does not fit the column width or integer annotation
    #[error("Value {value} does not fit {target} in column '{column}'")]
    OutOfRange {
        /// Column path
        column: String,
        /// Offending value
        value: String,
        /// Target width description
        target: String,
    },

    /// Text is not 32 hex digits
    #[error("Invalid UUID '{value}' for column '{column}': {reason}")]
    InvalidUuid {
        /// Column path
        column: String,
        /// Offending text
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// Byte payload length differs from the fixed column length
    #[error("Column '{column}' expects {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Column path
        column: String,
        /// Declared fixed length
        expected: usize,
        /// Actual payload length
        actual: usize,
    },

    /// Text is not a decimal number
    #[error("Invalid decimal '{value}' for column '{column}'")]
    InvalidDecimal {
        /// Column path
        column: String,
        /// Offending value
        value: String,
    },

    /// Decimal does not fit the declared precision or storage width
    #[error("Decimal '{value}' exceeds precision {precision} of column '{column}'")]
    DecimalOverflow {
        /// Column path
        column: String,
        /// Offending value
        value: String,
        /// Declared precision
        precision: i32,
    },

    /// Text does not parse as the column's temporal annotation
    #[error("Invalid {expected} '{value}' for column '{column}'")]
    InvalidTemporal {
        /// Column path
        column: String,
        /// Offending text
        value: String,
        /// Expected shape
        expected: &'static str,
    },

    /// A REQUIRED column or group has no value in a row
    #[error("Missing value for required field '{column}'")]
    MissingRequired {
        /// Field path
        column: String,
    },

    /// Second value for a non-repeated field in the same record
    #[error("Field '{column}' is not repeated and already has a value")]
    AlreadySet {
        /// Field path
        column: String,
    },

    /// Object member with no matching child in the group
    #[error("Group '{group}' has no field named '{field}'")]
    UnknownField {
        /// Group path
        group: String,
        /// Member name
        field: String,
    },

    /// `null` inside an array
    #[error("Null element in array for field '{column}'")]
    NullElement {
        /// Field path
        column: String,
    },

    /// Cell kind does not match the column buffer (a group value for a leaf or vice versa)
    #[error("Value shape does not match schema at '{column}'")]
    ShapeMismatch {
        /// Field path
        column: String,
    },
}
