use std::fmt;

use parquet::basic::{ConvertedType, LogicalType, TimeUnit as ParquetTimeUnit, Type as PhysicalType};

use super::error::SchemaError;

/// Default DECIMAL precision when the field spec leaves it out
pub const DEFAULT_DECIMAL_PRECISION: i32 = 10;

/// Default DECIMAL scale when the field spec leaves it out
pub const DEFAULT_DECIMAL_SCALE: i32 = 2;

/// Resolution of TIME / TIMESTAMP annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Milliseconds
    Millis,
    /// Microseconds
    Micros,
    /// Nanoseconds
    Nanos,
}

impl TimeUnit {
    fn to_parquet(self) -> ParquetTimeUnit {
        match self {
            TimeUnit::Millis => ParquetTimeUnit::MILLIS(Default::default()),
            TimeUnit::Micros => ParquetTimeUnit::MICROS(Default::default()),
            TimeUnit::Nanos => ParquetTimeUnit::NANOS(Default::default()),
        }
    }

    /// Number of units in one second
    pub fn per_second(self) -> i64 {
        match self {
            TimeUnit::Millis => 1_000,
            TimeUnit::Micros => 1_000_000,
            TimeUnit::Nanos => 1_000_000_000,
        }
    }
}

/// Semantic annotation layered on top of a physical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalAnnotation {
    /// No annotation
    #[default]
    None,
    /// UTF-8 text
    String,
    /// Fixed-point decimal
    Decimal {
        /// Total number of digits
        precision: i32,
        /// Digits after the decimal point
        scale: i32,
    },
    /// Days since the Unix epoch
    Date,
    /// Time of day
    Time(TimeUnit),
    /// Instant since the Unix epoch, UTC-adjusted
    Timestamp(TimeUnit),
    /// 16-byte UUID
    Uuid,
    /// Enumerated UTF-8 text
    Enum,
    /// JSON document
    Json,
    /// BSON document
    Bson,
    /// 12-byte (months, days, millis) interval
    Interval,
    /// Integer with explicit width and signedness
    Int {
        /// 8, 16, 32 or 64
        bit_width: u8,
        /// Signed when true
        signed: bool,
    },
    /// IEEE-754 binary16 in 2 bytes
    Float16,
    /// Key/value map group
    Map,
    /// List group
    List,
}

/// Parameters carried next to a logical type token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalParams {
    /// DECIMAL precision
    pub precision: Option<i32>,
    /// DECIMAL scale
    pub scale: Option<i32>,
}

/// Resolve a logical type token into an annotation.
///
/// Names match case-insensitively. `physical_type` is `None` for group nodes.
pub fn resolve(
    field: &str,
    name: &str,
    params: LogicalParams,
    physical_type: Option<PhysicalType>,
    fixed_length: Option<i32>,
) -> Result<LogicalAnnotation, SchemaError> {
    let annotation = match name.to_ascii_uppercase().as_str() {
        "NONE" => LogicalAnnotation::None,
        "UTF8" | "STRING" => LogicalAnnotation::String,
        "DECIMAL" => {
            let precision = params.precision.unwrap_or(DEFAULT_DECIMAL_PRECISION);
            let scale = params.scale.unwrap_or(DEFAULT_DECIMAL_SCALE);
            let invalid = |reason| SchemaError::InvalidDecimal {
                field: field.to_string(),
                precision,
                scale,
                reason,
            };
            if precision <= 0 {
                return Err(invalid("precision must be positive"));
            }
            if scale < 0 {
                return Err(invalid("scale must not be negative"));
            }
            if scale > precision {
                return Err(invalid("scale must not exceed precision"));
            }
            LogicalAnnotation::Decimal { precision, scale }
        }
        "DATE" => LogicalAnnotation::Date,
        "TIME_MILLIS" => LogicalAnnotation::Time(TimeUnit::Millis),
        "TIME_MICROS" => LogicalAnnotation::Time(TimeUnit::Micros),
        "TIME_NANOS" => LogicalAnnotation::Time(TimeUnit::Nanos),
        "TIMESTAMP_MILLIS" => LogicalAnnotation::Timestamp(TimeUnit::Millis),
        "TIMESTAMP_MICROS" => LogicalAnnotation::Timestamp(TimeUnit::Micros),
        "TIMESTAMP_NANOS" => LogicalAnnotation::Timestamp(TimeUnit::Nanos),
        "UUID" => LogicalAnnotation::Uuid,
        "ENUM" => LogicalAnnotation::Enum,
        "JSON" => LogicalAnnotation::Json,
        "BSON" => LogicalAnnotation::Bson,
        "INTERVAL" => LogicalAnnotation::Interval,
        "INT8" => int(8, true),
        "INT16" => int(16, true),
        "INT32" => int(32, true),
        "INT64" => int(64, true),
        "UINT8" => int(8, false),
        "UINT16" => int(16, false),
        "UINT32" => int(32, false),
        "UINT64" => int(64, false),
        "FLOAT16" => {
            let is_half = physical_type == Some(PhysicalType::FIXED_LEN_BYTE_ARRAY)
                && fixed_length == Some(2);
            if !is_half {
                return Err(SchemaError::InvalidFloat16 {
                    field: field.to_string(),
                });
            }
            LogicalAnnotation::Float16
        }
        "MAP" => LogicalAnnotation::Map,
        "LIST" => LogicalAnnotation::List,
        _ => {
            return Err(SchemaError::UnsupportedLogicalType {
                field: field.to_string(),
                token: name.to_string(),
            })
        }
    };
    Ok(annotation)
}

fn int(bit_width: u8, signed: bool) -> LogicalAnnotation {
    LogicalAnnotation::Int { bit_width, signed }
}

impl LogicalAnnotation {
    /// Encoder representation: modern logical type plus legacy converted type.
    ///
    /// INTERVAL has no logical-type form and is expressed only as a converted type.
    pub fn to_parquet(self) -> (Option<LogicalType>, ConvertedType) {
        let logical = match self {
            LogicalAnnotation::None => None,
            LogicalAnnotation::String => Some(LogicalType::String),
            LogicalAnnotation::Decimal { precision, scale } => {
                Some(LogicalType::Decimal { scale, precision })
            }
            LogicalAnnotation::Date => Some(LogicalType::Date),
            LogicalAnnotation::Time(unit) => Some(LogicalType::Time {
                is_adjusted_to_u_t_c: true,
                unit: unit.to_parquet(),
            }),
            LogicalAnnotation::Timestamp(unit) => Some(LogicalType::Timestamp {
                is_adjusted_to_u_t_c: true,
                unit: unit.to_parquet(),
            }),
            LogicalAnnotation::Uuid => Some(LogicalType::Uuid),
            LogicalAnnotation::Enum => Some(LogicalType::Enum),
            LogicalAnnotation::Json => Some(LogicalType::Json),
            LogicalAnnotation::Bson => Some(LogicalType::Bson),
            LogicalAnnotation::Interval => None,
            LogicalAnnotation::Int { bit_width, signed } => Some(LogicalType::Integer {
                bit_width: bit_width as i8,
                is_signed: signed,
            }),
            LogicalAnnotation::Float16 => Some(LogicalType::Float16),
            LogicalAnnotation::Map => Some(LogicalType::Map),
            LogicalAnnotation::List => Some(LogicalType::List),
        };
        let converted = match self {
            LogicalAnnotation::Interval => ConvertedType::INTERVAL,
            _ => ConvertedType::NONE,
        };
        (logical, converted)
    }

    /// Annotations that change how a value is coerced and may therefore be
    /// inherited from a group by leaves that declare nothing themselves.
    pub fn is_value_hint(self) -> bool {
        matches!(self, LogicalAnnotation::Uuid | LogicalAnnotation::Float16)
    }

    /// Whether this annotation can sit on a group node
    pub fn is_group_annotation(self) -> bool {
        matches!(
            self,
            LogicalAnnotation::None | LogicalAnnotation::Map | LogicalAnnotation::List
        )
    }
}

impl fmt::Display for LogicalAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalAnnotation::None => write!(f, "NONE"),
            LogicalAnnotation::String => write!(f, "STRING"),
            LogicalAnnotation::Decimal { precision, scale } => {
                write!(f, "DECIMAL({}, {})", precision, scale)
            }
            LogicalAnnotation::Date => write!(f, "DATE"),
            LogicalAnnotation::Time(unit) => write!(f, "TIME({:?})", unit),
            LogicalAnnotation::Timestamp(unit) => write!(f, "TIMESTAMP({:?})", unit),
            LogicalAnnotation::Uuid => write!(f, "UUID"),
            LogicalAnnotation::Enum => write!(f, "ENUM"),
            LogicalAnnotation::Json => write!(f, "JSON"),
            LogicalAnnotation::Bson => write!(f, "BSON"),
            LogicalAnnotation::Interval => write!(f, "INTERVAL"),
            LogicalAnnotation::Int { bit_width, signed } => {
                let prefix = if *signed { "" } else { "U" };
                write!(f, "{}INT{}", prefix, bit_width)
            }
            LogicalAnnotation::Float16 => write!(f, "FLOAT16"),
            LogicalAnnotation::Map => write!(f, "MAP"),
            LogicalAnnotation::List => write!(f, "LIST"),
        }
    }
}
