/// Errors raised while turning declarative field specs into a message schema.
///
/// Every variant names the dotted path of the field it was raised for, so a
/// failing job can be fixed without re-reading the whole document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// `schemaType` token is not one of the six recognised repetition kinds
    #[error("Unsupported schema type '{token}' for field '{field}'")]
    UnsupportedSchemaType {
        /// Field path
        field: String,
        /// Offending token
        token: String,
    },

    /// `physicalType` token is not a physical type name (matching is case-sensitive)
    #[error("Unsupported physical type '{token}' for field '{field}'")]
    UnsupportedPhysicalType {
        /// Field path
        field: String,
        /// Offending token
        token: String,
    },

    /// `logicalType` token is not in the resolver vocabulary
    #[error("Unsupported logical type '{token}' for field '{field}'")]
    UnsupportedLogicalType {
        /// Field path
        field: String,
        /// Offending token
        token: String,
    },

    /// FIXED_LEN_BYTE_ARRAY without a positive `length`
    #[error("Field '{field}' is FIXED_LEN_BYTE_ARRAY and needs a positive length, got {length:?}")]
    InvalidFixedLength {
        /// Field path
        field: String,
        /// Declared length, if any
        length: Option<i32>,
    },

    /// DECIMAL precision/scale out of bounds
    #[error("Invalid DECIMAL({precision}, {scale}) for field '{field}': {reason}")]
    InvalidDecimal {
        /// Field path
        field: String,
        /// Declared precision
        precision: i32,
        /// Declared scale
        scale: i32,
        /// Which bound was violated
        reason: &'static str,
    },

    /// FLOAT16 declared on anything but FIXED_LEN_BYTE_ARRAY(2)
    #[error("FLOAT16 on field '{field}' requires FIXED_LEN_BYTE_ARRAY with length 2")]
    InvalidFloat16 {
        /// Field path
        field: String,
    },

    /// Annotation is not valid for the node's physical type or shape
    #[error("Logical type {annotation} is not valid for field '{field}': {reason}")]
    IncompatibleAnnotation {
        /// Field path
        field: String,
        /// Annotation name
        annotation: String,
        /// Reason reported by the encoder
        reason: String,
    },

    /// Group-level logical type other than MAP, LIST, UUID or FLOAT16
    #[error("Logical type '{token}' cannot be applied to group '{field}'")]
    UnsupportedGroupAnnotation {
        /// Field path
        field: String,
        /// Offending token
        token: String,
    },

    /// Field has no physical type and no nested `fields`
    #[error("Field '{field}' has neither a physical type nor nested fields")]
    MissingFields {
        /// Field path
        field: String,
    },

    /// Field declares both a physical type and nested `fields`
    #[error("Field '{field}' declares both a physical type and nested fields")]
    LeafWithFields {
        /// Field path
        field: String,
    },

    /// `precision` or `scale` given without a DECIMAL logical type
    #[error("Field '{field}' sets precision or scale but its logical type is not DECIMAL")]
    DecimalParamsWithoutDecimal {
        /// Field path
        field: String,
    },

    /// Group declared with an empty `fields` list
    #[error("Group '{field}' must declare at least one field")]
    EmptyGroup {
        /// Field path
        field: String,
    },

    /// Two siblings share a name
    #[error("Duplicate field name '{name}' in group '{group}'")]
    DuplicateField {
        /// Parent group path (`schema` for the message root)
        group: String,
        /// Repeated name
        name: String,
    },

    /// The job declares no top-level fields at all
    #[error("Schema must declare at least one field")]
    EmptySchema,
}
