use serde::{Deserialize, Serialize};

use crate::value::RawValue;

use super::logical::LogicalParams;

/// Declarative description of one schema node, as it appears in the job
/// document's `schema` array.
///
/// Tokens are kept as strings so that an unknown token surfaces as a
/// [`SchemaError`](super::SchemaError) naming the field, not as a generic
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Column or group name
    pub name: String,

    /// `optional`, `required`, `repeated`, `optionalGroup`, `requiredGroup`
    /// or `repeatedGroup`
    pub schema_type: String,

    /// Physical type token; absent for groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<String>,

    /// Logical type token (defaults to `NONE`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_type: Option<String>,

    /// Byte length for FIXED_LEN_BYTE_ARRAY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i32>,

    /// DECIMAL precision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,

    /// DECIMAL scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,

    /// Nested fields for groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldSpec>>,

    /// Parallel per-row values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<RawValue>>,
}

impl FieldSpec {
    /// Leaf spec with the given repetition token and physical type
    pub fn leaf(name: impl Into<String>, schema_type: &str, physical_type: &str) -> Self {
        Self {
            name: name.into(),
            schema_type: schema_type.to_string(),
            physical_type: Some(physical_type.to_string()),
            ..Default::default()
        }
    }

    /// Group spec with the given repetition token and children
    pub fn group(name: impl Into<String>, schema_type: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            schema_type: schema_type.to_string(),
            fields: Some(fields),
            ..Default::default()
        }
    }

    /// Set the logical type token
    pub fn with_logical_type(mut self, logical_type: &str) -> Self {
        self.logical_type = Some(logical_type.to_string());
        self
    }

    /// Set the FIXED_LEN_BYTE_ARRAY length
    pub fn with_length(mut self, length: i32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set DECIMAL precision and scale
    pub fn with_decimal(mut self, precision: i32, scale: i32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Attach parallel per-row data
    pub fn with_data(mut self, data: Vec<RawValue>) -> Self {
        self.data = Some(data);
        self
    }

    pub(crate) fn logical_params(&self) -> LogicalParams {
        LogicalParams {
            precision: self.precision,
            scale: self.scale,
        }
    }

    /// True when this field or any nested field carries a data array
    pub fn has_data(&self) -> bool {
        self.data.is_some()
            || self
                .fields
                .as_ref()
                .is_some_and(|fields| fields.iter().any(FieldSpec::has_data))
    }
}
