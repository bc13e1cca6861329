use std::collections::HashSet;

use parquet::basic::{Repetition, Type as PhysicalType};

use super::error::SchemaError;
use super::field_spec::FieldSpec;
use super::logical::{self, LogicalAnnotation};
use super::node::{GroupNode, MessageSchema, PrimitiveNode, SchemaNode, MESSAGE_NAME};

/// Build the message schema for a list of top-level field specs.
///
/// Fails on the first invalid token; no partial schema is ever returned.
/// Field order in the result mirrors declaration order exactly.
pub fn build_schema(fields: &[FieldSpec]) -> Result<MessageSchema, SchemaError> {
    if fields.is_empty() {
        return Err(SchemaError::EmptySchema);
    }
    let root = GroupNode {
        name: MESSAGE_NAME.to_string(),
        path: String::new(),
        repetition: Repetition::REQUIRED,
        annotation: LogicalAnnotation::None,
        value_hint: None,
        children: build_children("", fields)?,
    };
    let schema = MessageSchema::new(root)?;
    log::debug!(
        "Built schema with {} top-level fields and {} leaf columns",
        fields.len(),
        schema.num_columns()
    );
    Ok(schema)
}

fn build_children(parent: &str, fields: &[FieldSpec]) -> Result<Vec<SchemaNode>, SchemaError> {
    let mut seen = HashSet::with_capacity(fields.len());
    let mut children = Vec::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                group: if parent.is_empty() {
                    MESSAGE_NAME.to_string()
                } else {
                    parent.to_string()
                },
                name: field.name.clone(),
            });
        }
        children.push(build_node(parent, field)?);
    }
    Ok(children)
}

/// Build one node; groups recurse into their children first.
pub fn build_node(parent: &str, field: &FieldSpec) -> Result<SchemaNode, SchemaError> {
    let path = if parent.is_empty() {
        field.name.clone()
    } else {
        format!("{}.{}", parent, field.name)
    };

    match (&field.physical_type, &field.fields) {
        (Some(_), Some(_)) => Err(SchemaError::LeafWithFields { field: path }),
        (Some(token), None) => build_primitive(path, field, token).map(SchemaNode::Primitive),
        (None, _) => build_group(path, field).map(SchemaNode::Group),
    }
}

/// `precision` and `scale` only mean something under a DECIMAL annotation
fn check_decimal_params(path: &str, field: &FieldSpec, annotation: &LogicalAnnotation) -> Result<(), SchemaError> {
    let has_params = field.precision.is_some() || field.scale.is_some();
    if has_params && !matches!(annotation, LogicalAnnotation::Decimal { .. }) {
        return Err(SchemaError::DecimalParamsWithoutDecimal {
            field: path.to_string(),
        });
    }
    Ok(())
}

fn build_primitive(path: String, field: &FieldSpec, token: &str) -> Result<PrimitiveNode, SchemaError> {
    let physical_type = parse_physical_type(&path, token)?;
    let repetition = match field.schema_type.as_str() {
        "required" => Repetition::REQUIRED,
        "optional" => Repetition::OPTIONAL,
        "repeated" => Repetition::REPEATED,
        other => {
            return Err(SchemaError::UnsupportedSchemaType {
                field: path,
                token: other.to_string(),
            })
        }
    };

    let fixed_length = if physical_type == PhysicalType::FIXED_LEN_BYTE_ARRAY {
        match field.length {
            Some(length) if length > 0 => Some(length),
            length => return Err(SchemaError::InvalidFixedLength { field: path, length }),
        }
    } else {
        None
    };

    let annotation = logical::resolve(
        &path,
        field.logical_type.as_deref().unwrap_or("NONE"),
        field.logical_params(),
        Some(physical_type),
        fixed_length,
    )?;
    check_decimal_params(&path, field, &annotation)?;

    Ok(PrimitiveNode {
        name: field.name.clone(),
        path,
        physical_type,
        repetition,
        annotation,
        fixed_length,
    })
}

fn build_group(path: String, field: &FieldSpec) -> Result<GroupNode, SchemaError> {
    let repetition = match field.schema_type.as_str() {
        "requiredGroup" => Repetition::REQUIRED,
        "optionalGroup" => Repetition::OPTIONAL,
        "repeatedGroup" => Repetition::REPEATED,
        other => {
            return Err(SchemaError::UnsupportedSchemaType {
                field: path,
                token: other.to_string(),
            })
        }
    };

    let fields = match &field.fields {
        Some(fields) if fields.is_empty() => return Err(SchemaError::EmptyGroup { field: path }),
        Some(fields) => fields,
        None => return Err(SchemaError::MissingFields { field: path }),
    };

    let token = field.logical_type.as_deref().unwrap_or("NONE");
    // FLOAT16 on a group is only a hint for its leaves, which carry the
    // fixed length the resolver would otherwise insist on
    let resolved = if token.eq_ignore_ascii_case("FLOAT16") {
        LogicalAnnotation::Float16
    } else {
        logical::resolve(&path, token, field.logical_params(), None, None)?
    };
    check_decimal_params(&path, field, &resolved)?;
    let (annotation, value_hint) = if resolved.is_group_annotation() {
        (resolved, None)
    } else if resolved.is_value_hint() {
        (LogicalAnnotation::None, Some(resolved))
    } else {
        return Err(SchemaError::UnsupportedGroupAnnotation {
            field: path,
            token: token.to_string(),
        });
    };

    let children = build_children(&path, fields)?;
    Ok(GroupNode {
        name: field.name.clone(),
        path,
        repetition,
        annotation,
        value_hint,
        children,
    })
}

/// Parse a physical type token. Matching is case-sensitive.
pub fn parse_physical_type(field: &str, token: &str) -> Result<PhysicalType, SchemaError> {
    let physical_type = match token {
        "BOOLEAN" => PhysicalType::BOOLEAN,
        "INT32" => PhysicalType::INT32,
        "INT64" => PhysicalType::INT64,
        "INT96" => PhysicalType::INT96,
        "FLOAT" => PhysicalType::FLOAT,
        "DOUBLE" => PhysicalType::DOUBLE,
        "BINARY" => PhysicalType::BYTE_ARRAY,
        "FIXED_LEN_BYTE_ARRAY" => PhysicalType::FIXED_LEN_BYTE_ARRAY,
        other => {
            return Err(SchemaError::UnsupportedPhysicalType {
                field: field.to_string(),
                token: other.to_string(),
            })
        }
    };
    Ok(physical_type)
}
