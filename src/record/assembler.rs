use parquet::basic::Repetition;

use crate::schema::{FieldSpec, GroupNode, LogicalAnnotation, MessageSchema, SchemaNode, MESSAGE_NAME};
use crate::value::{coerce, ColumnTarget, RawValue, ValueError};

use super::error::DataError;
use super::record::Record;

/// Member name scalar array elements are wrapped under when they populate a group
pub const ELEMENT_NAME: &str = "element";

/// Number of rows described by parallel `data` arrays.
///
/// Every `data` array counts, including those on fields nested inside groups
/// that carry no array of their own. The result is the shortest non-zero
/// length. Rows past the end of a longer array are dropped; a row past the
/// end of a shorter (empty) array reads as `null`.
pub fn row_count(fields: &[FieldSpec]) -> Result<usize, DataError> {
    let mut lengths = Vec::new();
    collect_lengths(fields, &mut lengths);
    if lengths.is_empty() {
        return Err(DataError::NoRows);
    }
    Ok(lengths.into_iter().filter(|&len| len > 0).min().unwrap_or(0))
}

fn collect_lengths(fields: &[FieldSpec], lengths: &mut Vec<usize>) {
    for field in fields {
        match (&field.data, &field.fields) {
            (Some(data), _) => lengths.push(data.len()),
            (None, Some(children)) => collect_lengths(children, lengths),
            (None, None) => {}
        }
    }
}

/// Builds one [`Record`] per row from a job's parallel `data` arrays.
pub struct RowAssembler<'a> {
    schema: &'a MessageSchema,
    fields: &'a [FieldSpec],
}

impl<'a> RowAssembler<'a> {
    /// Assembler over `fields`, which must be the specs `schema` was built from
    pub fn new(schema: &'a MessageSchema, fields: &'a [FieldSpec]) -> Self {
        Self { schema, fields }
    }

    /// Rows available in the data arrays
    pub fn row_count(&self) -> Result<usize, DataError> {
        row_count(self.fields)
    }

    /// Assemble the record at `row`
    pub fn assemble_row(&self, row: usize) -> Result<Record<'a>, ValueError> {
        let mut record = Record::new(self.schema.root());
        fill_columnar(&mut record, self.fields, row, None)?;
        Ok(record)
    }
}

/// Assemble a record from one row-shaped object keyed by top-level field name
pub fn assemble_record<'a>(schema: &'a MessageSchema, value: &RawValue) -> Result<Record<'a>, ValueError> {
    match value {
        RawValue::Object(_) => build_instance(schema.root(), value, None),
        _ => Err(ValueError::ShapeMismatch {
            column: MESSAGE_NAME.to_string(),
        }),
    }
}

/// Pull the value at `row` from every spec carrying data. A group without its
/// own data whose descendants carry data is assembled column-wise as well.
fn fill_columnar<'a>(
    record: &mut Record<'a>,
    specs: &[FieldSpec],
    row: usize,
    hint: Option<LogicalAnnotation>,
) -> Result<(), ValueError> {
    let node = record.node();
    for (ordinal, (spec, child)) in specs.iter().zip(&node.children).enumerate() {
        match (&spec.data, &spec.fields, child) {
            (Some(data), _, _) => {
                let value = data.get(row).unwrap_or(&RawValue::Null);
                put_value(record, ordinal, value, hint)?;
            }
            (None, Some(children), SchemaNode::Group(group)) if spec.has_data() => {
                let mut nested = Record::new(group);
                fill_columnar(&mut nested, children, row, group.value_hint.or(hint))?;
                if !nested.is_empty() {
                    record.add_group(ordinal, nested)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Place `value` into the slot at `ordinal`, recursing into groups.
///
/// `null` leaves the slot empty; REQUIRED fields are enforced when the record
/// is shredded.
fn put_value<'a>(
    record: &mut Record<'a>,
    ordinal: usize,
    value: &RawValue,
    hint: Option<LogicalAnnotation>,
) -> Result<(), ValueError> {
    let child = &record.node().children[ordinal];
    match (value, child) {
        (RawValue::Null, _) => Ok(()),
        (RawValue::Array(items), SchemaNode::Primitive(leaf)) if leaf.repetition == Repetition::REPEATED => {
            let target = ColumnTarget::for_leaf(leaf, hint);
            for item in items {
                if item.is_null() {
                    return Err(ValueError::NullElement {
                        column: leaf.path.clone(),
                    });
                }
                record.add_cell(ordinal, coerce(item, &target)?)?;
            }
            Ok(())
        }
        (_, SchemaNode::Primitive(leaf)) => {
            let target = ColumnTarget::for_leaf(leaf, hint);
            record.add_cell(ordinal, coerce(value, &target)?)
        }
        (RawValue::Array(items), SchemaNode::Group(group)) if group.repetition == Repetition::REPEATED => {
            for item in items {
                if item.is_null() {
                    return Err(ValueError::NullElement {
                        column: group.path.clone(),
                    });
                }
                record.add_group(ordinal, build_instance(group, item, hint)?)?;
            }
            Ok(())
        }
        (RawValue::Array(_), SchemaNode::Group(group)) if is_list_shape(group) => {
            // Three-level list: open the outer group and hand the array to
            // its single repeated child
            let mut outer = Record::new(group);
            put_value(&mut outer, 0, value, group.value_hint.or(hint))?;
            record.add_group(ordinal, outer)
        }
        (_, SchemaNode::Group(group)) => record.add_group(ordinal, build_instance(group, value, hint)?),
    }
}

/// One instance of `group`: object members populate it by name, anything
/// else is wrapped under [`ELEMENT_NAME`].
fn build_instance<'a>(
    group: &'a GroupNode,
    value: &RawValue,
    hint: Option<LogicalAnnotation>,
) -> Result<Record<'a>, ValueError> {
    let hint = group.value_hint.or(hint);
    let mut record = Record::new(group);
    match value {
        RawValue::Object(members) => {
            for (name, member) in members {
                let ordinal = record.ordinal(name)?;
                put_value(&mut record, ordinal, member, hint)?;
            }
        }
        other => {
            let ordinal = record.ordinal(ELEMENT_NAME)?;
            put_value(&mut record, ordinal, other, hint)?;
        }
    }
    Ok(record)
}

fn is_list_shape(group: &GroupNode) -> bool {
    matches!(group.children.as_slice(), [only] if only.repetition() == Repetition::REPEATED)
}
