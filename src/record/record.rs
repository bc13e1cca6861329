use parquet::basic::Repetition;

use crate::schema::{GroupNode, SchemaNode};
use crate::value::{ColumnCell, ValueError};

/// Value placed in one slot of a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Leaf cell
    Cell(ColumnCell),
    /// Nested group instance
    Group(Record<'a>),
}

/// One instance of a group: a value list per child ordinal.
///
/// Borrows the schema node it instantiates, so records cannot outlive the
/// schema they were assembled against.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    node: &'a GroupNode,
    slots: Vec<Vec<FieldValue<'a>>>,
}

impl<'a> Record<'a> {
    /// Empty instance of `node`
    pub fn new(node: &'a GroupNode) -> Self {
        Self {
            node,
            slots: vec![Vec::new(); node.children.len()],
        }
    }

    /// Group this record instantiates
    pub fn node(&self) -> &'a GroupNode {
        self.node
    }

    /// Values added for the child at `ordinal`
    pub fn values(&self, ordinal: usize) -> &[FieldValue<'a>] {
        self.slots.get(ordinal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no child has a value
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    /// Append a leaf cell for the child at `ordinal`
    pub fn add_cell(&mut self, ordinal: usize, cell: ColumnCell) -> Result<(), ValueError> {
        match self.child(ordinal)? {
            SchemaNode::Primitive(_) => self.push(ordinal, FieldValue::Cell(cell)),
            SchemaNode::Group(group) => Err(ValueError::ShapeMismatch {
                column: group.path.clone(),
            }),
        }
    }

    /// Append a group instance for the child at `ordinal`
    pub fn add_group(&mut self, ordinal: usize, record: Record<'a>) -> Result<(), ValueError> {
        match self.child(ordinal)? {
            SchemaNode::Group(group) if std::ptr::eq(group, record.node) => {
                self.push(ordinal, FieldValue::Group(record))
            }
            other => Err(ValueError::ShapeMismatch {
                column: other.path().to_string(),
            }),
        }
    }

    /// Ordinal of the child called `name`
    pub fn ordinal(&self, name: &str) -> Result<usize, ValueError> {
        self.node.child_index(name).ok_or_else(|| ValueError::UnknownField {
            group: self.node.display_path().to_string(),
            field: name.to_string(),
        })
    }

    fn child(&self, ordinal: usize) -> Result<&'a SchemaNode, ValueError> {
        self.node.children.get(ordinal).ok_or_else(|| ValueError::UnknownField {
            group: self.node.display_path().to_string(),
            field: format!("#{}", ordinal),
        })
    }

    fn push(&mut self, ordinal: usize, value: FieldValue<'a>) -> Result<(), ValueError> {
        let child = self.child(ordinal)?;
        let slot = &mut self.slots[ordinal];
        if child.repetition() != Repetition::REPEATED && !slot.is_empty() {
            return Err(ValueError::AlreadySet {
                column: child.path().to_string(),
            });
        }
        slot.push(value);
        Ok(())
    }
}
