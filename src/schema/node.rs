use std::sync::Arc;

use parquet::basic::{Repetition, Type as PhysicalType};
use parquet::schema::types::{SchemaDescPtr, SchemaDescriptor, Type, TypePtr};

use super::error::SchemaError;
use super::logical::LogicalAnnotation;

/// Name of the message root
pub const MESSAGE_NAME: &str = "schema";

/// Leaf column of the schema tree
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveNode {
    /// Declared name
    pub name: String,
    /// Dotted path from the message root
    pub path: String,
    /// On-disk storage type
    pub physical_type: PhysicalType,
    /// Multiplicity
    pub repetition: Repetition,
    /// Declared annotation
    pub annotation: LogicalAnnotation,
    /// Byte width for FIXED_LEN_BYTE_ARRAY
    pub fixed_length: Option<i32>,
}

/// Interior node of the schema tree
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    /// Declared name
    pub name: String,
    /// Dotted path from the message root (empty for the root)
    pub path: String,
    /// Multiplicity
    pub repetition: Repetition,
    /// MAP / LIST / NONE
    pub annotation: LogicalAnnotation,
    /// UUID / FLOAT16 inherited by descendant leaves without an annotation
    pub value_hint: Option<LogicalAnnotation>,
    /// Children in declaration order
    pub children: Vec<SchemaNode>,
}

/// Node of the immutable schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Leaf column
    Primitive(PrimitiveNode),
    /// Nested group
    Group(GroupNode),
}

impl SchemaNode {
    /// Declared name
    pub fn name(&self) -> &str {
        match self {
            SchemaNode::Primitive(node) => &node.name,
            SchemaNode::Group(node) => &node.name,
        }
    }

    /// Dotted path
    pub fn path(&self) -> &str {
        match self {
            SchemaNode::Primitive(node) => &node.path,
            SchemaNode::Group(node) => &node.path,
        }
    }

    /// Multiplicity
    pub fn repetition(&self) -> Repetition {
        match self {
            SchemaNode::Primitive(node) => node.repetition,
            SchemaNode::Group(node) => node.repetition,
        }
    }

    /// Number of leaf columns under (and including) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            SchemaNode::Primitive(_) => 1,
            SchemaNode::Group(group) => group.leaf_count(),
        }
    }

    /// Convert into the encoder's schema type
    pub fn to_parquet(&self) -> Result<TypePtr, SchemaError> {
        match self {
            SchemaNode::Primitive(node) => node.to_parquet(),
            SchemaNode::Group(node) => node.to_parquet(),
        }
    }
}

impl PrimitiveNode {
    fn to_parquet(&self) -> Result<TypePtr, SchemaError> {
        let (logical, converted) = self.annotation.to_parquet();
        let mut builder = Type::primitive_type_builder(&self.name, self.physical_type)
            .with_repetition(self.repetition)
            .with_logical_type(logical)
            .with_converted_type(converted);
        if let Some(length) = self.fixed_length {
            builder = builder.with_length(length);
        }
        if let LogicalAnnotation::Decimal { precision, scale } = self.annotation {
            builder = builder.with_precision(precision).with_scale(scale);
        }
        let ty = builder.build().map_err(|e| SchemaError::IncompatibleAnnotation {
            field: self.path.clone(),
            annotation: self.annotation.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(ty))
    }
}

impl GroupNode {
    /// Ordinal of the child with the given name
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name() == name)
    }

    /// Number of leaf columns under this group
    pub fn leaf_count(&self) -> usize {
        self.children.iter().map(SchemaNode::leaf_count).sum()
    }

    fn to_parquet(&self) -> Result<TypePtr, SchemaError> {
        let fields = self
            .children
            .iter()
            .map(SchemaNode::to_parquet)
            .collect::<Result<Vec<_>, _>>()?;
        let (logical, converted) = self.annotation.to_parquet();
        let mut builder = Type::group_type_builder(&self.name)
            .with_logical_type(logical)
            .with_converted_type(converted)
            .with_fields(fields);
        // The message root carries no repetition in the file footer
        if !self.path.is_empty() {
            builder = builder.with_repetition(self.repetition);
        }
        let ty = builder.build().map_err(|e| SchemaError::IncompatibleAnnotation {
            field: self.display_path().to_string(),
            annotation: self.annotation.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(ty))
    }

    pub(crate) fn display_path(&self) -> &str {
        if self.path.is_empty() {
            MESSAGE_NAME
        } else {
            &self.path
        }
    }
}

/// Leaf column with its Dremel level bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafColumn {
    /// Dotted path
    pub path: String,
    /// On-disk storage type
    pub physical_type: PhysicalType,
    /// Maximum definition level
    pub max_def_level: i16,
    /// Maximum repetition level
    pub max_rep_level: i16,
}

/// Built message schema: the node tree plus its encoder-side descriptor.
///
/// Immutable once built; the writer shares it by reference with the row
/// assembler and the writer configuration.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    root: GroupNode,
    parquet_type: TypePtr,
    descriptor: SchemaDescPtr,
}

impl MessageSchema {
    pub(crate) fn new(root: GroupNode) -> Result<Self, SchemaError> {
        let parquet_type = root.to_parquet()?;
        let descriptor = Arc::new(SchemaDescriptor::new(parquet_type.clone()));
        Ok(Self {
            root,
            parquet_type,
            descriptor,
        })
    }

    /// REQUIRED root group holding the top-level fields
    pub fn root(&self) -> &GroupNode {
        &self.root
    }

    /// Encoder schema type
    pub fn parquet_type(&self) -> TypePtr {
        self.parquet_type.clone()
    }

    /// Encoder schema descriptor
    pub fn descriptor(&self) -> SchemaDescPtr {
        self.descriptor.clone()
    }

    /// Number of leaf columns
    pub fn num_columns(&self) -> usize {
        self.descriptor.num_columns()
    }

    /// Leaf columns in declaration order
    pub fn leaves(&self) -> Vec<LeafColumn> {
        self.descriptor
            .columns()
            .iter()
            .map(|column| LeafColumn {
                path: column.path().string(),
                physical_type: column.physical_type(),
                max_def_level: column.max_def_level(),
                max_rep_level: column.max_rep_level(),
            })
            .collect()
    }

    /// Human-readable schema in the format's message syntax
    pub fn to_message_string(&self) -> String {
        let mut out = Vec::new();
        parquet::schema::printer::print_schema(&mut out, &self.parquet_type);
        String::from_utf8_lossy(&out).into_owned()
    }
}
