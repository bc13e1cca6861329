//! Dremel shredding of records into per-leaf column buffers.
//!
//! Each leaf receives one (definition level, repetition level) pair per
//! value slot. A value contributes its own levels; an absent optional or an
//! empty repeated field contributes one null entry to every leaf beneath it,
//! at the definition level of its parent.

use parquet::basic::{Repetition, Type as PhysicalType};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::{ByteArray, FixedLenByteArray, Int96};
use parquet::errors::ParquetError;
use parquet::file::writer::SerializedRowGroupWriter;
use parquet::schema::types::ColumnDescPtr;

use std::io::Write;

use crate::schema::{MessageSchema, SchemaNode};
use crate::value::{ColumnCell, ValueError};

use super::record::{FieldValue, Record};

/// Buffered values of one leaf, typed by its physical type
#[derive(Debug, Clone)]
enum ColumnValues {
    Boolean(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Int96(Vec<Int96>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    ByteArray(Vec<ByteArray>),
    FixedLenByteArray(Vec<FixedLenByteArray>),
}

impl ColumnValues {
    fn for_type(physical_type: PhysicalType) -> Self {
        match physical_type {
            PhysicalType::BOOLEAN => ColumnValues::Boolean(Vec::new()),
            PhysicalType::INT32 => ColumnValues::Int32(Vec::new()),
            PhysicalType::INT64 => ColumnValues::Int64(Vec::new()),
            PhysicalType::INT96 => ColumnValues::Int96(Vec::new()),
            PhysicalType::FLOAT => ColumnValues::Float(Vec::new()),
            PhysicalType::DOUBLE => ColumnValues::Double(Vec::new()),
            PhysicalType::BYTE_ARRAY => ColumnValues::ByteArray(Vec::new()),
            PhysicalType::FIXED_LEN_BYTE_ARRAY => ColumnValues::FixedLenByteArray(Vec::new()),
        }
    }

    /// Append a cell; hands it back if its type does not match
    fn push(&mut self, cell: ColumnCell) -> Result<(), ColumnCell> {
        match (self, cell) {
            (ColumnValues::Boolean(v), ColumnCell::Boolean(x)) => v.push(x),
            (ColumnValues::Int32(v), ColumnCell::Int32(x)) => v.push(x),
            (ColumnValues::Int64(v), ColumnCell::Int64(x)) => v.push(x),
            (ColumnValues::Int96(v), ColumnCell::Int96(x)) => v.push(x),
            (ColumnValues::Float(v), ColumnCell::Float(x)) => v.push(x),
            (ColumnValues::Double(v), ColumnCell::Double(x)) => v.push(x),
            (ColumnValues::ByteArray(v), ColumnCell::ByteArray(x)) => v.push(x),
            (ColumnValues::FixedLenByteArray(v), ColumnCell::FixedLenByteArray(x)) => v.push(x),
            (_, cell) => return Err(cell),
        }
        Ok(())
    }

    fn clear(&mut self) {
        match self {
            ColumnValues::Boolean(v) => v.clear(),
            ColumnValues::Int32(v) => v.clear(),
            ColumnValues::Int64(v) => v.clear(),
            ColumnValues::Int96(v) => v.clear(),
            ColumnValues::Float(v) => v.clear(),
            ColumnValues::Double(v) => v.clear(),
            ColumnValues::ByteArray(v) => v.clear(),
            ColumnValues::FixedLenByteArray(v) => v.clear(),
        }
    }
}

/// Values and levels of one leaf column for the current row group
#[derive(Debug, Clone)]
pub struct ColumnChunkBuffer {
    descr: ColumnDescPtr,
    values: ColumnValues,
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
    value_bytes: usize,
}

impl ColumnChunkBuffer {
    fn new(descr: ColumnDescPtr) -> Self {
        Self {
            values: ColumnValues::for_type(descr.physical_type()),
            descr,
            def_levels: Vec::new(),
            rep_levels: Vec::new(),
            value_bytes: 0,
        }
    }

    /// Dotted column path
    pub fn path(&self) -> String {
        self.descr.path().string()
    }

    /// Definition levels buffered so far
    pub fn def_levels(&self) -> &[i16] {
        &self.def_levels
    }

    /// Repetition levels buffered so far
    pub fn rep_levels(&self) -> &[i16] {
        &self.rep_levels
    }

    /// Number of level entries (values plus nulls)
    pub fn num_levels(&self) -> usize {
        self.def_levels.len()
    }

    fn push_value(&mut self, cell: ColumnCell, def: i16, rep: i16) -> Result<(), ValueError> {
        self.value_bytes += cell.encoded_size();
        self.values.push(cell).map_err(|_| ValueError::ShapeMismatch { column: self.path() })?;
        self.def_levels.push(def);
        self.rep_levels.push(rep);
        Ok(())
    }

    fn push_null(&mut self, def: i16, rep: i16) {
        self.def_levels.push(def);
        self.rep_levels.push(rep);
    }

    fn estimated_bytes(&self) -> usize {
        let level_bytes = |max: i16, levels: &[i16]| if max > 0 { levels.len() * 2 } else { 0 };
        self.value_bytes
            + level_bytes(self.descr.max_def_level(), &self.def_levels)
            + level_bytes(self.descr.max_rep_level(), &self.rep_levels)
    }

    fn write(&self, writer: &mut ColumnWriter<'_>) -> Result<usize, ParquetError> {
        let def = (self.descr.max_def_level() > 0).then_some(self.def_levels.as_slice());
        let rep = (self.descr.max_rep_level() > 0).then_some(self.rep_levels.as_slice());
        match (writer, &self.values) {
            (ColumnWriter::BoolColumnWriter(w), ColumnValues::Boolean(v)) => w.write_batch(v, def, rep),
            (ColumnWriter::Int32ColumnWriter(w), ColumnValues::Int32(v)) => w.write_batch(v, def, rep),
            (ColumnWriter::Int64ColumnWriter(w), ColumnValues::Int64(v)) => w.write_batch(v, def, rep),
            (ColumnWriter::Int96ColumnWriter(w), ColumnValues::Int96(v)) => w.write_batch(v, def, rep),
            (ColumnWriter::FloatColumnWriter(w), ColumnValues::Float(v)) => w.write_batch(v, def, rep),
            (ColumnWriter::DoubleColumnWriter(w), ColumnValues::Double(v)) => w.write_batch(v, def, rep),
            (ColumnWriter::ByteArrayColumnWriter(w), ColumnValues::ByteArray(v)) => w.write_batch(v, def, rep),
            (ColumnWriter::FixedLenByteArrayColumnWriter(w), ColumnValues::FixedLenByteArray(v)) => {
                w.write_batch(v, def, rep)
            }
            _ => Err(ParquetError::General(format!(
                "column writer type does not match buffered values for '{}'",
                self.path()
            ))),
        }
    }

    fn clear(&mut self) {
        self.values.clear();
        self.def_levels.clear();
        self.rep_levels.clear();
        self.value_bytes = 0;
    }
}

/// Shredded rows of the current row group, one buffer per leaf column
#[derive(Debug, Clone)]
pub struct RowBuffer {
    columns: Vec<ColumnChunkBuffer>,
    rows: usize,
}

impl RowBuffer {
    /// Empty buffer for every leaf of `schema`
    pub fn new(schema: &MessageSchema) -> Self {
        let columns = schema
            .descriptor()
            .columns()
            .iter()
            .cloned()
            .map(ColumnChunkBuffer::new)
            .collect();
        Self { columns, rows: 0 }
    }

    /// Buffered rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// True when no row is buffered
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Per-leaf buffers in column order
    pub fn columns(&self) -> &[ColumnChunkBuffer] {
        &self.columns
    }

    /// Approximate in-memory size of the buffered values and levels
    pub fn estimated_bytes(&self) -> usize {
        self.columns.iter().map(ColumnChunkBuffer::estimated_bytes).sum()
    }

    /// Shred one top-level record.
    ///
    /// On error the buffer holds a partial row and must be discarded.
    pub fn push_record(&mut self, record: &Record<'_>) -> Result<(), ValueError> {
        self.shred_group(record, 0, 0, 0, 0)?;
        self.rows += 1;
        Ok(())
    }

    fn shred_group(
        &mut self,
        record: &Record<'_>,
        first_leaf: usize,
        def: i16,
        rep: i16,
        depth: i16,
    ) -> Result<(), ValueError> {
        let mut leaf = first_leaf;
        for (ordinal, child) in record.node().children.iter().enumerate() {
            let width = child.leaf_count();
            let child_def = def + i16::from(child.repetition() != Repetition::REQUIRED);
            let child_depth = depth + i16::from(child.repetition() == Repetition::REPEATED);
            let values = record.values(ordinal);

            if values.is_empty() {
                if child.repetition() == Repetition::REQUIRED {
                    return Err(ValueError::MissingRequired {
                        column: child.path().to_string(),
                    });
                }
                for column in &mut self.columns[leaf..leaf + width] {
                    column.push_null(def, rep);
                }
            }

            for (i, value) in values.iter().enumerate() {
                let value_rep = if i == 0 { rep } else { child_depth };
                match (value, child) {
                    (FieldValue::Cell(cell), SchemaNode::Primitive(_)) => {
                        self.columns[leaf].push_value(cell.clone(), child_def, value_rep)?
                    }
                    (FieldValue::Group(nested), SchemaNode::Group(_)) => {
                        self.shred_group(nested, leaf, child_def, value_rep, child_depth)?
                    }
                    _ => {
                        return Err(ValueError::ShapeMismatch {
                            column: child.path().to_string(),
                        })
                    }
                }
            }
            leaf += width;
        }
        Ok(())
    }

    /// Write every buffered column into `row_group` in column order and reset.
    /// Returns the number of values written.
    pub fn write_to<W: Write + Send>(
        &mut self,
        row_group: &mut SerializedRowGroupWriter<'_, W>,
    ) -> Result<usize, ParquetError> {
        let mut written = 0;
        for column in &self.columns {
            let mut writer = row_group.next_column()?.ok_or_else(|| {
                ParquetError::General(format!("row group has no column for '{}'", column.path()))
            })?;
            written += column.write(writer.untyped())?;
            writer.close()?;
        }
        for column in &mut self.columns {
            column.clear();
        }
        self.rows = 0;
        Ok(written)
    }
}
