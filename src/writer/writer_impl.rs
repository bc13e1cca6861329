use std::io::{self, Write};
use std::sync::Arc;

use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;

use crate::record::{assemble_record, Record, RowBuffer};
use crate::schema::MessageSchema;
use crate::value::RawValue;

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::WriterStats;

/// Sink wrapper that counts the bytes passed through it
struct CountingSink<W> {
    inner: W,
    bytes: u64,
}

impl<W: Write> Write for CountingSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Streaming writer for one Parquet file with a schema built from field specs.
///
/// Records are shredded into an in-memory row group that is flushed once
/// its estimated size reaches the configured row-group size. The footer is
/// written by [`finish`](Self::finish); dropping the writer without finishing
/// releases the sink and leaves an incomplete file. After any write error the
/// writer must be dropped.
pub struct ParquetifyWriter<'s, W: Write + Send> {
    schema: &'s MessageSchema,
    writer: SerializedFileWriter<CountingSink<W>>,
    buffer: RowBuffer,
    row_group_size: usize,
    rows_written: usize,
    row_groups_written: usize,
    values_written: usize,
}

impl<'s, W: Write + Send> ParquetifyWriter<'s, W> {
    /// Open a writer on `sink` for `schema`
    pub fn try_new(sink: W, schema: &'s MessageSchema, config: &WriterConfig) -> Result<Self, WriterError> {
        let props = config.to_writer_properties(schema)?;
        Self::with_properties(sink, schema, props, config.row_group_size)
    }

    /// Open a writer with already resolved properties
    pub fn with_properties(
        sink: W,
        schema: &'s MessageSchema,
        props: WriterProperties,
        row_group_size: usize,
    ) -> Result<Self, WriterError> {
        let sink = CountingSink { inner: sink, bytes: 0 };
        let writer = SerializedFileWriter::new(sink, schema.parquet_type(), Arc::new(props))?;

        Ok(Self {
            schema,
            writer,
            buffer: RowBuffer::new(schema),
            row_group_size,
            rows_written: 0,
            row_groups_written: 0,
            values_written: 0,
        })
    }

    /// Schema this writer was opened with
    pub fn schema(&self) -> &'s MessageSchema {
        self.schema
    }

    /// Append one assembled record
    pub fn write_record(&mut self, record: &Record<'_>) -> Result<(), WriterError> {
        self.buffer.push_record(record)?;
        if self.buffer.estimated_bytes() >= self.row_group_size {
            self.flush_row_group()?;
        }
        Ok(())
    }

    /// Assemble and append one row-shaped object keyed by top-level field name
    pub fn write_value(&mut self, value: &RawValue) -> Result<(), WriterError> {
        let record = assemble_record(self.schema, value)?;
        self.write_record(&record)
    }

    /// Write the buffered rows as a row group (no-op when nothing is buffered)
    pub fn flush_row_group(&mut self) -> Result<(), WriterError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let rows = self.buffer.rows();
        let mut row_group = self.writer.next_row_group()?;
        let values = self.buffer.write_to(&mut row_group)?;
        row_group.close()?;

        self.rows_written += rows;
        self.row_groups_written += 1;
        self.values_written += values;
        log::debug!(
            "Flushed row group {} ({} rows, {} values)",
            self.row_groups_written,
            rows,
            values
        );
        Ok(())
    }

    /// Rows flushed or buffered so far
    pub fn rows_written(&self) -> usize {
        self.rows_written + self.buffer.rows()
    }

    /// Flush buffered rows, write the footer and return statistics
    pub fn finish(self) -> Result<WriterStats, WriterError> {
        self.finish_into_inner().map(|(_, stats)| stats)
    }

    /// Flush buffered rows, write the footer and hand back the sink
    ///
    /// This is useful when the writer is backed by an in-memory buffer and you need
    /// to access the written data.
    pub fn finish_into_inner(mut self) -> Result<(W, WriterStats), WriterError> {
        self.flush_row_group()?;
        let sink = self.writer.into_inner()?;
        let stats = WriterStats {
            rows_written: self.rows_written,
            row_groups_written: self.row_groups_written,
            columns: self.schema.num_columns(),
            values_written: self.values_written,
            file_size_bytes: sink.bytes,
        };
        Ok((sink.inner, stats))
    }
}
