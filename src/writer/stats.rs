use std::fmt;

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of rows written to the file
    pub rows_written: usize,
    /// Number of Parquet row groups written
    pub row_groups_written: usize,
    /// Number of leaf columns
    pub columns: usize,
    /// Non-null leaf values written across all columns
    pub values_written: usize,
    /// Total file size in bytes, footer included
    pub file_size_bytes: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows ({} values, {} columns) in {} row groups, {} bytes",
            self.rows_written, self.values_written, self.columns, self.row_groups_written, self.file_size_bytes
        )
    }
}
