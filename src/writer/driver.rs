use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ParquetifyError;
use crate::record::RowAssembler;
use crate::schema::{build_schema, FieldSpec};

use super::config::{configure_with, WriterOptions};
use super::encryption::{KeyProvider, LiteralKeyProvider};
use super::error::WriterError;
use super::stats::WriterStats;
use super::writer_impl::ParquetifyWriter;

/// Lifecycle of a conversion. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing built yet
    Configuring,
    /// Schema built; output not opened
    SchemaBound,
    /// Output open, rows being written
    Writing,
    /// Footer written, output released
    Closed,
}

/// One run of the schema → configure → write → close sequence.
///
/// Failures before [`DriverState::Writing`] never open the output. A failure
/// while writing drops the open writer, which releases the sink without a
/// footer; whatever it left behind is not a valid file.
pub struct Conversion<'j> {
    fields: &'j [FieldSpec],
    options: &'j WriterOptions,
    keys: &'j dyn KeyProvider,
    state: DriverState,
}

impl<'j> Conversion<'j> {
    /// Conversion of `fields` with `options`, using literal encryption keys
    pub fn new(fields: &'j [FieldSpec], options: &'j WriterOptions) -> Self {
        Self {
            fields,
            options,
            keys: &LiteralKeyProvider,
            state: DriverState::Configuring,
        }
    }

    /// Fetch encryption keys from `keys` instead
    pub fn with_key_provider(mut self, keys: &'j dyn KeyProvider) -> Self {
        self.keys = keys;
        self
    }

    /// Current state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run to completion, opening the output with `open` only once the schema,
    /// configuration and row count are known to be valid.
    pub fn run<W, F>(mut self, open: F) -> Result<(W, WriterStats), ParquetifyError>
    where
        W: Write + Send,
        F: FnOnce() -> io::Result<W>,
    {
        let result = self.run_inner(open);
        if result.is_err() {
            log::debug!("Conversion aborted in state {:?}", self.state);
        }
        result
    }

    fn run_inner<W, F>(&mut self, open: F) -> Result<(W, WriterStats), ParquetifyError>
    where
        W: Write + Send,
        F: FnOnce() -> io::Result<W>,
    {
        let schema = build_schema(self.fields)?;
        self.advance(DriverState::SchemaBound);

        let config = configure_with(self.options, self.keys)?;
        let props = config.to_writer_properties(&schema)?;
        let assembler = RowAssembler::new(&schema, self.fields);
        let rows = assembler.row_count()?;
        log::info!("Writing {} rows into {} columns", rows, schema.num_columns());

        let sink = open().map_err(WriterError::from)?;
        let mut writer = ParquetifyWriter::with_properties(sink, &schema, props, config.row_group_size)?;
        self.advance(DriverState::Writing);

        for row in 0..rows {
            let record = assembler.assemble_row(row)?;
            writer.write_record(&record)?;
        }

        let (sink, stats) = writer.finish_into_inner()?;
        self.advance(DriverState::Closed);
        log::info!("{}", stats);
        Ok((sink, stats))
    }

    fn advance(&mut self, next: DriverState) {
        log::debug!("Conversion state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Convert into `path`.
///
/// Output goes to a temporary file next to `path` that is renamed into place
/// only after the footer has been written, so a failed run leaves no file.
pub fn convert_to_path<P: AsRef<Path>>(
    fields: &[FieldSpec],
    options: &WriterOptions,
    path: P,
) -> Result<WriterStats, ParquetifyError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let (temp, stats) = Conversion::new(fields, options).run(|| NamedTempFile::new_in(dir))?;
    temp.persist(path).map_err(WriterError::from)?;
    log::info!("Wrote {}", path.display());
    Ok(stats)
}

/// Convert into any sink and hand it back
pub fn convert_to_writer<W: Write + Send>(
    fields: &[FieldSpec],
    options: &WriterOptions,
    sink: W,
) -> Result<(W, WriterStats), ParquetifyError> {
    Conversion::new(fields, options).run(move || Ok(sink))
}
