use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};

/// Display information about a Parquet file
pub fn run(file: PathBuf, head: Option<usize>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let file_handle = File::open(&file).context("Failed to open file")?;
    let reader = SerializedFileReader::new(file_handle).context("Failed to read Parquet file")?;

    let metadata = reader.metadata();
    let file_metadata = metadata.file_metadata();
    let schema = file_metadata.schema_descr();

    println!("Parquet File Information");
    println!("========================");
    println!("File: {}", file.display());
    if let Some(created_by) = file_metadata.created_by() {
        println!("Created by: {}", created_by);
    }
    println!("Format version: {}", file_metadata.version());
    println!();

    println!("File Statistics:");
    println!("  Row groups: {}", metadata.num_row_groups());
    println!("  Total rows: {}", file_metadata.num_rows());
    println!("  Schema columns: {}", schema.num_columns());
    println!();

    if let Some(kv_metadata) = file_metadata.key_value_metadata() {
        println!("Metadata Keys:");
        for kv in kv_metadata {
            let value_preview = kv
                .value
                .as_ref()
                .map(|v| {
                    if v.chars().count() > 100 {
                        format!("{}... ({} bytes)", v.chars().take(100).collect::<String>(), v.len())
                    } else {
                        v.clone()
                    }
                })
                .unwrap_or_else(|| "<null>".to_string());
            println!("  {}: {}", kv.key, value_preview);
        }
        println!();
    }

    // Chunk properties are taken from the first row group
    println!("Columns:");
    let first_group = (metadata.num_row_groups() > 0).then(|| metadata.row_group(0));
    for i in 0..schema.num_columns() {
        let col = schema.column(i);
        print!("  {:3}. {} ({})", i + 1, col.path(), col.physical_type());
        if let Some(chunk) = first_group.map(|group| group.column(i)) {
            let encodings: Vec<String> = chunk.encodings().iter().map(|e| e.to_string()).collect();
            print!(" codec={} encodings=[{}]", chunk.compression(), encodings.join(","));
            if chunk.bloom_filter_offset().is_some() {
                print!(" bloom");
            }
        }
        println!();
    }

    if let Some(rows) = head {
        println!();
        print_head(&file, rows)?;
    }

    Ok(())
}

fn print_head(file: &Path, rows: usize) -> Result<()> {
    let file_handle = File::open(file).context("Failed to open file")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file_handle)
        .context("Failed to read Parquet file")?
        .with_batch_size(rows.max(1))
        .with_limit(rows)
        .build()
        .context("Failed to build record batch reader")?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to decode rows")?;
    println!("First {} rows:", rows);
    println!("{}", pretty_format_batches(&batches)?);
    Ok(())
}
