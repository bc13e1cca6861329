//! Integration tests for parquetify
//!
//! These tests run whole jobs to disk and read the files back.

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Decimal128Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::{ArrowReaderOptions, ParquetRecordBatchReaderBuilder};
use parquet::basic::{Compression, Encoding};
use parquet::encryption::decrypt::FileDecryptionProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquetify::job::JobSpec;
use parquetify::schema::SchemaError;
use parquetify::value::ValueError;
use parquetify::ParquetifyError;
use serde_json::json;
use std::fs::{self, File};
use std::error::Error;
use std::path::Path;
use tempfile::tempdir;

const FOOTER_KEY: &[u8] = b"0123456789012345";
const COLUMN_KEY: &[u8] = b"abcdefghijklmnop";

fn job(value: serde_json::Value) -> JobSpec {
    serde_json::from_value(value).unwrap()
}

fn read_batches(path: &Path) -> Vec<RecordBatch> {
    let file = File::open(path).unwrap();
    ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn read_decrypted(path: &Path, decryption: FileDecryptionProperties) -> Result<Vec<RecordBatch>, Box<dyn Error>> {
    let options = ArrowReaderOptions::new().with_file_decryption_properties(decryption);
    let reader = ParquetRecordBatchReaderBuilder::try_new_with_options(File::open(path)?, options)?.build()?;
    Ok(reader.collect::<Result<Vec<_>, _>>()?)
}

fn int32_values(batch: &RecordBatch, name: &str) -> Vec<i32> {
    batch.column_by_name(name).unwrap().as_primitive::<Int32Type>().values().to_vec()
}

fn open_reader(path: &Path) -> SerializedFileReader<File> {
    SerializedFileReader::new(File::open(path).unwrap()).unwrap()
}

/// Three integers with default options
#[test]
fn test_flat_int_column_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.parquet");
    let spec = job(json!({
        "schema": [{"name": "id", "schemaType": "required", "physicalType": "INT32", "data": [1, 2, 3]}]
    }));

    let stats = spec.run_to_path(&path).unwrap();
    assert_eq!(stats.rows_written, 3);
    assert_eq!(stats.row_groups_written, 1);
    assert_eq!(stats.file_size_bytes, fs::metadata(&path).unwrap().len());

    let reader = open_reader(&path);
    let metadata = reader.metadata();
    assert_eq!(metadata.num_row_groups(), 1);
    assert_eq!(metadata.file_metadata().num_rows(), 3);
    assert_eq!(metadata.file_metadata().version(), 1);
    assert!(metadata
        .file_metadata()
        .created_by()
        .unwrap()
        .starts_with("parquetify version"));

    let chunk = metadata.row_group(0).column(0);
    assert_eq!(chunk.compression(), Compression::SNAPPY);
    assert!(chunk.encodings().contains(&Encoding::PLAIN));
    assert!(!chunk.encodings().contains(&Encoding::RLE_DICTIONARY));
    assert!(!chunk.encodings().contains(&Encoding::PLAIN_DICTIONARY));
    assert!(chunk.bloom_filter_offset().is_none());

    let batches = read_batches(&path);
    let ids = batches[0].column(0).as_primitive::<Int32Type>();
    assert_eq!(ids.values().to_vec(), vec![1, 2, 3]);
}

/// Schema errors abort before the output exists
#[test]
fn test_unsupported_logical_type_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.parquet");
    let spec = job(json!({
        "schema": [{"name": "x", "schemaType": "required", "physicalType": "INT32",
                    "logicalType": "GEOGRAPHY", "data": [1]}]
    }));

    match spec.run_to_path(&path) {
        Err(ParquetifyError::Schema(SchemaError::UnsupportedLogicalType { field, token })) => {
            assert_eq!(field, "x");
            assert_eq!(token, "GEOGRAPHY");
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// A value that cannot be coerced mid-write leaves no file behind
#[test]
fn test_failed_value_leaves_no_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.parquet");
    let spec = job(json!({
        "schema": [
            {"name": "id", "schemaType": "required", "physicalType": "INT32", "data": [1, 2, 3]},
            {"name": "small", "schemaType": "required", "physicalType": "INT32",
             "logicalType": "INT8", "data": [1, 2, 300]}
        ],
        "options": {"rowGroupSize": 1}
    }));

    assert!(matches!(
        spec.run_to_path(&path),
        Err(ParquetifyError::Value(ValueError::OutOfRange { .. }))
    ));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Bloom filters on every column
#[test]
fn test_bloom_filter_all() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bloom.parquet");
    let spec = job(json!({
        "schema": [
            {"name": "a", "schemaType": "required", "physicalType": "INT64", "data": [10, 20]},
            {"name": "b", "schemaType": "optional", "physicalType": "BINARY",
             "logicalType": "STRING", "data": ["x", null]}
        ],
        "options": {"bloomFilter": "all"}
    }));
    spec.run_to_path(&path).unwrap();

    let reader = open_reader(&path);
    let row_group = reader.metadata().row_group(0);
    for column in row_group.columns() {
        assert!(column.bloom_filter_offset().is_some(), "{}", column.column_path());
    }
}

/// Only the named column gets a bloom filter; unknown names are ignored
#[test]
fn test_bloom_filter_named_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bloom_named.parquet");
    let spec = job(json!({
        "schema": [
            {"name": "a", "schemaType": "required", "physicalType": "INT64", "data": [10, 20]},
            {"name": "b", "schemaType": "required", "physicalType": "INT64", "data": [1, 2]}
        ],
        "options": {"bloomFilter": ["b", "nope"]}
    }));
    spec.run_to_path(&path).unwrap();

    let reader = open_reader(&path);
    let row_group = reader.metadata().row_group(0);
    assert!(row_group.column(0).bloom_filter_offset().is_none());
    assert!(row_group.column(1).bloom_filter_offset().is_some());
}

/// Nested optional group, repeated leaf and a three-level list
#[test]
fn test_nested_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested.parquet");
    let spec = job(json!({
        "schema": [
            {"name": "id", "schemaType": "required", "physicalType": "INT64", "data": [1, 2, 3]},
            {"name": "address", "schemaType": "optionalGroup", "fields": [
                {"name": "city", "schemaType": "optional", "physicalType": "BINARY", "logicalType": "STRING"},
                {"name": "zip", "schemaType": "optional", "physicalType": "INT32"}
             ],
             "data": [{"city": "Oslo", "zip": 150}, null, {"city": "Rome"}]},
            {"name": "scores", "schemaType": "optionalGroup", "logicalType": "LIST", "fields": [
                {"name": "list", "schemaType": "repeatedGroup", "fields": [
                    {"name": "element", "schemaType": "optional", "physicalType": "INT32"}
                ]}
             ],
             "data": [[1, 2], [], null]}
        ]
    }));
    spec.run_to_path(&path).unwrap();

    let batches = read_batches(&path);
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 3);

    let ids = batch.column_by_name("id").unwrap().as_primitive::<Int64Type>();
    assert_eq!(ids.values().to_vec(), vec![1, 2, 3]);

    let address = batch.column_by_name("address").unwrap().as_struct();
    assert!(address.is_valid(0));
    assert!(address.is_null(1));
    let city = address.column_by_name("city").unwrap().as_string::<i32>();
    assert_eq!(city.value(0), "Oslo");
    assert_eq!(city.value(2), "Rome");
    let zip = address.column_by_name("zip").unwrap().as_primitive::<Int32Type>();
    assert_eq!(zip.value(0), 150);
    assert!(zip.is_null(2));

    let scores = batch.column_by_name("scores").unwrap().as_list::<i32>();
    assert_eq!(scores.value_length(0), 2);
    assert_eq!(scores.value_length(1), 0);
    assert!(scores.is_valid(1));
    assert!(scores.is_null(2));
    let first = scores.value(0);
    assert_eq!(first.as_primitive::<Int32Type>().values().to_vec(), vec![1, 2]);
}

/// Decimal, date and UUID annotations read back as typed arrow columns
#[test]
fn test_annotated_columns_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("typed.parquet");
    let spec = job(json!({
        "schema": [
            {"name": "price", "schemaType": "required", "physicalType": "INT32",
             "logicalType": "DECIMAL", "precision": 5, "scale": 2, "data": [123.45, "0.5", 7]},
            {"name": "day", "schemaType": "optional", "physicalType": "INT32",
             "logicalType": "DATE", "data": ["2024-01-02", 0, null]},
            {"name": "uid", "schemaType": "optional", "physicalType": "FIXED_LEN_BYTE_ARRAY",
             "length": 16, "logicalType": "UUID",
             "data": ["00112233445566778899aabbccddeeff", null, null]}
        ]
    }));
    spec.run_to_path(&path).unwrap();

    let batches = read_batches(&path);
    let batch = &batches[0];

    let price = cast(batch.column_by_name("price").unwrap(), &DataType::Decimal128(5, 2)).unwrap();
    let price = price.as_primitive::<Decimal128Type>();
    assert_eq!(price.values().to_vec(), vec![12345, 50, 700]);
    assert_eq!(price.scale(), 2);

    let day = batch.column_by_name("day").unwrap().as_primitive::<Date32Type>();
    assert_eq!(day.value(0), 19724);
    assert_eq!(day.value(1), 0);
    assert!(day.is_null(2));

    let uid = batch.column_by_name("uid").unwrap().as_fixed_size_binary();
    assert_eq!(uid.value(0)[..4], [0x00, 0x11, 0x22, 0x33]);
    assert!(uid.is_null(1));
}

/// Modular encryption switches the magic bytes
#[test]
fn test_encrypted_footer_magic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("secret.parquet");
    let spec = job(json!({
        "schema": [
            {"name": "a", "schemaType": "required", "physicalType": "INT32", "data": [1, 2]},
            {"name": "b", "schemaType": "required", "physicalType": "INT32", "data": [3, 4]}
        ],
        "options": {"encryption": {
            "footerKey": "0123456789012345",
            "aadPrefix": "tenant-a",
            "encryptedColumns": [{"path": "a"}, {"path": "b", "key": "abcdefghijklmnop"}]
        }}
    }));
    spec.run_to_path(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"PARE");
    assert_eq!(&bytes[bytes.len() - 4..], b"PARE");
    assert!(SerializedFileReader::new(File::open(&path).unwrap()).is_err());
}

/// Keyed readers get the original values back from per-column keys
#[test]
fn test_encrypted_columns_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("secret.parquet");
    let spec = job(json!({
        "schema": [
            {"name": "a", "schemaType": "required", "physicalType": "INT32", "data": [1, 2]},
            {"name": "b", "schemaType": "required", "physicalType": "INT32", "data": [3, 4]}
        ],
        "options": {"encryption": {
            "footerKey": "0123456789012345",
            "aadPrefix": "tenant-a",
            "encryptedColumns": [{"path": "a"}, {"path": "b", "key": "abcdefghijklmnop"}]
        }}
    }));
    spec.run_to_path(&path).unwrap();

    // Columns listed without a key are encrypted with the footer key
    let decryption = FileDecryptionProperties::builder(FOOTER_KEY.to_vec())
        .with_column_key("a", FOOTER_KEY.to_vec())
        .with_column_key("b", COLUMN_KEY.to_vec())
        .build()
        .unwrap();
    let batches = read_decrypted(&path, decryption).unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(int32_values(&batches[0], "a"), vec![1, 2]);
    assert_eq!(int32_values(&batches[0], "b"), vec![3, 4]);

    let wrong_key = FileDecryptionProperties::builder(FOOTER_KEY.to_vec())
        .with_column_key("a", FOOTER_KEY.to_vec())
        .with_column_key("b", FOOTER_KEY.to_vec())
        .build()
        .unwrap();
    assert!(read_decrypted(&path, wrong_key).is_err());
}

/// An AAD prefix kept out of the file must be supplied by the reader
#[test]
fn test_unstored_aad_prefix_needed_to_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("secret.parquet");
    let spec = job(json!({
        "schema": [{"name": "a", "schemaType": "required", "physicalType": "INT32", "data": [5, 6, 7]}],
        "options": {"encryption": {
            "footerKey": "0123456789012345",
            "aadPrefix": "tenant-a",
            "storeAadPrefixInFile": false
        }}
    }));
    spec.run_to_path(&path).unwrap();

    let without_prefix = FileDecryptionProperties::builder(FOOTER_KEY.to_vec()).build().unwrap();
    assert!(read_decrypted(&path, without_prefix).is_err());

    let with_prefix = FileDecryptionProperties::builder(FOOTER_KEY.to_vec())
        .with_aad_prefix(b"tenant-a".to_vec())
        .build()
        .unwrap();
    let batches = read_decrypted(&path, with_prefix).unwrap();
    assert_eq!(int32_values(&batches[0], "a"), vec![5, 6, 7]);
}

/// Encryption setup errors abort before the output exists
#[test]
fn test_bad_encryption_key_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("secret.parquet");
    let spec = job(json!({
        "schema": [{"name": "a", "schemaType": "required", "physicalType": "INT32", "data": [1]}],
        "options": {"encryption": {"footerKey": "too-short"}}
    }));

    assert!(matches!(spec.run_to_path(&path), Err(ParquetifyError::Config(_))));
    assert!(!path.exists());
}

/// Extra metadata and writer options land in the footer
#[test]
fn test_extra_metadata_and_options() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("meta.parquet");
    let spec = job(json!({
        "schema": [{"name": "v", "schemaType": "required", "physicalType": "DOUBLE",
                    "data": [1.5, 2.5, 3.5]}],
        "options": {
            "compression": "zstd",
            "compressionLevel": 5,
            "writerVersion": "2.0",
            "encodings": ["BYTE_STREAM_SPLIT"],
            "extraMetaData": {"source": "integration", "run": "42"}
        }
    }));
    spec.run_to_path(&path).unwrap();

    let reader = open_reader(&path);
    let metadata = reader.metadata();
    assert_eq!(metadata.file_metadata().version(), 2);

    let kv = metadata.file_metadata().key_value_metadata().unwrap();
    let lookup = |key: &str| kv.iter().find(|entry| entry.key == key).and_then(|entry| entry.value.clone());
    assert_eq!(lookup("source").as_deref(), Some("integration"));
    assert_eq!(lookup("run").as_deref(), Some("42"));

    let chunk = metadata.row_group(0).column(0);
    assert!(matches!(chunk.compression(), Compression::ZSTD(_)));
    assert!(chunk.encodings().contains(&Encoding::BYTE_STREAM_SPLIT));
}

/// Requesting DICTIONARY encoding writes dictionary pages
#[test]
fn test_dictionary_encoding_end_to_end() {
    let dir = tempdir().unwrap();
    let tags = json!(["red", "green", "red", "red", "green", "blue"]);
    let schema = json!([{"name": "tag", "schemaType": "required", "physicalType": "BINARY",
                         "logicalType": "STRING", "data": tags}]);
    let is_dictionary = |e: &Encoding| matches!(e, Encoding::RLE_DICTIONARY | Encoding::PLAIN_DICTIONARY);

    let path = dir.path().join("dict.parquet");
    job(json!({"schema": schema.clone(), "options": {"encodings": ["DICTIONARY"]}}))
        .run_to_path(&path)
        .unwrap();
    let reader = open_reader(&path);
    let chunk = reader.metadata().row_group(0).column(0);
    assert!(chunk.dictionary_page_offset().is_some());
    assert!(chunk.encodings().iter().any(is_dictionary));

    let batches = read_batches(&path);
    let column = batches[0].column_by_name("tag").unwrap().as_string::<i32>();
    assert_eq!(column.value(3), "red");
    assert_eq!(column.value(5), "blue");

    let plain_path = dir.path().join("plain.parquet");
    job(json!({"schema": schema})).run_to_path(&plain_path).unwrap();
    let reader = open_reader(&plain_path);
    let chunk = reader.metadata().row_group(0).column(0);
    assert!(chunk.dictionary_page_offset().is_none());
    assert!(!chunk.encodings().iter().any(is_dictionary));
}

/// A tiny row-group size splits the rows across groups in order
#[test]
fn test_small_row_groups_preserve_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("groups.parquet");
    let data: Vec<i64> = (0..50).collect();
    let spec = job(json!({
        "schema": [{"name": "n", "schemaType": "required", "physicalType": "INT64", "data": data}],
        "options": {"rowGroupSize": 64}
    }));
    let stats = spec.run_to_path(&path).unwrap();
    assert!(stats.row_groups_written > 1);

    let reader = open_reader(&path);
    assert_eq!(reader.metadata().num_row_groups(), stats.row_groups_written);
    assert_eq!(reader.metadata().file_metadata().num_rows(), 50);

    let values: Vec<i64> = read_batches(&path)
        .iter()
        .flat_map(|batch| batch.column(0).as_primitive::<Int64Type>().values().to_vec())
        .collect();
    assert_eq!(values, data);
}

/// Empty data arrays still produce a readable file
#[test]
fn test_empty_data_writes_schema_only_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.parquet");
    let spec = job(json!({
        "schema": [{"name": "n", "schemaType": "optional", "physicalType": "INT64", "data": []}]
    }));
    let stats = spec.run_to_path(&path).unwrap();
    assert_eq!(stats.rows_written, 0);

    let reader = open_reader(&path);
    assert_eq!(reader.metadata().file_metadata().num_rows(), 0);
    assert_eq!(reader.metadata().file_metadata().schema_descr().num_columns(), 1);
}

/// Without any data array there are no rows to locate
#[test]
fn test_missing_data_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nodata.parquet");
    let spec = job(json!({
        "schema": [{"name": "n", "schemaType": "optional", "physicalType": "INT64"}]
    }));
    assert!(matches!(spec.run_to_path(&path), Err(ParquetifyError::Data(_))));
    assert!(!path.exists());
}
