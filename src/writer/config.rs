use std::collections::BTreeMap;

use parquet::basic::{BrotliLevel, Compression, Encoding, GzipLevel, Type as PhysicalType, ZstdLevel};
use parquet::encryption::encrypt::FileEncryptionProperties;
use parquet::file::properties::{EnabledStatistics, WriterProperties, WriterVersion};
use parquet::format::KeyValue;
use parquet::schema::types::ColumnPath;
use serde::{Deserialize, Serialize};

use crate::schema::MessageSchema;

use super::encryption::{fetch_key, KeyProvider, LiteralKeyProvider};
use super::error::ConfigError;

/// Default row-group size in bytes (128 MiB)
pub const DEFAULT_ROW_GROUP_SIZE: usize = 128 * 1024 * 1024;

/// Default data page size in bytes (1 MiB)
pub const DEFAULT_PAGE_SIZE: usize = 1024 * 1024;

/// Default codec name
pub const DEFAULT_COMPRESSION: &str = "SNAPPY";

/// Default writer version
pub const DEFAULT_WRITER_VERSION: &str = "1.0";

/// Writer options as they appear in the job document's `options` object.
///
/// Everything is optional; [`configure`] fills in defaults and validates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterOptions {
    /// Codec name (default SNAPPY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,

    /// Level for GZIP, BROTLI or ZSTD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<i32>,

    /// `"1.0"` or `"2.0"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer_version: Option<String>,

    /// Row-group size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_group_size: Option<SizeSetting>,

    /// Data page size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<SizeSetting>,

    /// DICTIONARY / BYTE_STREAM_SPLIT / PLAIN, applied in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encodings: Option<Vec<String>>,

    /// `"all"`, `"none"` or a list of column paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom_filter: Option<BloomFilterSetting>,

    /// Key/value pairs merged into the footer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_meta_data: Option<BTreeMap<String, String>>,

    /// Modular encryption policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionOptions>,

    /// Chunk and page statistics (default on)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<bool>,
}

/// A byte count or the keyword `"default"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSetting {
    /// Explicit byte count
    Bytes(u64),
    /// Keyword
    Keyword(String),
}

/// Bloom filter targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BloomFilterSetting {
    /// `"all"` or `"none"`
    Policy(String),
    /// Dotted column paths
    Columns(Vec<String>),
}

/// Encryption section of the options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionOptions {
    /// Footer key reference (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_key: Option<String>,

    /// Additional authenticated data prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad_prefix: Option<String>,

    /// Store the AAD prefix in the file (default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_aad_prefix_in_file: Option<bool>,

    /// Opaque metadata stored next to the footer key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_key_metadata: Option<String>,

    /// Columns to encrypt; absent means every column with the footer key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_columns: Option<Vec<EncryptedColumn>>,

    /// Leave the footer readable (default false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext_footer: Option<bool>,
}

/// One column marked for encryption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncryptedColumn {
    /// Dotted column path
    pub path: String,

    /// Column key reference; the footer key is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Resolved bloom filter targets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BloomFilterPolicy {
    /// No bloom filters
    #[default]
    None,
    /// Every column
    All,
    /// Named columns only
    Columns(Vec<String>),
}

/// Resolved encryption keys and flags
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionConfig {
    footer_key: Vec<u8>,
    footer_key_metadata: Option<Vec<u8>>,
    aad_prefix: Option<Vec<u8>>,
    store_aad_prefix: bool,
    plaintext_footer: bool,
    column_keys: Vec<(String, Vec<u8>)>,
}

impl std::fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("footer_key", &"<redacted>")
            .field("aad_prefix", &self.aad_prefix.is_some())
            .field("store_aad_prefix", &self.store_aad_prefix)
            .field("plaintext_footer", &self.plaintext_footer)
            .field("columns", &self.column_keys.iter().map(|(path, _)| path).collect::<Vec<_>>())
            .finish()
    }
}

impl EncryptionConfig {
    /// Paths of individually encrypted columns (empty for uniform encryption)
    pub fn encrypted_columns(&self) -> impl Iterator<Item = &str> {
        self.column_keys.iter().map(|(path, _)| path.as_str())
    }

    fn to_properties(&self) -> Result<FileEncryptionProperties, ConfigError> {
        let mut builder = FileEncryptionProperties::builder(self.footer_key.clone())
            .with_plaintext_footer(self.plaintext_footer);
        if let Some(metadata) = &self.footer_key_metadata {
            builder = builder.with_footer_key_metadata(metadata.clone());
        }
        if let Some(prefix) = &self.aad_prefix {
            builder = builder
                .with_aad_prefix(prefix.clone())
                .with_aad_prefix_storage(self.store_aad_prefix);
        }
        for (path, key) in &self.column_keys {
            builder = builder.with_column_key(path, key.clone());
        }
        builder.build().map_err(ConfigError::Encryption)
    }
}

/// Immutable writer configuration, resolved once per run
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    /// Codec for every column
    pub compression: Compression,
    /// Format version
    pub writer_version: WriterVersion,
    /// Buffered bytes that trigger a row-group flush
    pub row_group_size: usize,
    /// Data page size limit
    pub page_size: usize,
    /// Dictionary encoding on
    pub dictionary: bool,
    /// BYTE_STREAM_SPLIT for FLOAT / DOUBLE columns
    pub byte_stream_split: bool,
    /// Bloom filter targets
    pub bloom_filter: BloomFilterPolicy,
    /// Footer key/value metadata
    pub extra_metadata: BTreeMap<String, String>,
    /// Encryption keys, if requested
    pub encryption: Option<EncryptionConfig>,
    /// Chunk and page statistics on
    pub statistics: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            writer_version: WriterVersion::PARQUET_1_0,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            dictionary: false,
            byte_stream_split: false,
            bloom_filter: BloomFilterPolicy::None,
            extra_metadata: BTreeMap::new(),
            encryption: None,
            statistics: true,
        }
    }
}

/// Resolve options with the literal key provider
pub fn configure(options: &WriterOptions) -> Result<WriterConfig, ConfigError> {
    configure_with(options, &LiteralKeyProvider)
}

/// Resolve options, fetching encryption keys from `keys`
pub fn configure_with(options: &WriterOptions, keys: &dyn KeyProvider) -> Result<WriterConfig, ConfigError> {
    let compression = parse_compression(
        options.compression.as_deref().unwrap_or(DEFAULT_COMPRESSION),
        options.compression_level,
    )?;
    let writer_version = parse_writer_version(options.writer_version.as_deref().unwrap_or(DEFAULT_WRITER_VERSION))?;
    let row_group_size = parse_size("rowGroupSize", options.row_group_size.as_ref(), DEFAULT_ROW_GROUP_SIZE)?;
    let page_size = parse_size("pageSize", options.page_size.as_ref(), DEFAULT_PAGE_SIZE)?;

    let mut dictionary = false;
    let mut byte_stream_split = false;
    for token in options.encodings.iter().flatten() {
        match token.to_ascii_uppercase().as_str() {
            "DICTIONARY" => dictionary = true,
            "BYTE_STREAM_SPLIT" => byte_stream_split = true,
            "PLAIN" => dictionary = false,
            _ => {
                return Err(ConfigError::InvalidEncoding {
                    encoding: token.clone(),
                })
            }
        }
    }

    let bloom_filter = match &options.bloom_filter {
        None => BloomFilterPolicy::None,
        Some(BloomFilterSetting::Policy(policy)) if policy.eq_ignore_ascii_case("all") => BloomFilterPolicy::All,
        Some(BloomFilterSetting::Policy(policy)) if policy.eq_ignore_ascii_case("none") => BloomFilterPolicy::None,
        Some(BloomFilterSetting::Policy(policy)) => {
            log::warn!("Ignoring bloomFilter '{}': expected \"all\", \"none\" or a list of columns", policy);
            BloomFilterPolicy::None
        }
        Some(BloomFilterSetting::Columns(columns)) => BloomFilterPolicy::Columns(columns.clone()),
    };

    let encryption = options
        .encryption
        .as_ref()
        .map(|encryption| resolve_encryption(encryption, keys))
        .transpose()?;

    Ok(WriterConfig {
        compression,
        writer_version,
        row_group_size,
        page_size,
        dictionary,
        byte_stream_split,
        bloom_filter,
        extra_metadata: options.extra_meta_data.clone().unwrap_or_default(),
        encryption,
        statistics: options.statistics.unwrap_or(true),
    })
}

/// Parse a codec name (case-insensitive) with an optional level
pub fn parse_compression(name: &str, level: Option<i32>) -> Result<Compression, ConfigError> {
    let invalid_level = |codec: &'static str, level: i32, reason: String| ConfigError::InvalidCompressionLevel {
        codec,
        level,
        reason,
    };
    let unsigned = |codec: &'static str, level: i32| {
        u32::try_from(level).map_err(|_| invalid_level(codec, level, "level must not be negative".to_string()))
    };

    let codec = match name.to_ascii_uppercase().as_str() {
        "UNCOMPRESSED" => Compression::UNCOMPRESSED,
        "SNAPPY" => Compression::SNAPPY,
        "LZ4" => Compression::LZ4,
        "LZ4_RAW" => Compression::LZ4_RAW,
        "GZIP" => match level {
            Some(level) => Compression::GZIP(
                GzipLevel::try_new(unsigned("GZIP", level)?).map_err(|e| invalid_level("GZIP", level, e.to_string()))?,
            ),
            None => Compression::GZIP(GzipLevel::default()),
        },
        "BROTLI" => match level {
            Some(level) => Compression::BROTLI(
                BrotliLevel::try_new(unsigned("BROTLI", level)?)
                    .map_err(|e| invalid_level("BROTLI", level, e.to_string()))?,
            ),
            None => Compression::BROTLI(BrotliLevel::default()),
        },
        "ZSTD" => match level {
            Some(level) => Compression::ZSTD(
                ZstdLevel::try_new(level).map_err(|e| invalid_level("ZSTD", level, e.to_string()))?,
            ),
            None => Compression::ZSTD(ZstdLevel::default()),
        },
        "LZO" => {
            return Err(ConfigError::UnavailableCodec {
                codec: name.to_string(),
            })
        }
        _ => {
            return Err(ConfigError::InvalidCodec {
                codec: name.to_string(),
            })
        }
    };

    if level.is_some() && !matches!(codec, Compression::GZIP(_) | Compression::BROTLI(_) | Compression::ZSTD(_)) {
        log::warn!("compressionLevel has no effect with {}", codec);
    }
    Ok(codec)
}

fn parse_writer_version(version: &str) -> Result<WriterVersion, ConfigError> {
    match version.trim() {
        "1.0" => Ok(WriterVersion::PARQUET_1_0),
        "2.0" => Ok(WriterVersion::PARQUET_2_0),
        other => Err(ConfigError::InvalidWriterVersion {
            version: other.to_string(),
        }),
    }
}

fn parse_size(option: &'static str, setting: Option<&SizeSetting>, default: usize) -> Result<usize, ConfigError> {
    match setting {
        None => Ok(default),
        Some(SizeSetting::Keyword(keyword)) if keyword.eq_ignore_ascii_case("default") => Ok(default),
        Some(SizeSetting::Bytes(bytes)) if *bytes > 0 => usize::try_from(*bytes).map_err(|_| ConfigError::InvalidSize {
            option,
            value: bytes.to_string(),
        }),
        Some(SizeSetting::Bytes(bytes)) => Err(ConfigError::InvalidSize {
            option,
            value: bytes.to_string(),
        }),
        Some(SizeSetting::Keyword(keyword)) => Err(ConfigError::InvalidSize {
            option,
            value: keyword.clone(),
        }),
    }
}

fn resolve_encryption(options: &EncryptionOptions, keys: &dyn KeyProvider) -> Result<EncryptionConfig, ConfigError> {
    let footer_ref = options.footer_key.as_deref().ok_or(ConfigError::MissingFooterKey)?;
    let footer_key = fetch_key(keys, footer_ref, "footer")?;

    let mut column_keys = Vec::new();
    for column in options.encrypted_columns.iter().flatten() {
        let key = match &column.key {
            Some(key_ref) => fetch_key(keys, key_ref, &format!("column '{}'", column.path))?,
            None => footer_key.clone(),
        };
        column_keys.push((column.path.clone(), key));
    }

    Ok(EncryptionConfig {
        footer_key,
        footer_key_metadata: options.footer_key_metadata.as_ref().map(|m| m.as_bytes().to_vec()),
        aad_prefix: options.aad_prefix.as_ref().map(|p| p.as_bytes().to_vec()),
        store_aad_prefix: options.store_aad_prefix_in_file.unwrap_or(true),
        plaintext_footer: options.plaintext_footer.unwrap_or(false),
        column_keys,
    })
}

impl WriterConfig {
    /// Encoder properties for `schema`.
    ///
    /// Column-scoped settings (BYTE_STREAM_SPLIT, named bloom filters) are
    /// applied to the schema's leaf paths. Bloom filter names that match no
    /// leaf are kept but have no effect.
    pub fn to_writer_properties(&self, schema: &MessageSchema) -> Result<WriterProperties, ConfigError> {
        let statistics = if self.statistics {
            EnabledStatistics::Page
        } else {
            EnabledStatistics::None
        };

        let mut builder = WriterProperties::builder()
            .set_writer_version(self.writer_version)
            .set_compression(self.compression)
            .set_data_page_size_limit(self.page_size)
            .set_dictionary_enabled(self.dictionary)
            .set_statistics_enabled(statistics)
            .set_created_by(format!("parquetify version {}", env!("CARGO_PKG_VERSION")));

        let descriptor = schema.descriptor();
        if self.byte_stream_split {
            for column in descriptor.columns() {
                if matches!(column.physical_type(), PhysicalType::FLOAT | PhysicalType::DOUBLE) {
                    builder = builder.set_column_encoding(column.path().clone(), Encoding::BYTE_STREAM_SPLIT);
                }
            }
        }

        match &self.bloom_filter {
            BloomFilterPolicy::None => {}
            BloomFilterPolicy::All => builder = builder.set_bloom_filter_enabled(true),
            BloomFilterPolicy::Columns(columns) => {
                for name in columns {
                    if !descriptor.columns().iter().any(|c| c.path().string() == *name) {
                        log::warn!("Bloom filter column '{}' is not in the schema", name);
                    }
                    let path = ColumnPath::new(name.split('.').map(str::to_string).collect());
                    builder = builder.set_column_bloom_filter_enabled(path, true);
                }
            }
        }

        if !self.extra_metadata.is_empty() {
            let metadata = self
                .extra_metadata
                .iter()
                .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
                .collect();
            builder = builder.set_key_value_metadata(Some(metadata));
        }

        if let Some(encryption) = &self.encryption {
            if let Some(path) = encryption
                .encrypted_columns()
                .find(|path| !descriptor.columns().iter().any(|c| c.path().string() == *path))
            {
                return Err(ConfigError::UnknownEncryptedColumn { path: path.to_string() });
            }
            builder = builder.with_file_encryption_properties(encryption.to_properties()?);
        }

        Ok(builder.build())
    }
}
