use parquet::errors::ParquetError;

/// Errors raised while resolving writer options.
///
/// All of these surface before the output is opened.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Compression codec name is not recognised
    #[error("Unknown compression codec '{codec}'")]
    InvalidCodec {
        /// Offending name
        codec: String,
    },

    /// Codec is recognised but not available in this build
    #[error("Compression codec '{codec}' is not available")]
    UnavailableCodec {
        /// Codec name
        codec: String,
    },

    /// Compression level outside the codec's range
    #[error("Invalid {codec} compression level {level}: {reason}")]
    InvalidCompressionLevel {
        /// Codec name
        codec: &'static str,
        /// Offending level
        level: i32,
        /// Range description from the encoder
        reason: String,
    },

    /// Writer version is neither `1.0` nor `2.0`
    #[error("Invalid writer version '{version}' (expected \"1.0\" or \"2.0\")")]
    InvalidWriterVersion {
        /// Offending version
        version: String,
    },

    /// Encoding token is not DICTIONARY, BYTE_STREAM_SPLIT or PLAIN
    #[error("Invalid encoding '{encoding}'")]
    InvalidEncoding {
        /// Offending token
        encoding: String,
    },

    /// Row-group or page size is zero or an unknown keyword
    #[error("Invalid {option}: {value}")]
    InvalidSize {
        /// Option name
        option: &'static str,
        /// Offending value
        value: String,
    },

    /// Encryption requested without a footer key
    #[error("Encryption requires a footerKey")]
    MissingFooterKey,

    /// Key material is not a valid AES key length
    #[error("Key for {usage} is {length} bytes; expected 16, 24 or 32")]
    InvalidKeyLength {
        /// Footer or column the key is for
        usage: String,
        /// Actual length
        length: usize,
    },

    /// Key provider could not produce key material
    #[error("No key material for {usage}: {reason}")]
    KeyUnavailable {
        /// Footer or column the key is for
        usage: String,
        /// Provider message
        reason: String,
    },

    /// Encrypted column path names no leaf of the schema
    #[error("Encrypted column '{path}' is not in the schema")]
    UnknownEncryptedColumn {
        /// Dotted column path
        path: String,
    },

    /// Encoder rejected the encryption settings
    #[error("Invalid encryption settings: {0}")]
    Encryption(ParquetError),
}

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Parquet library during file writing
    #[error("Parquet error: {0}")]
    ParquetError(#[from] ParquetError),

    /// Writer options could not be turned into encoder properties
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// A value could not be mapped onto its column
    #[error(transparent)]
    ValueError(#[from] crate::value::ValueError),

    /// Temporary output could not be moved into place
    #[error("Failed to persist output file: {0}")]
    PersistError(#[from] tempfile::PersistError),
}
