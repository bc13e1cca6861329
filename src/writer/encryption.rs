//! Key material for modular encryption.
//!
//! The writer never interprets key strings itself; a [`KeyProvider`] turns
//! the configured references into raw AES key bytes.

use super::error::ConfigError;

/// AES key lengths accepted by the encoder
pub const VALID_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Source of key material for footer and column keys
pub trait KeyProvider {
    /// Raw key bytes for a configured key reference. `usage` names the footer
    /// or column the key is for, for diagnostics.
    fn key_bytes(&self, key_ref: &str, usage: &str) -> Result<Vec<u8>, ConfigError>;
}

/// Uses the UTF-8 bytes of the configured string as the key itself
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralKeyProvider;

impl KeyProvider for LiteralKeyProvider {
    fn key_bytes(&self, key_ref: &str, _usage: &str) -> Result<Vec<u8>, ConfigError> {
        Ok(key_ref.as_bytes().to_vec())
    }
}

/// Fetch a key and check its length
pub(crate) fn fetch_key(provider: &dyn KeyProvider, key_ref: &str, usage: &str) -> Result<Vec<u8>, ConfigError> {
    let key = provider.key_bytes(key_ref, usage)?;
    if !VALID_KEY_LENGTHS.contains(&key.len()) {
        return Err(ConfigError::InvalidKeyLength {
            usage: usage.to_string(),
            length: key.len(),
        });
    }
    Ok(key)
}
