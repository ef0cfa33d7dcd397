use std::sync::Arc;

use crate::error::EceError;

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of the big-endian rs field.
pub const RS_LENGTH: usize = 4;

/// Length of the idlen field.
pub const IDLEN_LENGTH: usize = 1;

/// Header length with an empty keyid: salt || rs || idlen.
pub const HEADER_MIN_LENGTH: usize = SALT_LENGTH + RS_LENGTH + IDLEN_LENGTH;

/// Smallest record size: one byte of content, the padding delimiter and the tag.
pub const RS_MINIMUM: u64 = 18;

/// Largest record size allowed for AES-128-GCM (2^36 - 31).
pub const RS_MAXIMUM: u64 = (1 << 36) - 31;

/// Default record size.
pub const RS_DEFAULT: u32 = 4096;

/// Largest keyid, bounded by the one-byte idlen field.
pub const KEYID_MAX_LENGTH: usize = 0xff;

/// Largest record sequence number accepted by nonce derivation (2^53 - 1).
pub const SEQ_MAXIMUM: u64 = (1 << 53) - 1;

/// HKDF-SHA256 PRK length.
pub const PRK_LENGTH: usize = 32;

/// AES-128-GCM key length.
pub const CEK_LENGTH: usize = 16;

/// AES-GCM nonce length (96 bits).
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM tag length (128 bits).
pub const TAG_LENGTH: usize = 16;

/// HKDF info for the content-encryption key: "Content-Encoding: aes128gcm\0".
///
/// HKDF-Expand appends the 0x01 block counter itself.
pub const CEK_INFO: &[u8] = b"Content-Encoding: aes128gcm\0";

/// HKDF info for the base nonce: "Content-Encoding: nonce\0".
pub const NONCE_INFO: &[u8] = b"Content-Encoding: nonce\0";

/// Produces a fresh salt for each generated header.
pub type SaltSource = Arc<dyn Fn() -> Result<[u8; SALT_LENGTH], EceError> + Send + Sync>;

/// Fill a salt from the OS CSPRNG.
pub fn random_salt() -> Result<[u8; SALT_LENGTH], EceError> {
    let mut salt = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut salt).map_err(|e| EceError::RngFailed(e.to_string()))?;
    Ok(salt)
}

// ============================================================================
// EncoderOptions
// ============================================================================

/// Options controlling header generation for outgoing messages.
#[derive(Clone)]
pub struct EncoderOptions {
    /// Record size written into the header. Defaults to [`RS_DEFAULT`] if `None`.
    pub record_size: Option<u32>,
    /// Key identifier written into the header. Empty by default.
    pub keyid: Vec<u8>,
    /// Salt generator. Defaults to [`random_salt`] if `None`.
    /// Tests inject a fixed salt here.
    pub salt_source: Option<SaltSource>,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            record_size: None,
            keyid: Vec::new(),
            salt_source: None,
        }
    }
}

impl EncoderOptions {
    /// Options that always produce `salt`.
    pub fn with_fixed_salt(salt: [u8; SALT_LENGTH]) -> Self {
        Self {
            salt_source: Some(Arc::new(move || Ok::<_, EceError>(salt))),
            ..Self::default()
        }
    }

    pub(crate) fn next_salt(&self) -> Result<[u8; SALT_LENGTH], EceError> {
        match &self.salt_source {
            Some(source) => source(),
            None => random_salt(),
        }
    }
}

impl std::fmt::Debug for EncoderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderOptions")
            .field("record_size", &self.record_size)
            .field("keyid_len", &self.keyid.len())
            .field("custom_salt_source", &self.salt_source.is_some())
            .finish()
    }
}
