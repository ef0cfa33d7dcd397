//! Encrypted Content-Encoding dispatch.
//!
//! - `aes128gcm` is the current standard (RFC 8188).
//! - `aesgcm` is draft-ietf-httpbis-encryption-encoding-02, still sent by some
//!   push services. Recognized, not implemented.
//! - `aesgcm128` is an older draft. Recognized and rejected.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::aes128gcm::Aes128GcmCipher;
use crate::error::EceError;
use crate::header::Header;
use crate::types::EncoderOptions;

/// Encrypted content encodings known to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentEncoding {
    #[default]
    Aes128Gcm,
    AesGcm,
    AesGcm128,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes128Gcm => "aes128gcm",
            Self::AesGcm => "aesgcm",
            Self::AesGcm128 => "aesgcm128",
        }
    }

    /// Resolve an optional encoding name, defaulting to `aes128gcm`.
    pub fn resolve(name: Option<&str>) -> Result<Self, EceError> {
        name.map_or(Ok(Self::default()), |n| n.parse())
    }
}

impl FromStr for ContentEncoding {
    type Err = EceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aes128gcm" => Ok(Self::Aes128Gcm),
            "aesgcm" => Ok(Self::AesGcm),
            "aesgcm128" => Ok(Self::AesGcm128),
            other => Err(EceError::UnknownEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encrypts and decrypts message bodies for a shared IKM.
///
/// Holds only the IKM and header options. Every `encrypt` call generates a
/// new header (and salt), so sequence number 0 is safe to reuse across calls.
pub struct ContentEncoder {
    ikm: Zeroizing<Vec<u8>>,
    options: EncoderOptions,
}

impl ContentEncoder {
    pub fn new(ikm: &[u8]) -> Self {
        Self::with_options(ikm, EncoderOptions::default())
    }

    pub fn with_options(ikm: &[u8], options: EncoderOptions) -> Self {
        Self {
            ikm: Zeroizing::new(ikm.to_vec()),
            options,
        }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encrypt `data` as record 0 with the named encoding (default `aes128gcm`).
    pub fn encrypt(&self, data: &[u8], encoding: Option<&str>) -> Result<Vec<u8>, EceError> {
        self.encrypt_record(data, 0, encoding)
    }

    /// Decrypt record 0 with the named encoding (default `aes128gcm`).
    pub fn decrypt(&self, data: &[u8], encoding: Option<&str>) -> Result<Vec<u8>, EceError> {
        self.decrypt_record(data, 0, encoding)
    }

    pub fn encrypt_record(
        &self,
        data: &[u8],
        seq: u64,
        encoding: Option<&str>,
    ) -> Result<Vec<u8>, EceError> {
        let encoding = ContentEncoding::resolve(encoding)?;
        self.encrypt_with(data, seq, encoding)
    }

    pub fn decrypt_record(
        &self,
        data: &[u8],
        seq: u64,
        encoding: Option<&str>,
    ) -> Result<Vec<u8>, EceError> {
        let encoding = ContentEncoding::resolve(encoding)?;
        self.decrypt_with(data, seq, encoding)
    }

    pub fn encrypt_with(
        &self,
        data: &[u8],
        seq: u64,
        encoding: ContentEncoding,
    ) -> Result<Vec<u8>, EceError> {
        check_supported(encoding)?;
        debug!(%encoding, seq, len = data.len(), "encrypting content");
        let header = Header::generate(&self.options)?;
        Aes128GcmCipher::new(&self.ikm, header).encrypt(data, seq)
    }

    pub fn decrypt_with(
        &self,
        data: &[u8],
        seq: u64,
        encoding: ContentEncoding,
    ) -> Result<Vec<u8>, EceError> {
        check_supported(encoding)?;
        debug!(%encoding, seq, len = data.len(), "decrypting content");
        let header = Header::parse(data)?;
        Aes128GcmCipher::new(&self.ikm, header).decrypt(data, seq)
    }
}

fn check_supported(encoding: ContentEncoding) -> Result<(), EceError> {
    match encoding {
        ContentEncoding::Aes128Gcm => Ok(()),
        ContentEncoding::AesGcm => {
            warn!(%encoding, "content encoding not implemented");
            Err(EceError::NotImplemented(encoding.to_string()))
        }
        ContentEncoding::AesGcm128 => {
            warn!(%encoding, "content encoding rejected");
            Err(EceError::UnsupportedEncoding(encoding.to_string()))
        }
    }
}

impl fmt::Debug for ContentEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentEncoder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
