//! AES-128-GCM record cipher for the aes128gcm content encoding.
//!
//! Envelope: [header][ciphertext + tag]
//! Exactly one record per envelope, encrypted with an empty AAD.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use tracing::warn;

use crate::error::EceError;
use crate::header::Header;
use crate::key_schedule::KeySchedule;
use crate::types::{CEK_LENGTH, NONCE_LENGTH, PRK_LENGTH, TAG_LENGTH};

/// Encrypts and decrypts single-record aes128gcm envelopes for one header.
#[derive(Debug)]
pub struct Aes128GcmCipher {
    schedule: KeySchedule,
}

impl Aes128GcmCipher {
    /// Create a cipher for `ikm` and `header`.
    ///
    /// # Arguments
    /// * `ikm` - Input keying material shared with the peer
    /// * `header` - Header of the message; its salt keys the schedule
    pub fn new(ikm: &[u8], header: Header) -> Self {
        Self {
            schedule: KeySchedule::new(ikm, header),
        }
    }

    pub fn header(&self) -> &Header {
        self.schedule.header()
    }

    pub fn prk(&self) -> Result<&[u8; PRK_LENGTH], EceError> {
        self.schedule.prk()
    }

    pub fn cek(&self) -> Result<&[u8; CEK_LENGTH], EceError> {
        self.schedule.cek()
    }

    pub fn nonce(&self, seq: u64) -> Result<[u8; NONCE_LENGTH], EceError> {
        self.schedule.nonce(seq)
    }

    fn aead(&self) -> Result<Aes128Gcm, EceError> {
        Aes128Gcm::new_from_slice(self.schedule.cek()?)
            .map_err(|e| EceError::EncryptionFailed(e.to_string()))
    }

    /// Encrypt `data` as record `seq`.
    ///
    /// Returns: [header][ciphertext + tag]. Each `seq` must be used once per header.
    pub fn encrypt(&self, data: &[u8], seq: u64) -> Result<Vec<u8>, EceError> {
        let nonce_bytes = self.schedule.nonce(seq)?;
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = self
            .aead()?
            .encrypt(nonce, data)
            .map_err(|e| EceError::EncryptionFailed(e.to_string()))?;

        let header = self.header().serialize();
        let mut result = Vec::with_capacity(header.len() + ciphertext.len());
        result.extend_from_slice(&header);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt record `seq` from an envelope produced under this header.
    pub fn decrypt(&self, envelope: &[u8], seq: u64) -> Result<Vec<u8>, EceError> {
        let header_len = self.header().byte_length();
        let need = header_len + TAG_LENGTH;
        if envelope.len() < need {
            return Err(EceError::DataTooShort {
                have: envelope.len(),
                need,
            });
        }
        if envelope[..header_len] != self.header().serialize()[..] {
            return Err(EceError::HeaderMismatch);
        }

        let nonce_bytes = self.schedule.nonce(seq)?;
        let nonce = Nonce::from_slice(&nonce_bytes);
        self.aead()?
            .decrypt(nonce, &envelope[header_len..])
            .map_err(|_| {
                warn!(seq, len = envelope.len(), "aes128gcm record failed authentication");
                EceError::AuthenticationFailed
            })
    }
}
