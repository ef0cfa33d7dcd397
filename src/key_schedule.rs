//! HKDF-SHA256 key schedule for aes128gcm (RFC 8188 §2.2, §2.3).
//!
//! PRK   = HKDF-Extract(salt, IKM)
//! CEK   = HKDF-Expand(PRK, "Content-Encoding: aes128gcm\0", 16)
//! NONCE = HKDF-Expand(PRK, "Content-Encoding: nonce\0", 12) XOR SEQ

use std::sync::OnceLock;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::EceError;
use crate::header::Header;
use crate::types::{CEK_INFO, CEK_LENGTH, NONCE_INFO, NONCE_LENGTH, PRK_LENGTH, SEQ_MAXIMUM};

/// HKDF-Extract with SHA-256.
pub fn hkdf_extract(ikm: &[u8], salt: &[u8]) -> [u8; PRK_LENGTH] {
    let (prk, _) = Hkdf::<Sha256>::extract(Some(salt), ikm);
    let mut out = [0u8; PRK_LENGTH];
    out.copy_from_slice(&prk);
    out
}

/// HKDF-Expand with SHA-256 into an `N`-byte output.
pub fn hkdf_expand<const N: usize>(prk: &[u8], info: &[u8]) -> Result<[u8; N], EceError> {
    let hk = Hkdf::<Sha256>::from_prk(prk)
        .map_err(|e| EceError::KeyDerivationFailed(format!("invalid PRK: {}", e)))?;
    let mut okm = [0u8; N];
    hk.expand(info, &mut okm)
        .map_err(|e| EceError::KeyDerivationFailed(format!("HKDF expand failed: {}", e)))?;
    Ok(okm)
}

/// Get a cached secret, deriving it on first use.
///
/// Two threads racing here both derive; the first stored value wins and the
/// other is dropped, which is fine because derivation is deterministic.
fn cached<const N: usize>(
    cell: &OnceLock<Zeroizing<[u8; N]>>,
    derive: impl FnOnce() -> Result<[u8; N], EceError>,
) -> Result<&[u8; N], EceError> {
    if let Some(value) = cell.get() {
        return Ok(&**value);
    }
    let value = Zeroizing::new(derive()?);
    Ok(&**cell.get_or_init(|| value))
}

/// Derived keys for one (IKM, header) pair.
///
/// Nothing is derived until first asked for. The schedule does not track
/// which sequence numbers have been used: encrypting twice with the same
/// `seq` reuses a nonce.
pub struct KeySchedule {
    ikm: Zeroizing<Vec<u8>>,
    header: Header,
    prk: OnceLock<Zeroizing<[u8; PRK_LENGTH]>>,
    cek: OnceLock<Zeroizing<[u8; CEK_LENGTH]>>,
    base_nonce: OnceLock<Zeroizing<[u8; NONCE_LENGTH]>>,
}

impl KeySchedule {
    pub fn new(ikm: &[u8], header: Header) -> Self {
        Self {
            ikm: Zeroizing::new(ikm.to_vec()),
            header,
            prk: OnceLock::new(),
            cek: OnceLock::new(),
            base_nonce: OnceLock::new(),
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Pseudo-random key, HKDF-Extract(salt, IKM).
    pub fn prk(&self) -> Result<&[u8; PRK_LENGTH], EceError> {
        cached(&self.prk, || Ok(hkdf_extract(&self.ikm, self.header.salt())))
    }

    /// 16-byte content-encryption key.
    pub fn cek(&self) -> Result<&[u8; CEK_LENGTH], EceError> {
        let prk = self.prk()?;
        cached(&self.cek, || hkdf_expand(prk, CEK_INFO))
    }

    fn base_nonce(&self) -> Result<&[u8; NONCE_LENGTH], EceError> {
        let prk = self.prk()?;
        cached(&self.base_nonce, || hkdf_expand(prk, NONCE_INFO))
    }

    /// Nonce for record `seq`: the base nonce XOR `seq` as a 96-bit big-endian integer.
    ///
    /// `seq` is limited to 2^53 - 1.
    pub fn nonce(&self, seq: u64) -> Result<[u8; NONCE_LENGTH], EceError> {
        if seq > SEQ_MAXIMUM {
            return Err(EceError::SequenceOutOfRange(seq));
        }
        let base = self.base_nonce()?;

        let mut seq_bytes = [0u8; NONCE_LENGTH];
        seq_bytes[NONCE_LENGTH - 8..].copy_from_slice(&seq.to_be_bytes());

        let mut nonce = [0u8; NONCE_LENGTH];
        for (out, (b, s)) in nonce.iter_mut().zip(base.iter().zip(seq_bytes.iter())) {
            *out = b ^ s;
        }
        Ok(nonce)
    }
}

impl std::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySchedule")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}
