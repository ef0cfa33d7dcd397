//! VAPID application server key pair (RFC 8292).
//!
//! P-256 keys exported the way push services expect them: the private key as
//! a 32-byte scalar, the public key as a 65-byte uncompressed SEC1 point.

use p256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::base64url::{base64url_decode, base64url_encode};
use crate::error::EceError;

/// P-256 private scalar length.
pub const VAPID_PRIVATE_KEY_LENGTH: usize = 32;

/// Uncompressed SEC1 point length: 0x04 || x || y.
pub const VAPID_PUBLIC_KEY_LENGTH: usize = 65;

/// Base64url-encoded key pair, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VapidKeys {
    pub private_key: String,
    pub public_key: String,
}

pub struct VapidKeyPair {
    signing_key: SigningKey,
    public_key: [u8; VAPID_PUBLIC_KEY_LENGTH],
}

impl VapidKeyPair {
    /// Generate a new random key pair.
    pub fn generate_random() -> Result<Self, EceError> {
        let signing_key = SigningKey::random(&mut p256::elliptic_curve::rand_core::OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Build a key pair from a 32-byte private scalar.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self, EceError> {
        if private_key.len() != VAPID_PRIVATE_KEY_LENGTH {
            return Err(EceError::InvalidKey(format!(
                "expected {} byte P-256 scalar, got {}",
                VAPID_PRIVATE_KEY_LENGTH,
                private_key.len()
            )));
        }
        let signing_key = SigningKey::from_slice(private_key)
            .map_err(|e| EceError::InvalidKey(format!("P-256 scalar: {}", e)))?;
        Self::from_signing_key(signing_key)
    }

    /// Build a key pair from a base64url-encoded private scalar.
    pub fn from_base64url(private_key: &str) -> Result<Self, EceError> {
        let bytes = Zeroizing::new(base64url_decode(private_key)?);
        Self::from_private_key(&bytes)
    }

    fn from_signing_key(signing_key: SigningKey) -> Result<Self, EceError> {
        let point = signing_key.verifying_key().to_encoded_point(false);
        let public_key: [u8; VAPID_PUBLIC_KEY_LENGTH] =
            point.as_bytes().try_into().map_err(|_| {
                EceError::InvalidKey(format!(
                    "expected {} byte public key, got {}",
                    VAPID_PUBLIC_KEY_LENGTH,
                    point.as_bytes().len()
                ))
            })?;
        Ok(Self {
            signing_key,
            public_key,
        })
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// 32-byte private scalar.
    pub fn private_key(&self) -> Zeroizing<[u8; VAPID_PRIVATE_KEY_LENGTH]> {
        let mut out = Zeroizing::new([0u8; VAPID_PRIVATE_KEY_LENGTH]);
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// 65-byte uncompressed public key.
    pub fn public_key(&self) -> &[u8; VAPID_PUBLIC_KEY_LENGTH] {
        &self.public_key
    }

    pub fn to_base64url(&self) -> VapidKeys {
        VapidKeys {
            private_key: base64url_encode(&*self.private_key()),
            public_key: base64url_encode(&self.public_key),
        }
    }

    /// Export the private key as a JWK.
    pub fn to_jwk(&self) -> Value {
        let x = base64url_encode(&self.public_key[1..33]);
        let y = base64url_encode(&self.public_key[33..]);
        let d = base64url_encode(&*self.private_key());

        serde_json::json!({
            "kty": "EC",
            "crv": "P-256",
            "x": x,
            "y": y,
            "d": d,
        })
    }
}

impl std::fmt::Debug for VapidKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VapidKeyPair")
            .field("public_key", &base64url_encode(&self.public_key))
            .finish_non_exhaustive()
    }
}
