use base64ct::{Base64UrlUnpadded, Encoding};

use crate::error::EceError;

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Base64url decode an unpadded string to bytes.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, EceError> {
    Base64UrlUnpadded::decode_vec(s).map_err(|e| EceError::InvalidBase64(e.to_string()))
}

/// True if `s` is non-empty and uses only the URL-safe alphabet `[A-Za-z0-9_-]`.
///
/// Checks the alphabet only; the length may still be undecodable.
pub fn is_base64url(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
