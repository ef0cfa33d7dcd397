use thiserror::Error;

/// Broad failure category of an [`EceError`].
///
/// Callers that only care about *why* an operation was refused (bad input,
/// forged data, unsupported scheme) match on this instead of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed header, envelope or header parameter.
    Format,
    /// Record sequence number outside the supported range.
    Range,
    /// AEAD tag verification failed.
    Authentication,
    /// Recognized encoding that is deliberately rejected.
    UnsupportedEncoding,
    /// Recognized encoding that is not built yet.
    NotImplemented,
    /// Unrecognized encoding name.
    TypeMismatch,
    /// Failure inside a cryptographic primitive or codec.
    Crypto,
}

#[derive(Debug, Error)]
pub enum EceError {
    #[error("Invalid salt length: expected {expected} bytes, got {got}")]
    InvalidSaltLength { expected: usize, got: usize },

    #[error("Invalid record size: {rs}, expected: [{min}, {max}]")]
    RecordSizeOutOfRange { rs: u64, min: u64, max: u64 },

    #[error("Record size {0} does not fit the 4-byte rs field")]
    RecordSizeUnrepresentable(u64),

    #[error("Invalid keyid length: {0}, the byte length must be less than 256")]
    KeyIdTooLong(usize),

    #[error("Header too short: need {need} bytes, have {have}")]
    HeaderTooShort { have: usize, need: usize },

    #[error("Encrypted data too short: need at least {need} bytes, have {have}")]
    DataTooShort { have: usize, need: usize },

    #[error("Envelope header does not match the key schedule header")]
    HeaderMismatch,

    #[error("Invalid record sequence number: {0}")]
    SequenceOutOfRange(u64),

    #[error("Decryption failed: authentication tag mismatch")]
    AuthenticationFailed,

    #[error("Unsupported content encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Content encoding not implemented: {0}")]
    NotImplemented(String),

    #[error("Unknown content encoding: {0}")]
    UnknownEncoding(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid base64url: {0}")]
    InvalidBase64(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

impl EceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSaltLength { .. }
            | Self::RecordSizeOutOfRange { .. }
            | Self::RecordSizeUnrepresentable(_)
            | Self::KeyIdTooLong(_)
            | Self::HeaderTooShort { .. }
            | Self::DataTooShort { .. }
            | Self::HeaderMismatch => ErrorKind::Format,
            Self::SequenceOutOfRange(_) => ErrorKind::Range,
            Self::AuthenticationFailed => ErrorKind::Authentication,
            Self::UnsupportedEncoding(_) => ErrorKind::UnsupportedEncoding,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::UnknownEncoding(_) => ErrorKind::TypeMismatch,
            Self::KeyDerivationFailed(_)
            | Self::EncryptionFailed(_)
            | Self::InvalidKey(_)
            | Self::InvalidBase64(_)
            | Self::RngFailed(_) => ErrorKind::Crypto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_categories() {
        assert_eq!(EceError::KeyIdTooLong(256).kind(), ErrorKind::Format);
        assert_eq!(EceError::SequenceOutOfRange(1 << 53).kind(), ErrorKind::Range);
        assert_eq!(EceError::AuthenticationFailed.kind(), ErrorKind::Authentication);
        assert_eq!(
            EceError::UnknownEncoding("gzip".into()).kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn messages_carry_values() {
        let err = EceError::InvalidSaltLength {
            expected: 16,
            got: 15,
        };
        assert_eq!(
            err.to_string(),
            "Invalid salt length: expected 16 bytes, got 15"
        );
    }
}
