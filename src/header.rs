//! aes128gcm header codec.
//!
//! Wire format (RFC 8188 §2.1, integers big-endian):
//! [salt:16][rs:4][idlen:1][keyid:idlen]

use tracing::debug;

use crate::error::EceError;
use crate::types::{
    EncoderOptions, HEADER_MIN_LENGTH, IDLEN_LENGTH, KEYID_MAX_LENGTH, RS_DEFAULT, RS_LENGTH,
    RS_MAXIMUM, RS_MINIMUM, SALT_LENGTH,
};

/// Check a record size against the aes128gcm range [18, 2^36 - 31].
pub fn validate_record_size(rs: u64) -> Result<(), EceError> {
    if !(RS_MINIMUM..=RS_MAXIMUM).contains(&rs) {
        return Err(EceError::RecordSizeOutOfRange {
            rs,
            min: RS_MINIMUM,
            max: RS_MAXIMUM,
        });
    }
    Ok(())
}

/// Parameters of one aes128gcm message. Validated on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    salt: [u8; SALT_LENGTH],
    rs: u32,
    keyid: Vec<u8>,
}

impl Header {
    /// Build a header from explicit values.
    ///
    /// `rs` is taken as `u64` so the range check sees the caller's value
    /// before it is narrowed to the 4-byte wire field.
    pub fn new(salt: &[u8], rs: u64, keyid: &[u8]) -> Result<Self, EceError> {
        let salt: [u8; SALT_LENGTH] =
            salt.try_into().map_err(|_| EceError::InvalidSaltLength {
                expected: SALT_LENGTH,
                got: salt.len(),
            })?;
        validate_record_size(rs)?;
        let rs = u32::try_from(rs).map_err(|_| EceError::RecordSizeUnrepresentable(rs))?;
        if keyid.len() > KEYID_MAX_LENGTH {
            return Err(EceError::KeyIdTooLong(keyid.len()));
        }
        Ok(Self {
            salt,
            rs,
            keyid: keyid.to_vec(),
        })
    }

    /// Build a header with a fresh salt and the record size and keyid from `options`.
    pub fn generate(options: &EncoderOptions) -> Result<Self, EceError> {
        let salt = options.next_salt()?;
        let rs = options.record_size.unwrap_or(RS_DEFAULT);
        debug!(rs, idlen = options.keyid.len(), "generated aes128gcm header");
        Self::new(&salt, u64::from(rs), &options.keyid)
    }

    /// Parse a header from the front of `bytes`. Anything after the keyid is ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, EceError> {
        if bytes.len() < HEADER_MIN_LENGTH {
            return Err(EceError::HeaderTooShort {
                have: bytes.len(),
                need: HEADER_MIN_LENGTH,
            });
        }

        let salt = &bytes[..SALT_LENGTH];
        let mut rs_bytes = [0u8; RS_LENGTH];
        rs_bytes.copy_from_slice(&bytes[SALT_LENGTH..SALT_LENGTH + RS_LENGTH]);
        let rs = u32::from_be_bytes(rs_bytes);
        let idlen = usize::from(bytes[SALT_LENGTH + RS_LENGTH]);

        let need = HEADER_MIN_LENGTH + idlen;
        if bytes.len() < need {
            return Err(EceError::HeaderTooShort {
                have: bytes.len(),
                need,
            });
        }
        let keyid = &bytes[HEADER_MIN_LENGTH..need];

        Self::new(salt, u64::from(rs), keyid)
    }

    /// Serialize to exactly [`Header::byte_length`] bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_length());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.rs.to_be_bytes());
        out.push(self.idlen());
        out.extend_from_slice(&self.keyid);
        out
    }

    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    pub fn rs(&self) -> u32 {
        self.rs
    }

    pub fn keyid(&self) -> &[u8] {
        &self.keyid
    }

    /// Length of the keyid; always fits one byte.
    pub fn idlen(&self) -> u8 {
        // keyid length is checked against KEYID_MAX_LENGTH on construction
        self.keyid.len() as u8
    }

    pub fn byte_length(&self) -> usize {
        SALT_LENGTH + RS_LENGTH + IDLEN_LENGTH + self.keyid.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; 16] = [
        0x23, 0x50, 0x6c, 0xc6, 0xd1, 0x6d, 0xb6, 0x5b, 0xf7, 0xbb, 0xf3, 0xa8, 0xf7, 0x8c,
        0x67, 0x9b,
    ];

    #[test]
    fn serializes_rfc_example_header() {
        let header = Header::new(&SALT, 4096, &[]).unwrap();
        let bytes = header.serialize();
        assert_eq!(
            hex::encode(&bytes),
            "23506cc6d16db65bf7bbf3a8f78c679b0000100000"
        );
        assert_eq!(bytes.len(), header.byte_length());
    }

    #[test]
    fn parse_serialize_round_trip_with_keyid() {
        let header = Header::new(&SALT, 25, b"key-1").unwrap();
        let parsed = Header::parse(&header.serialize()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.idlen(), 5);
        assert_eq!(parsed.byte_length(), 16 + 4 + 1 + 5);
    }

    #[test]
    fn parse_ignores_trailing_record() {
        let header = Header::new(&SALT, 4096, b"k").unwrap();
        let mut bytes = header.serialize();
        bytes.extend_from_slice(&[0xaa; 40]);
        assert_eq!(Header::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn parse_rejects_short_buffer() {
        let err = Header::parse(&[0u8; 20]).unwrap_err();
        assert!(matches!(err, EceError::HeaderTooShort { have: 20, need: 21 }));
    }

    #[test]
    fn parse_rejects_truncated_keyid() {
        let mut bytes = Header::new(&SALT, 4096, &[]).unwrap().serialize();
        bytes[20] = 4;
        bytes.extend_from_slice(&[1, 2, 3]);
        let err = Header::parse(&bytes).unwrap_err();
        assert!(matches!(err, EceError::HeaderTooShort { have: 24, need: 25 }));
    }

    #[test]
    fn parse_rejects_small_rs() {
        let mut bytes = Header::new(&SALT, 4096, &[]).unwrap().serialize();
        bytes[16..20].copy_from_slice(&17u32.to_be_bytes());
        assert!(matches!(
            Header::parse(&bytes).unwrap_err(),
            EceError::RecordSizeOutOfRange { rs: 17, .. }
        ));
    }

    #[test]
    fn salt_length_boundaries() {
        assert!(Header::new(&[0u8; 16], 4096, &[]).is_ok());
        assert!(matches!(
            Header::new(&[0u8; 15], 4096, &[]).unwrap_err(),
            EceError::InvalidSaltLength { got: 15, .. }
        ));
        assert!(matches!(
            Header::new(&[0u8; 17], 4096, &[]).unwrap_err(),
            EceError::InvalidSaltLength { got: 17, .. }
        ));
    }

    #[test]
    fn record_size_boundaries() {
        assert!(Header::new(&SALT, 17, &[]).is_err());
        assert!(Header::new(&SALT, 18, &[]).is_ok());
        assert!(validate_record_size(RS_MAXIMUM).is_ok());
        assert!(validate_record_size(RS_MAXIMUM + 1).is_err());
        assert!(Header::new(&SALT, u64::from(u32::MAX), &[]).is_ok());
    }

    #[test]
    fn record_size_beyond_wire_field_rejected() {
        let err = Header::new(&SALT, RS_MAXIMUM, &[]).unwrap_err();
        assert!(matches!(err, EceError::RecordSizeUnrepresentable(rs) if rs == RS_MAXIMUM));
        let err = Header::new(&SALT, RS_MAXIMUM + 1, &[]).unwrap_err();
        assert!(matches!(err, EceError::RecordSizeOutOfRange { .. }));
    }

    #[test]
    fn keyid_length_boundaries() {
        let header = Header::new(&SALT, 4096, &[0x41; 255]).unwrap();
        assert_eq!(header.idlen(), 255);
        assert_eq!(Header::parse(&header.serialize()).unwrap(), header);
        assert!(matches!(
            Header::new(&SALT, 4096, &[0x41; 256]).unwrap_err(),
            EceError::KeyIdTooLong(256)
        ));
    }

    #[test]
    fn generate_uses_options() {
        let mut opts = EncoderOptions::with_fixed_salt(SALT);
        opts.record_size = Some(1024);
        opts.keyid = b"p256dh".to_vec();
        let header = Header::generate(&opts).unwrap();
        assert_eq!(header.salt(), &SALT);
        assert_eq!(header.rs(), 1024);
        assert_eq!(header.keyid(), b"p256dh");
    }

    #[test]
    fn generate_defaults() {
        let a = Header::generate(&EncoderOptions::default()).unwrap();
        let b = Header::generate(&EncoderOptions::default()).unwrap();
        assert_eq!(a.rs(), RS_DEFAULT);
        assert!(a.keyid().is_empty());
        assert_ne!(a.salt(), b.salt());
    }

    #[test]
    fn generate_rejects_bad_options() {
        let mut opts = EncoderOptions::with_fixed_salt(SALT);
        opts.record_size = Some(10);
        assert!(Header::generate(&opts).is_err());
    }
}
