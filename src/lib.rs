pub mod aes128gcm;
pub mod base64url;
pub mod encoding;
pub mod error;
pub mod header;
pub mod key_schedule;
pub mod types;
pub mod vapid;

pub use aes128gcm::Aes128GcmCipher;
pub use base64url::{base64url_decode, base64url_encode, is_base64url};
pub use encoding::{ContentEncoder, ContentEncoding};
pub use error::{EceError, ErrorKind};
pub use header::{validate_record_size, Header};
pub use key_schedule::KeySchedule;
pub use types::{EncoderOptions, SaltSource, RS_DEFAULT, RS_MAXIMUM, RS_MINIMUM, SEQ_MAXIMUM};
pub use vapid::{VapidKeyPair, VapidKeys};
