//! SHA-256 content hashing for fetched recipe resources

use sha2::{Digest, Sha256};

/// A payload to be hashed
///
/// Build files arrive as decoded text and are hashed as their UTF-8 bytes;
/// archives are hashed as raw bytes. Both paths yield the same digest for the
/// same underlying bytes.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl Payload<'_> {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }
}

/// Lowercase hex SHA-256 digest of a payload
pub fn digest(payload: Payload<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Shorthand for [`digest`] over raw bytes
pub fn digest_bytes(bytes: &[u8]) -> String {
    digest(Payload::Bytes(bytes))
}

/// Shorthand for [`digest`] over text
pub fn digest_text(text: &str) -> String {
    digest(Payload::Text(text))
}
