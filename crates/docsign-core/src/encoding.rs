//! # Base64 Codec
//!
//! Byte ↔ text encoding for storage and transmission of key material,
//! ciphertexts, and signatures. Standard alphabet with padding; one
//! engine for the whole workspace so stored values always round-trip.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::Error;

/// Encode bytes as standard base64 text.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64.encode(bytes)
}

/// Decode standard base64 text into bytes.
///
/// Fails with [`Error::Decode`] on malformed input. No side effects.
pub fn decode(text: &str) -> Result<Vec<u8>, Error> {
    Ok(BASE64.decode(text)?)
}
