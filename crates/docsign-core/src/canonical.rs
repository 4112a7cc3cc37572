//! # Canonical Payload — Deterministic Document Byte Production
//!
//! This module defines `CanonicalPayload`, the sole construction path for
//! the bytes that are hashed and signed for a document.
//!
//! ## Security Invariant
//!
//! The `CanonicalPayload` newtype has a private inner field. The only way
//! to construct it is through `CanonicalPayload::of()`, which serializes
//! exactly `title`, `content`, `user_id`, `created_at` — in that order —
//! as length-prefixed UTF-8. Any function that hashes document bytes must
//! accept `&CanonicalPayload`, so a signer/verifier split over field set,
//! order, or encoding is structurally impossible.
//!
//! ## Wire Shape
//!
//! Each field is `[u32 BE byte length][UTF-8 bytes]`. Length prefixes make
//! the mapping injective: no choice of titles and contents can collide
//! with another document's payload, which a delimiter-joined scheme could
//! not guarantee.
//!
//! Any change to this shape invalidates every previously issued signature.

use sha2::{Digest, Sha256};

use crate::document::Document;
use crate::error::Error;

/// Bytes produced exclusively by canonical document serialization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalPayload::of()`.
/// - Field order is fixed: `title`, `content`, `user_id`, `created_at`.
/// - `user_id` is rendered as the bare UUID, `created_at` as ISO-8601 Z
///   with seconds precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPayload(Vec<u8>);

impl CanonicalPayload {
    /// Construct the canonical payload for a document.
    ///
    /// This is the ONLY way to produce payload bytes. Both the signer and
    /// the verifier call this over their current view of the document.
    pub fn of(document: &Document) -> Self {
        let user_id = document.user_id.as_uuid().to_string();
        let created_at = document.created_at.to_iso8601();
        let fields: [&str; 4] = [&document.title, &document.content, &user_id, &created_at];
        let total: usize = fields.iter().map(|f| 4 + f.len()).sum();
        let mut bytes = Vec::with_capacity(total);
        for field in fields {
            bytes.extend_from_slice(&(field.len() as u32).to_be_bytes());
            bytes.extend_from_slice(field.as_bytes());
        }
        Self(bytes)
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A SHA-256 payload digest (32 bytes).
///
/// Produced exclusively from `CanonicalPayload` via [`payload_digest()`].
/// This is the artifact that gets signed — hash-then-sign keeps the
/// signed message constant-size regardless of document length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadDigest([u8; 32]);

impl PayloadDigest {
    /// Access the raw 32 digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as 64 lowercase hex characters — the stored
    /// `payload_hash` form.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a digest from its stored 64-character hex form.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let hex = hex.trim();
        if hex.len() != 64 {
            return Err(Error::Validation(format!(
                "payload hash must be 64 hex chars, got {}",
                hex.len()
            )));
        }
        // Byte-offset slicing below requires single-byte characters.
        if !hex.is_ascii() {
            return Err(Error::Validation(
                "payload hash must be ASCII hex".into(),
            ));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in bytes.iter_mut().enumerate() {
            let pos = i * 2;
            *chunk = u8::from_str_radix(&hex[pos..pos + 2], 16).map_err(|e| {
                Error::Validation(format!("invalid hex at position {pos}: {e}"))
            })?;
        }
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for PayloadDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute the SHA-256 digest of a canonical payload.
///
/// Accepts only `&CanonicalPayload`, not raw `&[u8]`. This compile-time
/// constraint prevents any code path from hashing non-canonical bytes.
pub fn payload_digest(payload: &CanonicalPayload) -> PayloadDigest {
    let hash = Sha256::digest(payload.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    PayloadDigest(bytes)
}
