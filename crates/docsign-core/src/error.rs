//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error kinds used throughout the DocSign Stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - One workspace-wide enum: every custody and signing operation surfaces
//!   one of these kinds, so callers can map them to transport responses
//!   without inspecting message strings.
//! - Verification *outcomes* (`SIGNATURE_INVALID`, `KEY_REVOKED`, ...) are
//!   not errors — "invalid" is a legitimate terminal answer and lives in
//!   the verifier's structured report instead.
//! - `Forbidden` carries no detail beyond its kind on the wrong-passphrase
//!   path, so the gate cannot be used as an oracle.

use thiserror::Error;

/// Top-level error type for the DocSign Stack.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad input: passphrase-policy violation, malformed identifier,
    /// or an operation against a key in a state that forbids it.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced document, key, or owner does not exist — including
    /// "no usable signing key" (every candidate revoked, deleted, or
    /// expired).
    #[error("not found: {0}")]
    NotFound(String),

    /// The master key is missing or not exactly 32 bytes. Fatal for the
    /// operation and not retriable by the caller.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Wrong passphrase. Deliberately carries no further distinction.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Envelope decryption failed unexpectedly — tampered ciphertext or a
    /// rotated/mismatched master key. An operational alarm, not a user
    /// error.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Malformed base64 input.
    #[error("decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Key material could not be encoded or parsed (SPKI DER, seed
    /// length). Indicates a corrupted row rather than bad caller input.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl Error {
    /// Stable machine-readable kind tag, independent of the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Configuration(_) => "CONFIGURATION",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Integrity(_) => "INTEGRITY",
            Self::Decode(_) => "DECODE",
            Self::Crypto(_) => "CRYPTO",
        }
    }
}
