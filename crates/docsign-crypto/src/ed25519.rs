//! # Ed25519 Signing and Verification
//!
//! Provides Ed25519 key generation, signing, and verification for
//! institutional document signatures.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&PayloadDigest` — you cannot sign raw bytes.
//!   The protocol is hash-then-sign: the signed artifact is always the
//!   32-byte SHA-256 payload digest, never the document itself, so the
//!   verifier can re-check quickly from the stored hash while full
//!   recomputation still guards integrity.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does
//!   not implement `Serialize`; the seed leaves the type only through
//!   [`Ed25519KeyPair::seed()`], already wrapped in `Zeroizing`, on its
//!   way into the envelope cipher.
//!
//! ## Storage Encodings
//!
//! - Public keys persist as base64-encoded SPKI DER (RFC 5280 / RFC 8410).
//! - Signatures persist as base64 of the raw 64 signature bytes.

use ed25519_dalek::pkcs8::{DecodePublicKey, EncodePublicKey};
use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use docsign_core::{encoding, Error, PayloadDigest};

/// An Ed25519 public key for signature verification.
///
/// Serializes as base64-encoded SPKI DER for storage interoperability.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey(ed25519_dalek::VerifyingKey);

/// An Ed25519 signature (64 bytes).
///
/// Serializes as a base64 string — the stored `signature` column form.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519Signature([u8; 64]);

/// An Ed25519 key pair for signing operations.
///
/// Does not implement `Serialize` — private keys must not be accidentally
/// serialized into rows, responses, or logs.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey impls
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Encode the public key as base64 SPKI DER — the persisted form.
    pub fn to_spki_b64(&self) -> Result<String, Error> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| Error::Crypto(format!("SPKI encoding failed: {e}")))?;
        Ok(encoding::encode(der.as_bytes()))
    }

    /// Parse a public key from its base64 SPKI DER persisted form.
    pub fn from_spki_b64(text: &str) -> Result<Self, Error> {
        let der = encoding::decode(text)?;
        let vk = ed25519_dalek::VerifyingKey::from_public_key_der(&der)
            .map_err(|e| Error::Crypto(format!("invalid SPKI public key: {e}")))?;
        Ok(Self(vk))
    }

    /// Access the underlying dalek verifying key.
    pub fn verifying_key(&self) -> &ed25519_dalek::VerifyingKey {
        &self.0
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let b64 = self.to_spki_b64().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&b64)
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let b64 = String::deserialize(deserializer)?;
        Self::from_spki_b64(&b64).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", hex_prefix(self.0.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as base64 — the persisted form.
    pub fn to_base64(&self) -> String {
        encoding::encode(self.0)
    }

    /// Parse a signature from its base64 persisted form.
    pub fn from_base64(text: &str) -> Result<Self, Error> {
        let bytes = encoding::decode(text)?;
        let arr: [u8; 64] = bytes.try_into().map_err(|v: Vec<u8>| {
            Error::Crypto(format!("signature must be 64 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let b64 = String::deserialize(deserializer)?;
        Self::from_base64(&b64).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", hex_prefix(&self.0))
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Reconstruct a key pair from a raw 32-byte private seed — the
    /// unwrap path after envelope decryption.
    pub fn from_seed(seed: &[u8]) -> Result<Self, Error> {
        let arr: [u8; 32] = seed.try_into().map_err(|_| {
            Error::Crypto(format!("seed must be 32 bytes, got {}", seed.len()))
        })?;
        Ok(Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&arr),
        })
    }

    /// Export the private seed for envelope wrapping.
    ///
    /// The only egress point for private material; the copy is zeroized
    /// when the caller drops it.
    pub fn seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Get the public key from this key pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key())
    }

    /// Sign a payload digest.
    ///
    /// The signing input MUST be `&PayloadDigest` — the 32 bytes produced
    /// by the canonical payload hasher. Signing anything else is a
    /// compile error.
    pub fn sign(&self, digest: &PayloadDigest) -> Ed25519Signature {
        let sig = self.signing_key.sign(digest.as_bytes());
        Ed25519Signature(sig.to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over a payload digest.
///
/// Returns `true` when the signature matches, `false` when it does not.
/// A mismatch is a legitimate verification outcome, not an error.
pub fn verify_digest(
    digest: &PayloadDigest,
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> bool {
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    public_key
        .verifying_key()
        .verify(digest.as_bytes(), &sig)
        .is_ok()
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}
