//! # Signing Key Record and Lifecycle State
//!
//! The persisted signing-key row and the state machine all custody
//! operations respect.
//!
//! ## States
//!
//! ```text
//! Active ──▶ Revoked (terminal)
//!    │
//!    ├────▶ Deleted (terminal, independent of Revoked)
//!    │
//!    └────▶ Expired (derived from expires_at — never stored)
//! ```
//!
//! `Active` is the implicit initial state: a row with neither `revoked_at`
//! nor `deleted_at` set and no past `expires_at`. `Expired` is a derived
//! predicate computed against a caller-supplied clock, so a row flips to
//! expired the instant `expires_at` passes without any write.

use serde::{Deserialize, Serialize};

use docsign_core::{encoding, Error, KeyId, Timestamp, UserId};
use docsign_crypto::ed25519::Ed25519PublicKey;
use docsign_crypto::envelope::{EnvelopeCiphertext, IV_LEN};

/// The derived lifecycle state of a signing key at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    /// Usable for signing.
    Active,
    /// `expires_at` has passed (derived, never stored).
    Expired,
    /// `revoked_at` is set (terminal).
    Revoked,
    /// `deleted_at` is set (terminal).
    Deleted,
}

impl KeyState {
    /// Whether a key in this state may produce signatures.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for KeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
            Self::Deleted => "DELETED",
        };
        f.write_str(s)
    }
}

/// Envelope-wrapped private key material in its persisted form:
/// AES-256-GCM ciphertext and IV, both base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Base64 AES-256-GCM ciphertext (tag appended).
    pub ciphertext: String,
    /// Base64 96-bit IV.
    pub iv: String,
}

impl EncryptedSecret {
    /// Encode an envelope for persistence.
    pub fn from_envelope(envelope: &EnvelopeCiphertext) -> Self {
        Self {
            ciphertext: encoding::encode(&envelope.ciphertext),
            iv: encoding::encode(envelope.iv),
        }
    }

    /// Decode the persisted form back into an envelope.
    ///
    /// A wrong-length IV is a corrupted row, reported as
    /// [`Error::Integrity`] like any other envelope damage.
    pub fn to_envelope(&self) -> Result<EnvelopeCiphertext, Error> {
        let ciphertext = encoding::decode(&self.ciphertext)?;
        let iv_bytes = encoding::decode(&self.iv)?;
        let iv: [u8; IV_LEN] = iv_bytes
            .try_into()
            .map_err(|v: Vec<u8>| {
                Error::Integrity(format!("stored IV must be {IV_LEN} bytes, got {}", v.len()))
            })?;
        Ok(EnvelopeCiphertext { ciphertext, iv })
    }
}

/// A persisted signing key row.
///
/// The private half exists only as envelope ciphertext; the passphrase
/// only as its PBKDF2 record. Nothing in this struct is secret on its
/// own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningKey {
    /// Stable opaque key identifier.
    pub kid: KeyId,
    /// Ed25519 public key (SPKI DER, base64 via serde).
    pub public_key: Ed25519PublicKey,
    /// Envelope-wrapped private seed.
    pub encrypted_private: EncryptedSecret,
    /// Self-describing PBKDF2 passphrase record.
    pub passphrase_hash: String,
    /// The owner this key signs for.
    pub assigned_to: UserId,
    /// Row creation time.
    pub created_at: Timestamp,
    /// Optional hard expiry.
    pub expires_at: Option<Timestamp>,
    /// Set by revocation (terminal).
    pub revoked_at: Option<Timestamp>,
    /// Set by deletion (terminal).
    pub deleted_at: Option<Timestamp>,
}

impl SigningKey {
    /// The derived lifecycle state at `now`.
    ///
    /// Deletion shadows revocation, which shadows expiry — a deleted key
    /// reports `Deleted` even if it was also revoked or has expired.
    pub fn state_at(&self, now: Timestamp) -> KeyState {
        if self.deleted_at.is_some() {
            KeyState::Deleted
        } else if self.revoked_at.is_some() {
            KeyState::Revoked
        } else if self.expires_at.is_some_and(|exp| exp <= now) {
            KeyState::Expired
        } else {
            KeyState::Active
        }
    }

    /// The usability invariant: `revoked_at` and `deleted_at` both absent
    /// AND (`expires_at` absent OR in the future).
    pub fn is_usable_at(&self, now: Timestamp) -> bool {
        self.state_at(now).is_usable()
    }
}
