//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the DocSign Stack.
//! These prevent accidental identifier confusion — you cannot pass a
//! `UserId` where a `KeyId` is expected.
//!
//! ## Security Invariant
//!
//! Type-level distinction between identifier namespaces prevents
//! cross-namespace confusion where a document id is substituted for a
//! key id in a lookup or a signature row.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Stable opaque identifier for a signing key (the `kid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyId(pub Uuid);

/// Unique identifier for an institutional document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

/// Unique identifier for a user (key owner, document author, signer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl KeyId {
    /// Generate a fresh globally-unique key identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a key identifier from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let raw = s.strip_prefix("key:").unwrap_or(s);
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| Error::Validation(format!("invalid key id {s:?}: {e}")))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl DocumentId {
    /// Generate a new random document identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl UserId {
    /// Generate a new random user identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "key:{}", self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "document:{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}
