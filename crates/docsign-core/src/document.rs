//! # Document View
//!
//! The cryptographically relevant projection of an institutional document.
//! Documents are owned and mutated by external collaborators; this crate
//! only ever reads the four fields that enter the canonical payload.

use serde::{Deserialize, Serialize};

use crate::identity::{DocumentId, UserId};
use crate::temporal::Timestamp;

/// An institutional document, reduced to the fields the signing protocol
/// depends on.
///
/// Exactly `title`, `content`, `user_id`, and `created_at` are hashed —
/// any other field the external document record carries is invisible to
/// signing and verification and may change freely without invalidating
/// signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The document identifier (external namespace).
    pub id: DocumentId,
    /// Document title.
    pub title: String,
    /// Full document content.
    pub content: String,
    /// The authoring user.
    pub user_id: UserId,
    /// The persisted creation timestamp. Canonicalization must use this
    /// stored value — a freshly generated timestamp would make signer
    /// and verifier disagree.
    pub created_at: Timestamp,
}
