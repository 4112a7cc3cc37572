//! # docsign-service — Signing and Verification Orchestration
//!
//! The operational layer of the DocSign Stack:
//!
//! - **Signature store** (`signature.rs`): the append-only
//!   `DocumentSignature` log and its "current signature" query.
//! - **Document store** (`store.rs`): the seam to the external document
//!   collaborator — load and mark-signed, nothing else.
//! - **Signer** (`signer.rs`): gate → envelope → canonical hash → Ed25519,
//!   with the crash-safe persist ordering.
//! - **Verifier** (`verifier.rs`): pure-read verification returning a
//!   structured report, never an exception for "invalid".
//! - **Facade** (`service.rs`): the five external operations.
//!
//! ## Security Invariant
//!
//! Decrypted private key bytes exist only inside
//! `DocumentSigner::sign_document`, wrapped in `Zeroizing`, and never
//! reach the stores, the logs, or any return value.

pub mod service;
pub mod signature;
pub mod signer;
pub mod store;
pub mod verifier;

pub use service::{CreatedKey, RevokedKey, SigningService};
pub use signature::{DocumentSignature, InMemorySignatureStore, SignatureStore};
pub use signer::{DocumentSigner, SignedDocument};
pub use store::{DocumentStore, InMemoryDocumentStore};
pub use verifier::{DocumentVerifier, VerificationReason, VerificationReport};
