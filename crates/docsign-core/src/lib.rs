//! # docsign-core — Foundational Types for the DocSign Stack
//!
//! This crate is the bedrock of the DocSign Stack. It defines the core
//! type-system primitives that enforce correctness guarantees at compile time.
//! Every other crate in the workspace depends on `docsign-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `KeyId`, `DocumentId`,
//!    `UserId` — all newtypes with distinct namespaces. No bare strings or
//!    bare UUIDs for identifiers.
//!
//! 2. **`CanonicalPayload` newtype.** ALL payload digest computation flows
//!    through `CanonicalPayload::of()`. No ad-hoc field concatenation for
//!    digests. Ever. This prevents signer/verifier canonicalization splits
//!    by construction.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so the `created_at` bytes that enter the
//!    canonical payload are identical on every host.
//!
//! 4. **`payload_digest()` accepts only `&CanonicalPayload`.** Compile-time
//!    enforcement that all digest paths flow through canonicalization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `docsign-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod document;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::{payload_digest, CanonicalPayload, PayloadDigest};
pub use document::Document;
pub use error::Error;
pub use identity::{DocumentId, KeyId, UserId};
pub use temporal::Timestamp;
