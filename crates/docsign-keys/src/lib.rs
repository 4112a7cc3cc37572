//! # docsign-keys — Signing Key Custody
//!
//! Key lifecycle and CRUD for the DocSign Stack:
//!
//! - **Key record** (`key.rs`): the persisted `SigningKey` row and its
//!   derived lifecycle state (active / expired / revoked / deleted).
//! - **Policy** (`policy.rs`): the passphrase policy layer — a replaceable
//!   business rule on top of the cryptographic gate, never baked into it.
//! - **Store** (`store.rs`): the `KeyStore` abstraction with atomic
//!   single-row updates, plus the in-process implementation.
//! - **Registry** (`registry.rs`): create / find-usable / revoke / delete /
//!   change-passphrase operations.
//!
//! ## Security Invariant
//!
//! Private key seeds exist in this crate only transiently inside
//! `SigningKeyRegistry::create`, between generation and envelope wrap,
//! and are zeroized after. Rows persist only wrapped ciphertext.

pub mod key;
pub mod policy;
pub mod registry;
pub mod store;

pub use key::{EncryptedSecret, KeyState, SigningKey};
pub use policy::{InstitutionalPolicy, PassphrasePolicy};
pub use registry::SigningKeyRegistry;
pub use store::{InMemoryKeyStore, InMemoryUserDirectory, KeyStore, UserDirectory};
