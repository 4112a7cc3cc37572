//! # docsign-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for the DocSign Stack:
//!
//! - **Ed25519** signing and verification of payload digests
//!   (hash-then-sign: the signed message is always 32 bytes).
//! - **Envelope cipher** — AES-256-GCM wrap/unwrap of private key seeds
//!   under a process-wide master key.
//! - **Passphrase gate** — PBKDF2-HMAC-SHA256 hashing and constant-time
//!   verification of per-key passphrases.
//!
//! ## Crate Policy
//!
//! - Depends only on `docsign-core` internally.
//! - No mocking of cryptographic operations in tests — all tests use real
//!   PBKDF2, real AES-GCM, real Ed25519.
//! - Secret material (master key, unwrapped seeds, derived keys) is
//!   zeroized when dropped and never appears in `Debug` output.

pub mod ed25519;
pub mod envelope;
pub mod passphrase;

pub use ed25519::{verify_digest, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use envelope::{unwrap, wrap, EnvelopeCiphertext, MasterKey};
pub use passphrase::{hash_passphrase, rotate_passphrase, verify_passphrase};
