//! # Passphrase Policy
//!
//! The business-rule layer validated before any key material is
//! generated. Policy is deliberately separate from the cryptographic
//! gate in `docsign-crypto` — institutions tune these rules without
//! touching the KDF.

use docsign_core::Error;

/// A replaceable passphrase acceptance rule.
pub trait PassphrasePolicy: Send + Sync {
    /// Accept or reject a candidate passphrase.
    fn validate(&self, passphrase: &str) -> Result<(), Error>;
}

/// The default institutional policy: minimum length, required prefix,
/// at least one non-alphanumeric character.
#[derive(Debug, Clone)]
pub struct InstitutionalPolicy {
    /// Minimum passphrase length in characters.
    pub min_length: usize,
    /// Required institutional prefix.
    pub required_prefix: String,
    /// Whether at least one non-alphanumeric character is required.
    pub require_symbol: bool,
}

impl Default for InstitutionalPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            required_prefix: "CA-".to_string(),
            require_symbol: true,
        }
    }
}

impl PassphrasePolicy for InstitutionalPolicy {
    fn validate(&self, passphrase: &str) -> Result<(), Error> {
        if passphrase.chars().count() < self.min_length {
            return Err(Error::Validation(format!(
                "passphrase must be at least {} characters",
                self.min_length
            )));
        }
        if !passphrase.starts_with(&self.required_prefix) {
            return Err(Error::Validation(format!(
                "passphrase must start with {:?}",
                self.required_prefix
            )));
        }
        if self.require_symbol && passphrase.chars().all(|c| c.is_alphanumeric()) {
            return Err(Error::Validation(
                "passphrase must contain at least one non-alphanumeric character".into(),
            ));
        }
        Ok(())
    }
}
