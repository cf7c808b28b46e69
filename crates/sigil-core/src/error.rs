//! Error types for the policy layer.
//!
//! Cryptographic failures pass through transparently from `sigil-crypto`.
//! Entropy failure is fatal to the calling operation and is never
//! retried. Note what is deliberately NOT an error: signature validation
//! resolves to a rejection, and a missing key-encryption key resolves to
//! the explicit unprotected pass-through.

use thiserror::Error;

pub use sigil_crypto::CryptoError;

/// Errors that can occur in vault and login operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Failure in the cryptographic core.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The OS entropy source failed. Fatal to the calling operation.
    #[error("entropy source unavailable")]
    EntropySourceUnavailable(#[source] rand::Error),

    /// Credential configuration is unusable.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials {
        /// Which field or rule was violated
        reason: String,
    },
}
