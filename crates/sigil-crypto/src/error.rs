//! Error types for the cryptographic core.
//!
//! The taxonomy is deliberately small. Decryption failures are a single
//! opaque variant: padding errors and cipher errors MUST be
//! indistinguishable to callers, otherwise the error channel becomes a
//! padding oracle.

use thiserror::Error;

/// Errors produced by the cryptographic core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Stored blob is not valid base64, or is too short to contain an IV.
    #[error("malformed encrypted secret: {reason}")]
    MalformedInput {
        /// What made the input unparseable (encoding, not key material)
        reason: String,
    },

    /// Supplied key is not exactly the cipher's required length.
    ///
    /// Key length is rejected, never canonicalized. Silently truncating or
    /// padding a key would let two sides disagree about which key they
    /// share.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Length required by the cipher
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Decryption failed.
    ///
    /// Carries no detail: a wrong key, corrupted ciphertext, and bad
    /// PKCS#7 padding all surface as this same variant.
    #[error("decryption failed")]
    DecryptionFailed,
}
