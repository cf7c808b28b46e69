//! Sigil Cryptographic Primitives
//!
//! Credential-protection and signature-verification core. Pure functions
//! with deterministic outputs. Callers provide random bytes (IVs, salts)
//! for deterministic testing; entropy sourcing and key-resolution policy
//! live in `sigil-core`.
//!
//! # Secret Lifecycle
//!
//! An application secret is encrypted at rest under a key-encryption key
//! (KEK). Verifying a login assertion needs the decrypted secret as an
//! HMAC key:
//!
//! ```text
//! passphrase ──PBKDF2──▶ KEK
//!                         │
//! secret ──AES-256-CBC───▶ base64(IV ‖ ciphertext)   (at rest)
//!                         │
//!                      decrypt
//!                         │
//!                         ▼
//!            HMAC-SHA1("{timestamp}_{uid}") ──▶ accept / reject login
//! ```
//!
//! # Security
//!
//! - Decryption failures are opaque: padding and cipher errors are the
//!   same [`CryptoError::DecryptionFailed`], preventing padding oracles
//! - Signature digests are compared in constant time
//! - Key material and recovered secrets are zeroized on drop
//! - Malformed verification input resolves to `false`, never to an error,
//!   so the trust decision has exactly two outcomes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod derivation;
pub mod error;
pub mod material;
pub mod signature;

pub use cipher::{
    CipherSuite, EncryptedSecret, IV_SIZE, KEY_SIZE, decrypt_secret, encrypt_secret,
};
pub use derivation::{PBKDF2_ITERATIONS, SALT_SIZE, derive_key};
pub use error::CryptoError;
pub use material::{KeyMaterial, SharedSecret};
pub use signature::{compute_signature, validate_signature};
