//! Sigil policy layer.
//!
//! Everything the pure crypto crate deliberately leaves out: resolving
//! the key-encryption key (explicit key, `KEK` environment variable, or
//! none), drawing entropy, credential configuration, and the login trust
//! decision.
//!
//! # Login flow
//!
//! ```text
//! stored secret ──unseal──▶ SharedSecret
//!                               │
//! exchange call ──▶ LoginAssertion (uid, timestamp, signature)
//!                               │
//!                        verify_assertion
//!                               │
//!                  Accepted ────┴──── Rejected
//! ```
//!
//! The surrounding API glue - the exchange call itself, profile fetching,
//! account updates - is delegation to an external SDK and lives outside
//! this crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod assertion;
pub mod config;
pub mod error;
pub mod kek;
pub mod vault;

pub use assertion::{LoginAssertion, LoginDecision, authorize_login, verify_assertion};
pub use config::SiteCredentials;
pub use error::VaultError;
pub use kek::{EnvKeyProvider, KEK_ENV, KeyProvider, NoKeyProvider, StaticKeyProvider, generate_kek};
pub use vault::{SealedSecret, UnsealedSecret, seal, unseal};
