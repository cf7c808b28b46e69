//! Seal/unseal policy over the pure cipher.
//!
//! This layer owns everything the cipher deliberately does not: resolving
//! the key-encryption key through a [`KeyProvider`], drawing the random
//! IV, and the legacy missing-key behavior.
//!
//! # Missing-key pass-through
//!
//! When no KEK can be resolved, seal and unseal return the input
//! unchanged instead of erroring. This preserves a long-standing (and
//! risky) deployment behavior: installations without a KEK store the
//! secret in plaintext. What this implementation refuses to do is hide
//! that fact - the outcome is a distinct [`SealedSecret::Unprotected`]
//! variant / [`UnsealedSecret::was_encrypted`] flag and a warning log, so
//! a caller can never mistake plaintext for ciphertext.

use sigil_crypto::{
    EncryptedSecret, IV_SIZE, SharedSecret, decrypt_secret, encrypt_secret,
};
use tracing::warn;

use crate::{
    error::VaultError,
    kek::{KeyProvider, fill_random},
};

/// Outcome of sealing a secret for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealedSecret {
    /// Ciphertext produced under a resolved KEK.
    Encrypted(EncryptedSecret),
    /// No KEK could be resolved; the input is unchanged plaintext.
    Unprotected(String),
}

impl SealedSecret {
    /// Whether the secret was actually encrypted.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }

    /// The textual at-rest form: legacy `base64(IV || ciphertext)` when
    /// encrypted, the plaintext itself when unprotected.
    pub fn into_stored(self) -> String {
        match self {
            Self::Encrypted(encrypted) => encrypted.to_base64(),
            Self::Unprotected(plaintext) => plaintext,
        }
    }
}

/// A secret recovered from its at-rest form.
#[derive(Debug)]
pub struct UnsealedSecret {
    secret: SharedSecret,
    was_encrypted: bool,
}

impl UnsealedSecret {
    /// The recovered application secret.
    pub fn secret(&self) -> &SharedSecret {
        &self.secret
    }

    /// Whether the stored form was actually ciphertext. `false` means the
    /// secret was stored in plaintext under the missing-key pass-through.
    pub fn was_encrypted(&self) -> bool {
        self.was_encrypted
    }

    /// Consume, yielding the recovered secret.
    pub fn into_secret(self) -> SharedSecret {
        self.secret
    }
}

/// Seal a secret for storage at rest.
///
/// Resolves the KEK through `provider`; with a key, draws a fresh random
/// IV and encrypts. Without one, returns the documented
/// [`SealedSecret::Unprotected`] pass-through.
///
/// # Errors
///
/// - [`VaultError::EntropySourceUnavailable`] if drawing the IV fails
/// - [`VaultError::Crypto`] if the resolved key has the wrong length
pub fn seal(plaintext: &str, provider: &impl KeyProvider) -> Result<SealedSecret, VaultError> {
    let Some(key) = provider.resolve() else {
        warn!("no key-encryption key available; storing secret unprotected");
        return Ok(SealedSecret::Unprotected(plaintext.to_string()));
    };

    let mut iv = [0u8; IV_SIZE];
    fill_random(&mut iv)?;

    let encrypted = encrypt_secret(plaintext.as_bytes(), &key, iv)?;
    Ok(SealedSecret::Encrypted(encrypted))
}

/// Recover a secret from its at-rest form.
///
/// With a resolvable KEK, `stored` must be a legacy-form encrypted blob.
/// Without one, `stored` is taken as plaintext and flagged accordingly.
///
/// # Errors
///
/// - [`VaultError::Crypto`] with [`CryptoError::MalformedInput`] if the
///   stored text is not a parseable blob
/// - [`VaultError::Crypto`] with [`CryptoError::DecryptionFailed`] on a
///   wrong key or corrupted ciphertext
///
/// [`CryptoError::MalformedInput`]: sigil_crypto::CryptoError::MalformedInput
/// [`CryptoError::DecryptionFailed`]: sigil_crypto::CryptoError::DecryptionFailed
pub fn unseal(stored: &str, provider: &impl KeyProvider) -> Result<UnsealedSecret, VaultError> {
    let Some(key) = provider.resolve() else {
        warn!("no key-encryption key available; treating stored secret as plaintext");
        return Ok(UnsealedSecret {
            secret: SharedSecret::new(stored.as_bytes().to_vec()),
            was_encrypted: false,
        });
    };

    let encrypted = EncryptedSecret::from_base64(stored)?;
    let plaintext = decrypt_secret(&encrypted, &key)?;

    Ok(UnsealedSecret { secret: SharedSecret::new(plaintext.to_vec()), was_encrypted: true })
}
