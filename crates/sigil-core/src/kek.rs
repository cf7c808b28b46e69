//! Key-encryption-key resolution and generation.
//!
//! The original design read the KEK straight from a process environment
//! variable inside the cipher. Here that lookup is a [`KeyProvider`]
//! capability injected into each operation, so tests substitute
//! deterministic keys and never touch the process environment.
//!
//! A provider returning `None` is a valid outcome with defined semantics:
//! seal/unseal degrade to the documented unprotected pass-through (see
//! [`crate::vault`]) instead of erroring.

use rand::{RngCore, rngs::OsRng};
use sigil_crypto::{KeyMaterial, SALT_SIZE, derive_key};
use zeroize::Zeroizing;

use crate::error::VaultError;

/// Environment variable consulted by [`EnvKeyProvider::new`].
pub const KEK_ENV: &str = "KEK";

/// Length of a generated passphrase when the caller supplies none.
const GENERATED_PASSPHRASE_SIZE: usize = 32;

/// Capability for obtaining the key-encryption key.
pub trait KeyProvider {
    /// Return the KEK, or `None` when no key is available.
    ///
    /// `None` is not an error: it selects the unprotected pass-through
    /// behavior of seal/unseal.
    fn resolve(&self) -> Option<KeyMaterial>;
}

/// Reads the KEK from a process environment variable.
///
/// An unset or empty variable resolves to no key. The variable's value is
/// used as raw key bytes; length is enforced by the cipher, not here.
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    var: String,
}

impl EnvKeyProvider {
    /// Provider reading the default [`KEK_ENV`] variable.
    pub fn new() -> Self {
        Self { var: KEK_ENV.to_string() }
    }

    /// Provider reading a custom variable name.
    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyProvider for EnvKeyProvider {
    fn resolve(&self) -> Option<KeyMaterial> {
        let value = std::env::var(&self.var).ok()?;
        if value.is_empty() {
            return None;
        }
        Some(KeyMaterial::new(value.into_bytes()))
    }
}

/// A fixed key, for tests and callers managing their own key material.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    key: KeyMaterial,
}

impl StaticKeyProvider {
    /// Wrap an explicit key.
    pub fn new(key: KeyMaterial) -> Self {
        Self { key }
    }
}

impl KeyProvider for StaticKeyProvider {
    fn resolve(&self) -> Option<KeyMaterial> {
        Some(self.key.clone())
    }
}

/// A provider that never yields a key, forcing pass-through mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeyProvider;

impl KeyProvider for NoKeyProvider {
    fn resolve(&self) -> Option<KeyMaterial> {
        None
    }
}

/// Generate a fresh KEK from a passphrase.
///
/// When `passphrase` is `None`, a random 32-byte passphrase is drawn
/// first. A fresh random salt is drawn for every call and then discarded,
/// so the derived key cannot be re-derived later: generated KEKs are
/// single-use, in-memory values by design. Two calls with the same
/// passphrase therefore produce different keys.
///
/// # Errors
///
/// [`VaultError::EntropySourceUnavailable`] if the OS entropy source
/// fails.
pub fn generate_kek(passphrase: Option<&[u8]>) -> Result<KeyMaterial, VaultError> {
    let mut salt = [0u8; SALT_SIZE];
    fill_random(&mut salt)?;

    match passphrase {
        Some(passphrase) => Ok(derive_key(passphrase, &salt)),
        None => {
            let mut generated = Zeroizing::new([0u8; GENERATED_PASSPHRASE_SIZE]);
            fill_random(generated.as_mut_slice())?;
            Ok(derive_key(generated.as_slice(), &salt))
        }
    }
}

/// Fill a buffer from the OS entropy source.
pub(crate) fn fill_random(buffer: &mut [u8]) -> Result<(), VaultError> {
    OsRng.try_fill_bytes(buffer).map_err(VaultError::EntropySourceUnavailable)
}

#[cfg(test)]
mod tests {
    use sigil_crypto::KEY_SIZE;

    use super::*;

    #[test]
    fn generated_kek_has_cipher_key_size() {
        let key = generate_kek(Some(b"passphrase")).unwrap();
        assert_eq!(key.len(), KEY_SIZE);

        let key = generate_kek(None).unwrap();
        assert_eq!(key.len(), KEY_SIZE);
    }

    #[test]
    fn same_passphrase_yields_different_keys() {
        // The salt is fresh and discarded on every call: derivation is
        // intentionally non-reproducible.
        let a = generate_kek(Some(b"same-passphrase")).unwrap();
        let b = generate_kek(Some(b"same-passphrase")).unwrap();

        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn static_provider_returns_its_key() {
        let provider = StaticKeyProvider::new(KeyMaterial::from_slice(&[7; KEY_SIZE]));
        let resolved = provider.resolve().unwrap();
        assert_eq!(resolved.as_bytes(), &[7; KEY_SIZE]);
    }

    #[test]
    fn no_key_provider_resolves_nothing() {
        assert!(NoKeyProvider.resolve().is_none());
    }

    #[test]
    fn unset_env_var_resolves_nothing() {
        // Deliberately improbable name; tests never mutate the process
        // environment, that is what the provider abstraction is for.
        let provider = EnvKeyProvider::with_var("SIGIL_TEST_KEK_THAT_IS_NEVER_SET");
        assert!(provider.resolve().is_none());
    }

    #[test]
    fn default_provider_reads_kek_var() {
        let provider = EnvKeyProvider::new();
        assert_eq!(format!("{provider:?}"), "EnvKeyProvider { var: \"KEK\" }");
    }
}
