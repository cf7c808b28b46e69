//! Key material wrappers.
//!
//! Both types own their bytes and zeroize them on drop. Neither implements
//! `Display`, and `Debug` prints only the length, so secrets cannot leak
//! through logging or error formatting.

use std::fmt;

use zeroize::Zeroize;

/// An opaque symmetric key.
///
/// Exists only for the duration of one cipher or derivation operation;
/// there is no persistent key identity. The bytes are either supplied
/// directly by the caller or derived via
/// [`derive_key`](crate::derive_key).
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Wrap raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Wrap a copy of the given key bytes.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec() }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.bytes.len())
    }
}

/// The decrypted application secret, used as an HMAC key.
///
/// Lives for the duration of one validation call. Must never be logged or
/// persisted; the at-rest representation is the encrypted form handled by
/// [`EncryptedSecret`](crate::EncryptedSecret).
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret {
    bytes: Vec<u8>,
}

impl SharedSecret {
    /// Wrap a recovered secret.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Raw secret bytes, for use as an HMAC key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret({} bytes)", self.bytes.len())
    }
}
