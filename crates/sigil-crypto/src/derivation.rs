//! Key derivation from a passphrase using PBKDF2-HMAC-SHA256.
//!
//! Pure and deterministic: the salt is an input, not something this
//! module invents. The policy layer draws fresh random salts (and, when
//! no passphrase is supplied, a random one) and deliberately discards
//! them, so a derived key cannot be re-derived later. Derived keys are
//! single-use, in-memory values.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{cipher::KEY_SIZE, material::KeyMaterial};

/// Salt length fed to PBKDF2.
pub const SALT_SIZE: usize = 32;

/// PBKDF2 iteration count.
///
/// Matches the count the original deployment used. Raising it would not
/// break anything at rest (derived keys are never re-derived), but the
/// count is part of the documented derivation contract.
pub const PBKDF2_ITERATIONS: u32 = 1000;

/// Derive a [`KEY_SIZE`]-byte symmetric key from a passphrase and salt.
///
/// PBKDF2-HMAC-SHA256 with [`PBKDF2_ITERATIONS`] rounds. Deterministic:
/// the same passphrase and salt always produce the same key; a fresh salt
/// always produces a fresh key.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_SIZE]) -> KeyMaterial {
    let mut derived = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ITERATIONS, &mut derived);

    let key = KeyMaterial::from_slice(&derived);
    derived.zeroize();
    key
}
