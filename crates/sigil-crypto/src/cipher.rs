//! Secret encryption at rest using AES-256-CBC.
//!
//! All functions are pure - the random IV must be provided by the caller.
//! This enables deterministic testing; entropy sourcing lives with the
//! policy layer.
//!
//! # Wire format
//!
//! ```text
//! legacy:  base64( IV[16] || ciphertext )
//! tagged:  base64( suite_id[1] || IV[16] || ciphertext )
//! ```
//!
//! The legacy form is the persisted-at-rest representation and round-trips
//! exactly with existing stored secrets. The tagged form prefixes a cipher
//! suite identifier byte so the algorithm that produced a blob is recorded
//! rather than guessed.
//!
//! # Security
//!
//! - The IV must be fresh random bytes for every encryption; reuse under
//!   the same key leaks plaintext block equality
//! - Padding errors and cipher errors both surface as the opaque
//!   [`CryptoError::DecryptionFailed`] (no padding oracle)
//! - CBC provides no integrity: a tampered ciphertext either fails
//!   padding or decrypts to garbage, and callers must treat the recovered
//!   secret as untrusted input to a subsequent authentication step

use aes::Aes256;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use zeroize::Zeroizing;

use crate::{error::CryptoError, material::KeyMaterial};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Cipher block length, and therefore the IV length prefixed to every
/// ciphertext.
pub const IV_SIZE: usize = 16;

/// Required key length for AES-256.
pub const KEY_SIZE: usize = 32;

/// Identifies the algorithm that produced an encrypted blob.
///
/// Historical deployments used two incompatible cipher variants for stored
/// secrets. This implementation supports exactly one; the identifier
/// exists so at-rest blobs can be tagged (see
/// [`EncryptedSecret::to_tagged_base64`]) and future migrations can read
/// the suite off the blob instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSuite {
    /// AES-256 in CBC mode with PKCS#7 padding.
    Aes256Cbc,
}

impl CipherSuite {
    /// Stable one-byte identifier used in the tagged wire form.
    pub fn wire_id(self) -> u8 {
        match self {
            Self::Aes256Cbc => 0x01,
        }
    }

    /// Parse a wire identifier byte.
    pub fn from_wire_id(id: u8) -> Option<Self> {
        match id {
            0x01 => Some(Self::Aes256Cbc),
            _ => None,
        }
    }
}

/// An encrypted secret: a random IV followed by the CBC ciphertext.
///
/// # Invariants
///
/// - `bytes` is always at least [`IV_SIZE`] long; parsing rejects shorter
///   blobs as [`CryptoError::MalformedInput`]
/// - the ciphertext portion length is a whole number of cipher blocks for
///   any blob this module produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    suite: CipherSuite,
    /// IV || ciphertext
    bytes: Vec<u8>,
}

impl EncryptedSecret {
    /// Algorithm this blob was encrypted under.
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// The initialization vector (first [`IV_SIZE`] bytes).
    pub fn iv(&self) -> &[u8] {
        &self.bytes[..IV_SIZE]
    }

    /// The ciphertext (everything after the IV).
    pub fn ciphertext(&self) -> &[u8] {
        &self.bytes[IV_SIZE..]
    }

    /// The raw `IV || ciphertext` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encode in the legacy at-rest form: `base64(IV || ciphertext)`.
    ///
    /// This is the representation existing stored secrets use and must
    /// round-trip exactly.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes).trim_end().to_string()
    }

    /// Parse the legacy at-rest form.
    ///
    /// The suite is assumed to be [`CipherSuite::Aes256Cbc`]; the legacy
    /// form carries no algorithm identifier.
    ///
    /// # Errors
    ///
    /// [`CryptoError::MalformedInput`] if the text is not valid base64 or
    /// the decoded blob is shorter than one IV.
    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD.decode(text.trim()).map_err(|_| CryptoError::MalformedInput {
            reason: "invalid base64".to_string(),
        })?;
        Self::from_raw(CipherSuite::Aes256Cbc, bytes)
    }

    /// Encode in the tagged form: `base64(suite_id || IV || ciphertext)`.
    pub fn to_tagged_base64(&self) -> String {
        let mut tagged = Vec::with_capacity(1 + self.bytes.len());
        tagged.push(self.suite.wire_id());
        tagged.extend_from_slice(&self.bytes);
        STANDARD.encode(&tagged)
    }

    /// Parse the tagged form, reading the suite off the leading byte.
    ///
    /// # Errors
    ///
    /// [`CryptoError::MalformedInput`] on invalid base64, an unknown suite
    /// identifier, or a blob shorter than one IV.
    pub fn from_tagged_base64(text: &str) -> Result<Self, CryptoError> {
        let decoded = STANDARD.decode(text.trim()).map_err(|_| CryptoError::MalformedInput {
            reason: "invalid base64".to_string(),
        })?;
        let Some((&id, rest)) = decoded.split_first() else {
            return Err(CryptoError::MalformedInput { reason: "empty blob".to_string() });
        };
        let suite = CipherSuite::from_wire_id(id).ok_or_else(|| CryptoError::MalformedInput {
            reason: format!("unknown cipher suite id {id:#04x}"),
        })?;
        Self::from_raw(suite, rest.to_vec())
    }

    fn from_raw(suite: CipherSuite, bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.len() < IV_SIZE {
            return Err(CryptoError::MalformedInput {
                reason: format!("blob is {} bytes, shorter than the {IV_SIZE}-byte IV", bytes.len()),
            });
        }
        Ok(Self { suite, bytes })
    }
}

/// Encrypt a secret under AES-256-CBC with the caller-supplied IV.
///
/// # Security
///
/// - `iv` MUST be fresh cryptographically secure random bytes; never reuse
///   an IV with the same key
/// - The key must be exactly [`KEY_SIZE`] bytes; any other length is
///   rejected, never truncated or padded
///
/// # Errors
///
/// [`CryptoError::InvalidKeyLength`] if the key is not [`KEY_SIZE`] bytes.
pub fn encrypt_secret(
    plaintext: &[u8],
    key: &KeyMaterial,
    iv: [u8; IV_SIZE],
) -> Result<EncryptedSecret, CryptoError> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: key.len() });
    }

    let Ok(cipher) = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv) else {
        unreachable!("key and IV lengths verified above");
    };
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut bytes = Vec::with_capacity(IV_SIZE + ciphertext.len());
    bytes.extend_from_slice(&iv);
    bytes.extend_from_slice(&ciphertext);

    Ok(EncryptedSecret { suite: CipherSuite::Aes256Cbc, bytes })
}

/// Decrypt a secret encrypted by [`encrypt_secret`].
///
/// Returns the plaintext in a zeroizing buffer; it holds the application
/// secret and must not outlive its use.
///
/// # Errors
///
/// - [`CryptoError::InvalidKeyLength`] if the key is not [`KEY_SIZE`] bytes
/// - [`CryptoError::DecryptionFailed`] on any cipher or padding error,
///   with no further detail
pub fn decrypt_secret(
    encrypted: &EncryptedSecret,
    key: &KeyMaterial,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: key.len() });
    }

    let ciphertext = encrypted.ciphertext();
    if ciphertext.is_empty() || ciphertext.len() % IV_SIZE != 0 {
        return Err(CryptoError::DecryptionFailed);
    }

    let Ok(cipher) = Aes256CbcDec::new_from_slices(key.as_bytes(), encrypted.iv()) else {
        unreachable!("key and IV lengths verified above");
    };
    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    use super::*;

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_slice(&[0x42; KEY_SIZE])
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = b"the application secret";

        let encrypted = encrypt_secret(plaintext, &key, [0xAB; IV_SIZE]).unwrap();
        let decrypted = decrypt_secret(&encrypted, &key).unwrap();

        assert_eq!(decrypted.as_slice(), plaintext);
    }

    #[test]
    fn encrypt_decrypt_empty_plaintext() {
        let key = test_key();

        let encrypted = encrypt_secret(b"", &key, [0x00; IV_SIZE]).unwrap();
        // PKCS#7 always emits at least one full block
        assert_eq!(encrypted.ciphertext().len(), IV_SIZE);

        let decrypted = decrypt_secret(&encrypted, &key).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn iv_is_prefixed_to_ciphertext() {
        let key = test_key();
        let iv = [0xC3; IV_SIZE];

        let encrypted = encrypt_secret(b"secret", &key, iv).unwrap();

        assert_eq!(encrypted.iv(), &iv);
        assert_eq!(encrypted.as_bytes().len(), IV_SIZE + encrypted.ciphertext().len());
    }

    #[test]
    fn different_ivs_produce_different_ciphertexts() {
        let key = test_key();

        let a = encrypt_secret(b"secret", &key, [0x00; IV_SIZE]).unwrap();
        let b = encrypt_secret(b"secret", &key, [0x01; IV_SIZE]).unwrap();

        assert_ne!(a.ciphertext(), b.ciphertext());
    }

    #[test]
    fn wrong_key_never_silently_succeeds() {
        let key = test_key();
        let other = KeyMaterial::from_slice(&[0x43; KEY_SIZE]);
        let plaintext = b"the application secret";

        let encrypted = encrypt_secret(plaintext, &key, [0x11; IV_SIZE]).unwrap();

        // A wrong key either fails padding or yields different bytes;
        // it must never reproduce the plaintext.
        match decrypt_secret(&encrypted, &other) {
            Err(CryptoError::DecryptionFailed) => {}
            Err(err) => panic!("unexpected error: {err:?}"),
            Ok(recovered) => assert_ne!(recovered.as_slice(), plaintext),
        }
    }

    #[test]
    fn tampered_ciphertext_never_silently_succeeds() {
        let key = test_key();
        let plaintext = b"the application secret";

        let encrypted = encrypt_secret(plaintext, &key, [0x22; IV_SIZE]).unwrap();

        for bit in 0..8 {
            let mut bytes = encrypted.as_bytes().to_vec();
            // flip one bit in the ciphertext portion
            bytes[IV_SIZE] ^= 1 << bit;
            let tampered =
                EncryptedSecret::from_base64(&STANDARD.encode(&bytes)).unwrap();

            match decrypt_secret(&tampered, &key) {
                Err(CryptoError::DecryptionFailed) => {}
                Err(err) => panic!("unexpected error: {err:?}"),
                Ok(recovered) => assert_ne!(recovered.as_slice(), plaintext),
            }
        }
    }

    #[test]
    fn short_key_rejected() {
        let short = KeyMaterial::from_slice(&[0x42; 16]);

        let err = encrypt_secret(b"secret", &short, [0x00; IV_SIZE]).unwrap_err();
        assert_eq!(err, CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: 16 });

        let key = test_key();
        let encrypted = encrypt_secret(b"secret", &key, [0x00; IV_SIZE]).unwrap();
        let err = decrypt_secret(&encrypted, &short).unwrap_err();
        assert_eq!(err, CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: 16 });
    }

    #[test]
    fn legacy_base64_roundtrip() {
        let key = test_key();
        let encrypted = encrypt_secret(b"secret", &key, [0x77; IV_SIZE]).unwrap();

        let stored = encrypted.to_base64();
        assert!(!stored.ends_with(char::is_whitespace));

        let parsed = EncryptedSecret::from_base64(&stored).unwrap();
        assert_eq!(parsed, encrypted);
        assert_eq!(decrypt_secret(&parsed, &key).unwrap().as_slice(), b"secret");
    }

    #[test]
    fn tagged_base64_roundtrip() {
        let key = test_key();
        let encrypted = encrypt_secret(b"secret", &key, [0x77; IV_SIZE]).unwrap();

        let tagged = encrypted.to_tagged_base64();
        let parsed = EncryptedSecret::from_tagged_base64(&tagged).unwrap();

        assert_eq!(parsed.suite(), CipherSuite::Aes256Cbc);
        assert_eq!(parsed, encrypted);
    }

    #[test]
    fn unknown_suite_id_rejected() {
        let mut blob = vec![0xFF]; // no suite uses 0xFF
        blob.extend_from_slice(&[0u8; IV_SIZE + 16]);

        let err = EncryptedSecret::from_tagged_base64(&STANDARD.encode(&blob)).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedInput { .. }));
    }

    #[test]
    fn invalid_base64_rejected() {
        let err = EncryptedSecret::from_base64("not base64 at all!!!").unwrap_err();
        assert!(matches!(err, CryptoError::MalformedInput { .. }));
    }

    #[test]
    fn blob_shorter_than_iv_rejected() {
        let short = STANDARD.encode([0u8; IV_SIZE - 1]);
        let err = EncryptedSecret::from_base64(&short).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedInput { .. }));
    }

    #[test]
    fn truncated_ciphertext_fails_generically() {
        let key = test_key();
        let encrypted = encrypt_secret(b"secret", &key, [0x55; IV_SIZE]).unwrap();

        // Strip half a block off the ciphertext: structurally parseable,
        // but no longer a whole number of blocks.
        let truncated = &encrypted.as_bytes()[..IV_SIZE + 8];
        let parsed = EncryptedSecret::from_base64(&STANDARD.encode(truncated)).unwrap();

        assert_eq!(decrypt_secret(&parsed, &key).unwrap_err(), CryptoError::DecryptionFailed);
    }

    #[test]
    fn whitespace_around_stored_form_is_tolerated() {
        let key = test_key();
        let encrypted = encrypt_secret(b"secret", &key, [0x66; IV_SIZE]).unwrap();

        let padded = format!("  {}\n", encrypted.to_base64());
        let parsed = EncryptedSecret::from_base64(&padded).unwrap();
        assert_eq!(parsed, encrypted);
    }

    #[test]
    fn matches_nist_cbc_vector() {
        // NIST SP 800-38A, F.2.5 CBC-AES256.Encrypt, first block. Pins
        // the cipher identity: this only passes for AES-256-CBC.
        let key = KeyMaterial::new(
            hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
                .unwrap(),
        );
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&hex::decode("000102030405060708090a0b0c0d0e0f").unwrap());
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let encrypted = encrypt_secret(&plaintext, &key, iv).unwrap();

        assert_eq!(
            hex::encode(&encrypted.ciphertext()[..IV_SIZE]),
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6"
        );
    }

    #[test]
    fn cipher_suite_wire_ids_roundtrip() {
        let suite = CipherSuite::Aes256Cbc;
        assert_eq!(CipherSuite::from_wire_id(suite.wire_id()), Some(suite));
        assert_eq!(CipherSuite::from_wire_id(0x00), None);
    }
}
