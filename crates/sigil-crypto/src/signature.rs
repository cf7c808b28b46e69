//! Login-signature computation and verification.
//!
//! The identity provider proves possession of the shared application
//! secret by signing a canonical string with HMAC-SHA1:
//!
//! ```text
//! "{timestampEpochSeconds}_{userId}"
//! ```
//!
//! Both sides must agree on that byte sequence exactly, including the
//! timestamp's textual form (decimal seconds, no leading zeros).
//!
//! # Security
//!
//! - Verification compares digests in constant time via
//!   [`Mac::verify_slice`]; a string comparison of base64 text would leak
//!   a prefix-match timing signal
//! - Malformed input (empty uid, non-canonical timestamp, undecodable
//!   signature) verifies to `false`, never to an error - the caller's
//!   only branch is accept/reject
//! - SHA-1 collisions do not apply here: HMAC-SHA1 is not broken by
//!   collision attacks, and the algorithm is fixed by the provider

use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Compute the base64 HMAC-SHA1 signature for a (timestamp, uid) pair.
///
/// This is what the provider computes when issuing a signature; exposed
/// for callers that sign their own requests and for verification tests.
pub fn compute_signature(secret: &[u8], timestamp: &str, uid: &str) -> String {
    let mut mac = mac_for(secret);
    mac.update(base_string(timestamp, uid).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify a claimed login signature.
///
/// Returns `true` only when `signature` is the exact base64 HMAC-SHA1 of
/// the canonical string under `secret`. Returns `false` - never an error -
/// when the uid is empty, the timestamp is not canonical decimal epoch
/// seconds, the signature is not decodable base64, or the digest does not
/// match.
pub fn validate_signature(uid: &str, timestamp: &str, secret: &[u8], signature: &str) -> bool {
    if uid.is_empty() || !is_canonical_timestamp(timestamp) {
        return false;
    }
    let Ok(claimed) = STANDARD.decode(signature) else {
        return false;
    };

    let mut mac = mac_for(secret);
    mac.update(base_string(timestamp, uid).as_bytes());
    mac.verify_slice(&claimed).is_ok()
}

fn mac_for(secret: &[u8]) -> HmacSha1 {
    let Ok(mac) = HmacSha1::new_from_slice(secret) else {
        unreachable!("HMAC accepts keys of any length");
    };
    mac
}

fn base_string(timestamp: &str, uid: &str) -> String {
    format!("{timestamp}_{uid}")
}

/// A timestamp is canonical when it re-renders to itself as decimal
/// seconds: no leading zeros, no sign, no whitespace, no fraction.
fn is_canonical_timestamp(timestamp: &str) -> bool {
    match timestamp.parse::<u64>() {
        Ok(seconds) => seconds.to_string() == timestamp,
        Err(_) => false,
    }
}
