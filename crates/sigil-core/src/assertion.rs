//! Login-assertion verification flow.
//!
//! A login assertion is the identity provider's claim that a user
//! authenticated: a uid, the timestamp the provider signed, and the
//! signature proving possession of the shared secret. The decision here
//! gates the rest of the login flow - on [`LoginDecision::Accepted`] the
//! caller proceeds to fetch the account profile (an external collaborator
//! call, out of scope), on [`LoginDecision::Rejected`] the login is
//! refused.
//!
//! Rejections are logged with the uid only; the secret and signature
//! never reach the log stream.

use sigil_crypto::{SharedSecret, validate_signature};
use tracing::{debug, warn};

use crate::{config::SiteCredentials, error::VaultError, kek::KeyProvider};

/// A login assertion as returned by the provider's signature-exchange
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAssertion {
    /// Claimed user identifier.
    pub uid: String,
    /// Epoch seconds the provider signed, in its exact textual form
    /// (the exchange call's `signatureTimestamp` field).
    pub signature_timestamp: String,
    /// Base64 HMAC signature over `"{timestamp}_{uid}"` (the exchange
    /// call's `UIDSignature` field).
    pub uid_signature: String,
}

/// Outcome of a login authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDecision {
    /// The assertion is authentic; proceed with the login.
    Accepted,
    /// The assertion is invalid or malformed; refuse the login.
    Rejected,
}

/// Verify an assertion against the decrypted application secret.
///
/// Returns `true` only on an exact signature match; malformed input of
/// any kind verifies to `false`.
pub fn verify_assertion(assertion: &LoginAssertion, secret: &SharedSecret) -> bool {
    let valid = validate_signature(
        &assertion.uid,
        &assertion.signature_timestamp,
        secret.as_bytes(),
        &assertion.uid_signature,
    );
    if !valid {
        debug!(uid = %assertion.uid, "login assertion rejected");
    }
    valid
}

/// The complete login trust decision.
///
/// Unseals the stored application secret with the resolved KEK, then
/// verifies the assertion against it.
///
/// # Errors
///
/// [`VaultError::Crypto`] if the stored secret cannot be recovered. A
/// signature that does not verify is NOT an error; it is
/// [`LoginDecision::Rejected`].
pub fn authorize_login(
    credentials: &SiteCredentials,
    provider: &impl KeyProvider,
    assertion: &LoginAssertion,
) -> Result<LoginDecision, VaultError> {
    let unsealed = credentials.decrypt_secret(provider)?;
    if !unsealed.was_encrypted() {
        warn!("application secret was stored unprotected");
    }

    if verify_assertion(assertion, unsealed.secret()) {
        Ok(LoginDecision::Accepted)
    } else {
        Ok(LoginDecision::Rejected)
    }
}
