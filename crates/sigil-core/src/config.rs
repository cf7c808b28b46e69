//! Site credential configuration.
//!
//! A plain value struct passed into each operation. The original design
//! held these fields in a mutable helper object initialized from a config
//! file; nothing here needs process-wide state, so credentials are just
//! data.
//!
//! `Debug` redacts the stored secret: under the missing-key pass-through
//! it may be plaintext.

use std::fmt;

use crate::{
    error::VaultError,
    kek::KeyProvider,
    vault::{UnsealedSecret, unseal},
};

/// Credentials for one site integration.
#[derive(Clone, PartialEq, Eq)]
pub struct SiteCredentials {
    /// Public API key identifying the site.
    pub api_key: String,
    /// Application key paired with the secret.
    pub user_key: String,
    /// The application secret in its at-rest form (normally encrypted).
    pub secret: String,
    /// Data-center hint consumed by the external SDK glue.
    pub data_center: String,
}

impl SiteCredentials {
    /// Assemble credentials from explicit values.
    pub fn new(
        api_key: impl Into<String>,
        user_key: impl Into<String>,
        secret: impl Into<String>,
        data_center: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            user_key: user_key.into(),
            secret: secret.into(),
            data_center: data_center.into(),
        }
    }

    /// Merge explicitly supplied values over a fallback set.
    ///
    /// Mirrors the original constructor behavior: each missing or empty
    /// value falls back to the default configuration.
    ///
    /// # Errors
    ///
    /// [`VaultError::InvalidCredentials`] if a field is empty on both
    /// sides; half-configured credentials fail fast instead of producing
    /// unauthorized API calls later.
    pub fn with_fallback(
        api_key: Option<String>,
        user_key: Option<String>,
        secret: Option<String>,
        data_center: Option<String>,
        fallback: &Self,
    ) -> Result<Self, VaultError> {
        let merged = Self {
            api_key: pick(api_key, &fallback.api_key),
            user_key: pick(user_key, &fallback.user_key),
            secret: pick(secret, &fallback.secret),
            data_center: pick(data_center, &fallback.data_center),
        };
        merged.ensure_complete()?;
        Ok(merged)
    }

    /// Recover the application secret from its at-rest form.
    pub fn decrypt_secret(
        &self,
        provider: &impl KeyProvider,
    ) -> Result<UnsealedSecret, VaultError> {
        unseal(&self.secret, provider)
    }

    fn ensure_complete(&self) -> Result<(), VaultError> {
        for (name, value) in [
            ("api_key", &self.api_key),
            ("user_key", &self.user_key),
            ("secret", &self.secret),
            ("data_center", &self.data_center),
        ] {
            if value.is_empty() {
                return Err(VaultError::InvalidCredentials {
                    reason: format!("{name} is empty and no fallback was configured"),
                });
            }
        }
        Ok(())
    }
}

fn pick(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => fallback.to_string(),
    }
}

impl fmt::Debug for SiteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteCredentials")
            .field("api_key", &self.api_key)
            .field("user_key", &self.user_key)
            .field("secret", &"<redacted>")
            .field("data_center", &self.data_center)
            .finish()
    }
}
