//! API credentials.

use std::fmt;

use crate::error::{TcloudError, TcloudResult};

/// A secret id / secret key pair, with an optional session token for
/// temporary credentials.
///
/// Credentials are immutable once built and can be shared across concurrent
/// calls. `Debug` never prints the secret key or token.
///
/// # Examples
///
/// ```
/// use tcloud_core::Credential;
///
/// let credential = Credential::new("AKIDEXAMPLE", "secret").with_token("session");
/// assert_eq!(credential.secret_id(), "AKIDEXAMPLE");
/// assert_eq!(credential.token(), Some("session"));
/// assert!(format!("{credential:?}").contains("<redacted>"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret_id: String,
    secret_key: String,
    token: Option<String>,
}

impl Credential {
    /// Create a credential from a secret id and secret key.
    #[must_use]
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Load a credential from environment variables.
    ///
    /// | Variable | Required |
    /// |----------|----------|
    /// | `TENCENTCLOUD_SECRET_ID` | yes |
    /// | `TENCENTCLOUD_SECRET_KEY` | yes |
    /// | `TENCENTCLOUD_SESSION_TOKEN` | no |
    ///
    /// # Errors
    ///
    /// Returns [`TcloudError::MissingCredential`] if a required variable is
    /// unset or empty.
    pub fn from_env() -> TcloudResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load a credential through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`TcloudError::MissingCredential`] if a required variable is
    /// unset or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TcloudResult<Self> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(TcloudError::MissingCredential(name))
        };

        let mut credential = Self::new(
            required("TENCENTCLOUD_SECRET_ID")?,
            required("TENCENTCLOUD_SECRET_KEY")?,
        );
        credential.token = lookup("TENCENTCLOUD_SESSION_TOKEN").filter(|v| !v.is_empty());
        Ok(credential)
    }

    /// The secret id.
    #[must_use]
    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    /// The secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// The session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_load_credential_from_lookup() {
        let credential = Credential::from_lookup(|name| match name {
            "TENCENTCLOUD_SECRET_ID" => Some("AKIDEXAMPLE".to_owned()),
            "TENCENTCLOUD_SECRET_KEY" => Some("secret".to_owned()),
            "TENCENTCLOUD_SESSION_TOKEN" => Some("token".to_owned()),
            _ => None,
        })
        .unwrap();

        assert_eq!(credential, Credential::new("AKIDEXAMPLE", "secret").with_token("token"));
    }

    #[test]
    fn test_should_treat_empty_token_as_absent() {
        let credential = Credential::from_lookup(|name| match name {
            "TENCENTCLOUD_SECRET_ID" => Some("AKIDEXAMPLE".to_owned()),
            "TENCENTCLOUD_SECRET_KEY" => Some("secret".to_owned()),
            "TENCENTCLOUD_SESSION_TOKEN" => Some(String::new()),
            _ => None,
        })
        .unwrap();
        assert!(credential.token().is_none());
    }

    #[test]
    fn test_should_report_missing_secret_key() {
        let result = Credential::from_lookup(|name| match name {
            "TENCENTCLOUD_SECRET_ID" => Some("AKIDEXAMPLE".to_owned()),
            "TENCENTCLOUD_SECRET_KEY" => Some(String::new()),
            _ => None,
        });
        assert!(matches!(
            result,
            Err(TcloudError::MissingCredential("TENCENTCLOUD_SECRET_KEY"))
        ));
    }

    #[test]
    fn test_should_redact_secrets_in_debug() {
        let credential = Credential::new("AKIDEXAMPLE", "super-secret").with_token("tok-123");
        let debug = format!("{credential:?}");
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("tok-123"));
    }
}
