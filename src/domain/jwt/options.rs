//! JWT options bound from the `jwt` configuration section

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or binding [`JwtOptions`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptionsError {
    #[error("Token lifetime must be between {min} and {max} minutes, got {value}")]
    TtlOutOfRange { value: u32, min: u32, max: u32 },

    #[error("JWT signing secret cannot be empty")]
    MissingSecret,
}

/// Token lifetime in minutes, always within `[MIN_MINUTES, MAX_MINUTES]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TokenLifetime(u32);

impl TokenLifetime {
    pub const MIN_MINUTES: u32 = 1;
    pub const MAX_MINUTES: u32 = 24 * 60;
    pub const DEFAULT_MINUTES: u32 = 60;

    /// Create a lifetime, rejecting values outside the allowed range
    pub fn new(minutes: u32) -> Result<Self, OptionsError> {
        if !(Self::MIN_MINUTES..=Self::MAX_MINUTES).contains(&minutes) {
            return Err(OptionsError::TtlOutOfRange {
                value: minutes,
                min: Self::MIN_MINUTES,
                max: Self::MAX_MINUTES,
            });
        }

        Ok(Self(minutes))
    }

    pub fn as_minutes(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for TokenLifetime {
    fn default() -> Self {
        Self(Self::DEFAULT_MINUTES)
    }
}

impl TryFrom<u32> for TokenLifetime {
    type Error = OptionsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TokenLifetime> for u32 {
    fn from(lifetime: TokenLifetime) -> Self {
        lifetime.0
    }
}

/// Symmetric signing secret - never printed
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, OptionsError> {
        let secret = secret.into();

        if secret.is_empty() {
            return Err(OptionsError::MissingSecret);
        }

        Ok(Self(secret))
    }

    /// Key material used for HMAC signing
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for JwtSecret {
    type Error = OptionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret([hidden])")
    }
}

/// Configuration shared by token issuance and validation
#[derive(Debug, Clone, Deserialize)]
pub struct JwtOptions {
    /// Signing secret (required)
    pub secret: JwtSecret,

    #[serde(default)]
    pub issuer: Option<String>,

    #[serde(default)]
    pub validate_issuer: bool,

    #[serde(default)]
    pub audience: Option<String>,

    #[serde(default)]
    pub validate_audience: bool,

    #[serde(default)]
    pub access_token_ttl: TokenLifetime,

    #[serde(default)]
    pub validate_lifetime: bool,

    /// Informational, no refresh tokens are issued
    #[serde(default)]
    pub refresh_token_ttl: TokenLifetime,

    /// Informational for the issuing side
    #[serde(default)]
    pub require_https_metadata: bool,

    /// Informational, the HMAC signature is verified regardless
    #[serde(default = "default_true")]
    pub validate_issuer_signing_key: bool,

    /// Maximum clock difference tolerated on `exp`/`nbf`, in seconds
    #[serde(default)]
    pub max_clock_skew: u64,

    /// Informational for the issuing side
    #[serde(default = "default_true")]
    pub save_tokens: bool,
}

const MAX_CLOCK_SKEW_SECONDS: u64 = i32::MAX as u64;

fn default_true() -> bool {
    true
}

impl JwtOptions {
    /// Create options with defaults for everything but the secret
    pub fn new(secret: impl Into<String>) -> Result<Self, OptionsError> {
        Ok(Self {
            secret: JwtSecret::new(secret)?,
            issuer: None,
            validate_issuer: false,
            audience: None,
            validate_audience: false,
            access_token_ttl: TokenLifetime::default(),
            validate_lifetime: false,
            refresh_token_ttl: TokenLifetime::default(),
            require_https_metadata: false,
            validate_issuer_signing_key: true,
            max_clock_skew: 0,
            save_tokens: true,
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_access_token_ttl(mut self, minutes: u32) -> Result<Self, OptionsError> {
        self.access_token_ttl = TokenLifetime::new(minutes)?;
        Ok(self)
    }

    pub fn with_refresh_token_ttl(mut self, minutes: u32) -> Result<Self, OptionsError> {
        self.refresh_token_ttl = TokenLifetime::new(minutes)?;
        Ok(self)
    }

    pub fn with_validate_issuer(mut self, enabled: bool) -> Self {
        self.validate_issuer = enabled;
        self
    }

    pub fn with_validate_audience(mut self, enabled: bool) -> Self {
        self.validate_audience = enabled;
        self
    }

    pub fn with_validate_lifetime(mut self, enabled: bool) -> Self {
        self.validate_lifetime = enabled;
        self
    }

    pub fn with_validate_signing_key(mut self, enabled: bool) -> Self {
        self.validate_issuer_signing_key = enabled;
        self
    }

    pub fn with_max_clock_skew(mut self, seconds: u64) -> Self {
        self.max_clock_skew = seconds;
        self
    }

    /// Issuer to embed, ignoring empty strings
    pub fn effective_issuer(&self) -> Option<&str> {
        self.issuer.as_deref().filter(|value| !value.is_empty())
    }

    /// Audience to embed, ignoring empty strings
    pub fn effective_audience(&self) -> Option<&str> {
        self.audience.as_deref().filter(|value| !value.is_empty())
    }

    /// Clock skew as a duration, capped at `MAX_CLOCK_SKEW_SECONDS`
    pub fn clock_skew(&self) -> Duration {
        Duration::seconds(self.max_clock_skew.min(MAX_CLOCK_SKEW_SECONDS) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_boundaries() {
        assert!(TokenLifetime::new(1).is_ok());
        assert!(TokenLifetime::new(1440).is_ok());

        assert_eq!(
            TokenLifetime::new(0),
            Err(OptionsError::TtlOutOfRange {
                value: 0,
                min: 1,
                max: 1440
            })
        );
        assert!(TokenLifetime::new(1441).is_err());
    }

    #[test]
    fn test_access_ttl_rejected_on_assignment() {
        let options = JwtOptions::new("secret").unwrap();
        assert!(options.clone().with_access_token_ttl(0).is_err());
        assert!(options.clone().with_access_token_ttl(1441).is_err());
        assert_eq!(
            options
                .with_access_token_ttl(1440)
                .unwrap()
                .access_token_ttl
                .as_minutes(),
            1440
        );
    }

    #[test]
    fn test_refresh_ttl_rejected_on_assignment() {
        let options = JwtOptions::new("secret").unwrap();
        assert!(options.clone().with_refresh_token_ttl(0).is_err());
        assert!(options.with_refresh_token_ttl(1).is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert_eq!(JwtOptions::new("").unwrap_err(), OptionsError::MissingSecret);
    }

    #[test]
    fn test_defaults() {
        let options = JwtOptions::new("secret").unwrap();
        assert_eq!(options.access_token_ttl.as_minutes(), 60);
        assert_eq!(options.refresh_token_ttl.as_minutes(), 60);
        assert!(options.validate_issuer_signing_key);
        assert!(options.save_tokens);
        assert!(!options.validate_lifetime);
        assert_eq!(options.max_clock_skew, 0);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_ttl() {
        let json = serde_json::json!({ "secret": "s", "access_token_ttl": 0 });
        assert!(serde_json::from_value::<JwtOptions>(json).is_err());

        let json = serde_json::json!({ "secret": "s", "access_token_ttl": 1441 });
        assert!(serde_json::from_value::<JwtOptions>(json).is_err());

        let json = serde_json::json!({ "secret": "s", "access_token_ttl": 1 });
        let options: JwtOptions = serde_json::from_value(json).unwrap();
        assert_eq!(options.access_token_ttl.as_minutes(), 1);
    }

    #[test]
    fn test_deserialize_requires_secret() {
        let json = serde_json::json!({ "issuer": "acme" });
        assert!(serde_json::from_value::<JwtOptions>(json).is_err());

        let json = serde_json::json!({ "secret": "" });
        assert!(serde_json::from_value::<JwtOptions>(json).is_err());
    }

    #[test]
    fn test_empty_issuer_is_not_effective() {
        let options = JwtOptions::new("secret").unwrap().with_issuer("");
        assert_eq!(options.effective_issuer(), None);

        let options = options.with_issuer("acme");
        assert_eq!(options.effective_issuer(), Some("acme"));
    }

    #[test]
    fn test_secret_debug_is_hidden() {
        let options = JwtOptions::new("top-secret").unwrap();
        assert!(!format!("{:?}", options).contains("top-secret"));
    }
}
