use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Duration;
use thiserror::Error;

/// HS256 requires a key of at least 256 bits (RFC 7518, section 3.2).
pub const MIN_SECRET_BYTES: usize = 32;

/// Configuration problems are the only fatal failures in this crate; every
/// runtime authentication failure degrades to a rejected outcome instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signing secret is not valid base64: {0}")]
    SecretNotBase64(String),
    #[error("signing secret decodes to {0} bytes, below the {MIN_SECRET_BYTES}-byte HS256 minimum")]
    SecretTooShort(usize),
    #[error("{0} must be positive, got {1}")]
    NonPositiveLifetime(&'static str, i64),
}

/// Shared symmetric signing secret, held decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Decode a base64-encoded secret, enforcing the MAC minimum key length.
    pub fn from_base64(encoded: &str) -> Result<Self, ConfigError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| ConfigError::SecretNotBase64(e.to_string()))?;
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort(bytes.len()));
        }
        Ok(Self(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// Attributes shared by the two session cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    pub access_name: String,
    pub refresh_name: String,
    /// Sets the `Secure` flag so cookies only travel over TLS. Off by default
    /// for plain-HTTP local development.
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_name: "access_token".to_string(),
            refresh_name: "refresh_token".to_string(),
            secure: false,
        }
    }
}

/// Complete configuration for the session lifecycle.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: SigningSecret,
    /// Access-token lifetime, on the order of minutes.
    pub access_ttl: Duration,
    /// Refresh-token lifetime, on the order of days.
    pub refresh_ttl: Duration,
    pub cookies: CookieConfig,
}

impl AuthConfig {
    pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
    pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

    /// Config with default lifetimes and cookie attributes.
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            access_ttl: Duration::seconds(Self::DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(Self::DEFAULT_REFRESH_TTL_SECS),
            cookies: CookieConfig::default(),
        }
    }

    pub fn with_lifetimes(
        mut self,
        access_secs: i64,
        refresh_secs: i64,
    ) -> Result<Self, ConfigError> {
        if access_secs <= 0 {
            return Err(ConfigError::NonPositiveLifetime(
                "access-token lifetime",
                access_secs,
            ));
        }
        if refresh_secs <= 0 {
            return Err(ConfigError::NonPositiveLifetime(
                "refresh-token lifetime",
                refresh_secs,
            ));
        }
        self.access_ttl = Duration::seconds(access_secs);
        self.refresh_ttl = Duration::seconds(refresh_secs);
        Ok(self)
    }

    pub fn with_cookies(mut self, cookies: CookieConfig) -> Self {
        self.cookies = cookies;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
