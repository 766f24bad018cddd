//! Startup configuration, read from the environment.
//!
//! A secret that fails base64 decoding or the HS256 minimum length aborts
//! startup; every other authentication failure after that point degrades to a
//! rejected outcome instead.

use anyhow::Context;

use fleetwatch_auth::{AuthConfig, CookieConfig, SigningSecret};

/// base64 of a fixed 32-byte dev secret. Anyone can mint tokens for a
/// deployment left on this value.
const DEV_SECRET: &str = "ZmxlZXR3YXRjaC1kZXYtc2lnbmluZy1zZWNyZXQtMzI=";
const DEV_ADMIN_PASSWORD: &str = "admin123";

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub auth: AuthConfig,
    pub admin_password: String,
}

impl ApiConfig {
    /// Read configuration from `FLEETWATCH_*` environment variables, warning
    /// loudly wherever an insecure dev default fills a gap.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = match std::env::var("FLEETWATCH_SIGNING_SECRET") {
            Ok(encoded) => SigningSecret::from_base64(&encoded)
                .context("FLEETWATCH_SIGNING_SECRET is unusable")?,
            Err(_) => {
                tracing::warn!("FLEETWATCH_SIGNING_SECRET not set; using insecure dev default");
                SigningSecret::from_base64(DEV_SECRET).expect("dev secret is well-formed")
            }
        };

        let access_secs = env_i64("FLEETWATCH_ACCESS_TTL_SECS")?
            .unwrap_or(AuthConfig::DEFAULT_ACCESS_TTL_SECS);
        let refresh_secs = env_i64("FLEETWATCH_REFRESH_TTL_SECS")?
            .unwrap_or(AuthConfig::DEFAULT_REFRESH_TTL_SECS);

        let defaults = CookieConfig::default();
        let cookies = CookieConfig {
            access_name: std::env::var("FLEETWATCH_ACCESS_COOKIE")
                .unwrap_or(defaults.access_name),
            refresh_name: std::env::var("FLEETWATCH_REFRESH_COOKIE")
                .unwrap_or(defaults.refresh_name),
            secure: env_flag("FLEETWATCH_SECURE_COOKIES"),
        };

        let auth = AuthConfig::new(secret)
            .with_lifetimes(access_secs, refresh_secs)
            .context("token lifetimes are unusable")?
            .with_cookies(cookies);

        let admin_password = std::env::var("FLEETWATCH_ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("FLEETWATCH_ADMIN_PASSWORD not set; using insecure dev default");
            DEV_ADMIN_PASSWORD.to_string()
        });

        Ok(Self {
            auth,
            admin_password,
        })
    }
}

fn env_i64(name: &'static str) -> anyhow::Result<Option<i64>> {
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("{name} must be an integer, got {raw:?}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

fn env_flag(name: &'static str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}
