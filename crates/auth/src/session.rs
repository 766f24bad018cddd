//! Session lifecycle: issuance, silent renewal, termination.
//!
//! The services here are pure over their inputs plus the shared signing
//! secret; nothing holds mutable state. Authentication failures never cross
//! the boundary as errors. Callers get outcome enums that collapse the cause,
//! and the cause itself goes to the debug log.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::AuthConfig;
use crate::cookies::SetCookie;
use crate::directory::UserDirectory;
use crate::roles::Role;
use crate::token::{ROLE_CLAIM, TokenCodec, TokenError};

// ─────────────────────────────────────────────────────────────────────────────
// Inputs and Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Credentials presented to `login`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Tokens the client already holds when it calls `login`.
///
/// Diagnostic input only: stale or invalid values are logged at debug, never
/// trusted, and never short-circuit a fresh login.
#[derive(Debug, Clone, Default)]
pub struct PresentedTokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Result of a login attempt.
///
/// `Rejected` covers unknown user and wrong password alike; the two are
/// indistinguishable from outside so usernames cannot be probed.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Issued(IssuedSession),
    Rejected,
}

/// A freshly issued session: both directives must reach the client.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub role: Role,
    pub access: SetCookie,
    pub refresh: SetCookie,
}

/// Result of a renewal attempt.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Renewed { role: Role, access: SetCookie },
    Rejected,
}

/// Cookie-clearing directives emitted on logout.
#[derive(Debug, Clone)]
pub struct ClearedSession {
    pub access: SetCookie,
    pub refresh: SetCookie,
}

// ─────────────────────────────────────────────────────────────────────────────
// Issuer
// ─────────────────────────────────────────────────────────────────────────────

/// Verifies credentials and mints the access/refresh cookie pair.
pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl SessionIssuer {
    pub fn new(codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self { codec, config }
    }

    /// Attempt a login at `now`.
    ///
    /// A fresh login always re-verifies the password, regardless of any
    /// session the client still holds.
    pub fn login<D>(
        &self,
        directory: &D,
        credentials: &Credentials,
        presented: &PresentedTokens,
        now: DateTime<Utc>,
    ) -> LoginOutcome
    where
        D: UserDirectory + ?Sized,
    {
        self.log_presented(presented, now);

        let Some(account) = directory.resolve(&credentials.username) else {
            tracing::debug!(username = %credentials.username, "login rejected: unknown user");
            return LoginOutcome::Rejected;
        };
        if !account.password_hash.verify(&credentials.password) {
            tracing::debug!(username = %credentials.username, "login rejected: password mismatch");
            return LoginOutcome::Rejected;
        }

        let access = match mint_access(&self.codec, &self.config, &account.username, account.role, now)
        {
            Ok(cookie) => cookie,
            Err(e) => return reject_on_mint_failure(e),
        };

        // Refresh tokens carry nothing beyond the subject; role and
        // permissions are re-resolved from the directory on every renewal.
        let refresh_token = match self.codec.encode(
            &account.username,
            &BTreeMap::new(),
            now,
            now + self.config.refresh_ttl,
        ) {
            Ok(token) => token,
            Err(e) => return reject_on_mint_failure(e),
        };
        let refresh = SetCookie::session(
            &self.config.cookies.refresh_name,
            refresh_token,
            self.config.refresh_ttl.num_seconds(),
            self.config.cookies.secure,
        );

        tracing::info!(
            username = %account.username,
            role = account.role.authority(),
            "session issued"
        );
        LoginOutcome::Issued(IssuedSession {
            role: account.role,
            access,
            refresh,
        })
    }

    fn log_presented(&self, presented: &PresentedTokens, now: DateTime<Utc>) {
        if let Some(access) = presented.access.as_deref() {
            let valid = self.codec.is_valid(access, now);
            tracing::debug!(valid, "login request carried an access cookie");
        }
        if let Some(refresh) = presented.refresh.as_deref() {
            let valid = self.codec.is_valid(refresh, now);
            tracing::debug!(valid, "login request carried a refresh cookie");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renewer
// ─────────────────────────────────────────────────────────────────────────────

/// Mints a fresh access token from a still-valid refresh token, without
/// touching the password. The refresh token itself is never rotated here.
pub struct SessionRenewer {
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl SessionRenewer {
    pub fn new(codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self { codec, config }
    }

    pub fn refresh<D>(
        &self,
        directory: &D,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> RefreshOutcome
    where
        D: UserDirectory + ?Sized,
    {
        let decoded = match self.codec.decode(refresh_token, now) {
            Ok(decoded) => decoded,
            Err(kind) => {
                tracing::debug!(%kind, "refresh rejected");
                return RefreshOutcome::Rejected;
            }
        };

        // The subject may have been deleted or renamed since the refresh
        // token was minted; the directory is the source of truth.
        let Some(account) = directory.resolve(decoded.subject()) else {
            tracing::debug!(subject = decoded.subject(), "refresh rejected: principal not found");
            return RefreshOutcome::Rejected;
        };

        let access = match mint_access(&self.codec, &self.config, &account.username, account.role, now)
        {
            Ok(cookie) => cookie,
            Err(e) => {
                tracing::error!(error = %e, "access token could not be minted");
                return RefreshOutcome::Rejected;
            }
        };

        tracing::info!(username = %account.username, "access token renewed");
        RefreshOutcome::Renewed {
            role: account.role,
            access,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminator
// ─────────────────────────────────────────────────────────────────────────────

/// Clears both session cookies. Stateless and idempotent: with no server-side
/// session registry, logout is purely an instruction to the browser.
pub struct SessionTerminator {
    config: Arc<AuthConfig>,
}

impl SessionTerminator {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub fn logout(&self) -> ClearedSession {
        let cookies = &self.config.cookies;
        ClearedSession {
            access: SetCookie::clearing(&cookies.access_name, cookies.secure),
            refresh: SetCookie::clearing(&cookies.refresh_name, cookies.secure),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared Minting
// ─────────────────────────────────────────────────────────────────────────────

fn mint_access(
    codec: &TokenCodec,
    config: &AuthConfig,
    username: &str,
    role: Role,
    now: DateTime<Utc>,
) -> Result<SetCookie, TokenError> {
    let mut claims = BTreeMap::new();
    claims.insert(
        ROLE_CLAIM.to_string(),
        serde_json::Value::String(role.authority().to_string()),
    );
    let token = codec.encode(username, &claims, now, now + config.access_ttl)?;
    Ok(SetCookie::session(
        &config.cookies.access_name,
        token,
        config.access_ttl.num_seconds(),
        config.cookies.secure,
    ))
}

fn reject_on_mint_failure(e: TokenError) -> LoginOutcome {
    // Unreachable with a resolved account (the subject is non-empty), but a
    // mint failure must still collapse to a rejection.
    tracing::error!(error = %e, "access token could not be minted");
    LoginOutcome::Rejected
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
