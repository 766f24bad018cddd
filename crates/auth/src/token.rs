use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SigningSecret;

/// Claim name carrying the authority string on access tokens.
pub const ROLE_CLAIM: &str = "role";

/// Envelope fields that caller-supplied claims may not shadow.
const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not parseable as a token at all.
    #[error("token is malformed")]
    Malformed,
    /// Parses, but the signature does not match the payload.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signature checks out but the expiry has passed.
    #[error("token is expired")]
    Expired,
    /// Tokens are minted for a concrete principal; an empty subject is a bug
    /// in the caller.
    #[error("token subject must be non-empty")]
    EmptySubject,
    /// The JWT library refused to sign the payload.
    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// Wire-format claims. `sub`/`iat`/`exp` are fixed; everything else rides in
/// `extra`. The `BTreeMap` keeps claim order canonical, so equal inputs
/// serialize to byte-identical envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

/// A decoded, signature-checked token.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    subject: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    claims: BTreeMap<String, serde_json::Value>,
}

impl DecodedToken {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.claims.get(name)
    }

    pub fn claims(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.claims
    }
}

/// Encodes and verifies the signed token envelope (HS256).
///
/// Stateless apart from derived key material, so one instance is shared
/// across the whole request path. Expiry is checked against a caller-supplied
/// clock rather than the wall clock, which keeps the codec deterministic
/// under test.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The library clock stays out of the picture; see `decode`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Mint a signed envelope over subject, custom claims and the two
    /// timestamps. Claims colliding with envelope fields are dropped.
    pub fn encode(
        &self,
        subject: &str,
        claims: &BTreeMap<String, serde_json::Value>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }
        let extra = claims
            .iter()
            .filter(|(k, _)| !RESERVED_CLAIMS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let wire = WireClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            extra,
        };
        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decode a token, verify its signature and check expiry against `now`.
    ///
    /// A token is valid strictly before its expiry; at `now == expires_at` it
    /// is already expired.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<DecodedToken, TokenError> {
        let data =
            decode::<WireClaims>(token, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                }
            })?;
        let wire = data.claims;
        let issued_at = DateTime::from_timestamp(wire.iat, 0).ok_or(TokenError::Malformed)?;
        let expires_at = DateTime::from_timestamp(wire.exp, 0).ok_or(TokenError::Malformed)?;
        if now >= expires_at {
            return Err(TokenError::Expired);
        }
        Ok(DecodedToken {
            subject: wire.sub,
            issued_at,
            expires_at,
            claims: wire.extra,
        })
    }

    /// `true` iff the token decodes cleanly and has not expired at `now`.
    ///
    /// Collapses every failure to `false`; the failure kind is logged at
    /// debug so operators can tell tampering from ordinary expiry.
    pub fn is_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.decode(token, now) {
            Ok(_) => true,
            Err(kind) => {
                tracing::debug!(%kind, "token rejected");
                false
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
