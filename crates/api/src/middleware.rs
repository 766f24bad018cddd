//! Per-request trust establishment.
//!
//! `authenticate` runs ahead of every route and fails open: whatever goes
//! wrong with the access cookie, the request continues anonymously and the
//! visible rejection is left to `require_auth` or the permission guard.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use cookie::Cookie;

use fleetwatch_auth::{TokenCodec, UserDirectory};

use crate::app::errors;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub directory: Arc<dyn UserDirectory>,
    pub access_cookie: String,
}

/// Request authenticator. Binds at most one [`AuthContext`] per request and
/// never rejects; public routes stay reachable with any cookie state.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // A context bound earlier in the chain is never rebound.
    if req.extensions().get::<AuthContext>().is_none() {
        if let Some(token) = cookie_value(req.headers(), &state.access_cookie) {
            match state.codec.decode(&token, Utc::now()) {
                Ok(decoded) => match state.directory.resolve(decoded.subject()) {
                    Some(account) => {
                        req.extensions_mut().insert(AuthContext::from_account(&account));
                    }
                    None => {
                        // Stale token for a deleted or renamed account.
                        tracing::debug!(
                            subject = decoded.subject(),
                            "access token subject unknown; continuing anonymously"
                        );
                    }
                },
                Err(kind) => {
                    tracing::debug!(%kind, "access token rejected; continuing anonymously");
                }
            }
        }
    }
    next.run(req).await
}

/// Guard for the protected subtree: 401 unless `authenticate` bound a context.
pub async fn require_auth(req: Request<Body>, next: Next) -> Response {
    if req.extensions().get::<AuthContext>().is_none() {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        );
    }
    next.run(req).await
}

/// Value of the cookie named `name`, across however many `Cookie` headers the
/// client sent.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| Cookie::split_parse(h.to_string()))
        .filter_map(|c| c.ok())
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
