//! API-side authorization guard.
//!
//! Enforced per handler, after `require_auth` has guaranteed a bound context.
//! Keeps the domain crates auth-agnostic: routes name the permission they
//! need and nothing below the HTTP layer sees roles at all.

use axum::http::StatusCode;
use axum::response::Response;

use fleetwatch_auth::Permission;

use crate::app::errors;
use crate::context::AuthContext;

/// Check that the request's context grants `permission`, or produce the 403
/// response to return as-is.
pub fn require_permission(ctx: &AuthContext, permission: &Permission) -> Result<(), Response> {
    if ctx.allows(permission) {
        return Ok(());
    }
    tracing::debug!(
        username = ctx.username(),
        role = ctx.role().authority(),
        %permission,
        "permission denied"
    );
    Err(errors::json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        format!("missing permission {permission}"),
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
