//! Session endpoints: login, silent renewal, logout, introspection.
//!
//! The handlers only translate between HTTP and the outcome enums; every
//! authentication decision lives in `fleetwatch-auth`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
    routing::post,
};

use fleetwatch_auth::{Credentials, LoginOutcome, PresentedTokens, RefreshOutcome};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;
use crate::middleware::cookie_value;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

/// Uniform body for every session outcome; rejected attempts all look alike.
fn session_body(logged_in: bool, role: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "loggedIn": logged_in, "role": role }))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    // Cookies the client still holds are diagnostic input only.
    let presented = PresentedTokens {
        access: cookie_value(&headers, services.access_cookie_name()),
        refresh: cookie_value(&headers, services.refresh_cookie_name()),
    };
    let credentials = Credentials {
        username: body.username,
        password: body.password,
    };

    match services.login(&credentials, &presented) {
        LoginOutcome::Issued(session) => (
            StatusCode::OK,
            AppendHeaders([
                (SET_COOKIE, session.access.header_value().to_string()),
                (SET_COOKIE, session.refresh.header_value().to_string()),
            ]),
            session_body(true, session.role.authority()),
        )
            .into_response(),
        LoginOutcome::Rejected => {
            (StatusCode::UNAUTHORIZED, session_body(false, "")).into_response()
        }
    }
}

pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let Some(token) = cookie_value(&headers, services.refresh_cookie_name()) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_refresh_cookie",
            "refresh cookie is required",
        );
    };

    match services.refresh(&token) {
        RefreshOutcome::Renewed { role, access } => (
            StatusCode::OK,
            AppendHeaders([(SET_COOKIE, access.header_value().to_string())]),
            session_body(true, role.authority()),
        )
            .into_response(),
        RefreshOutcome::Rejected => {
            (StatusCode::UNAUTHORIZED, session_body(false, "")).into_response()
        }
    }
}

/// Idempotent: a logout with no active session still clears both cookies.
/// Any `AuthContext` bound to this request dies with the request.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let cleared = services.logout();
    (
        StatusCode::OK,
        AppendHeaders([
            (SET_COOKIE, cleared.access.header_value().to_string()),
            (SET_COOKIE, cleared.refresh.header_value().to_string()),
        ]),
        session_body(false, ""),
    )
        .into_response()
}

pub async fn session_info(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "username": ctx.username(),
        "role": ctx.role().authority(),
        "permissions": ctx.permissions().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
    }))
}
