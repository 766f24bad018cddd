use axum::{Router, routing::get};

pub mod buses;
pub mod incidents;
pub mod session;
pub mod system;

/// Router for the public session endpoints (no bound context required).
pub fn session_router() -> Router {
    session::router()
}

/// Router for everything behind `require_auth`.
pub fn protected_router() -> Router {
    Router::new()
        .route("/session-info", get(session::session_info))
        .nest("/buses", buses::router())
        .nest("/incidents", incidents::router())
}
