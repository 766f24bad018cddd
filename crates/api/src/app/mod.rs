//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: session lifecycle + fleet store wiring behind one struct
//! - `routes/`: HTTP routes and handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use fleetwatch_auth::{TokenCodec, UserDirectory};
use fleetwatch_infra::{
    InMemoryBusRegistry, InMemoryIncidentStore, InMemoryUserDirectory, LogNotifier,
};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: ApiConfig) -> anyhow::Result<Router> {
    let codec = Arc::new(TokenCodec::new(&config.auth.secret));
    let auth_config = Arc::new(config.auth);
    let directory = Arc::new(InMemoryUserDirectory::seeded(&config.admin_password)?);

    let auth_state = middleware::AuthState {
        codec: codec.clone(),
        directory: directory.clone() as Arc<dyn UserDirectory>,
        access_cookie: auth_config.cookies.access_name.clone(),
    };

    let services = Arc::new(services::AppServices::new(
        codec,
        auth_config,
        directory,
        Arc::new(InMemoryBusRegistry::new()),
        Arc::new(InMemoryIncidentStore::new()),
        Arc::new(LogNotifier),
    ));

    // Protected routes: require a bound AuthContext.
    let protected = routes::protected_router()
        .layer(axum::middleware::from_fn(middleware::require_auth));

    // `authenticate` is outermost so every route, public or protected, sees
    // the same fail-open trust establishment.
    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::session_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        )))
}
