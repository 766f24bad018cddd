use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use fleetwatch_auth::Permission;
use fleetwatch_core::BusId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_bus).get(list_buses))
        .route("/:id", get(get_bus))
        .route("/:id/retire", post(retire_bus))
}

pub async fn register_bus(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::RegisterBusRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("buses.register")) {
        return resp;
    }

    match services.register_bus(&body.fleet_number, &body.registration, body.capacity) {
        Ok(bus) => (StatusCode::CREATED, Json(dto::bus_to_json(&bus))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_buses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("buses.read")) {
        return resp;
    }

    let items = services
        .list_buses()
        .iter()
        .map(dto::bus_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_bus(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("buses.read")) {
        return resp;
    }

    let id: BusId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.get_bus(id) {
        Some(bus) => (StatusCode::OK, Json(dto::bus_to_json(&bus))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "bus not found"),
    }
}

pub async fn retire_bus(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("buses.retire")) {
        return resp;
    }

    let id: BusId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.retire_bus(id) {
        Ok(bus) => (StatusCode::OK, Json(dto::bus_to_json(&bus))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
