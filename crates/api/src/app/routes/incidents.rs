use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use fleetwatch_auth::Permission;
use fleetwatch_core::IncidentId;
use fleetwatch_infra::IncidentFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(report_incident).get(list_incidents))
        .route("/:id", get(get_incident).delete(delete_incident))
        .route("/:id/resolve", post(resolve_incident))
}

pub async fn report_incident(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ReportIncidentRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("incidents.report")) {
        return resp;
    }

    let bus_id = match body.bus_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.report_incident(
        bus_id,
        &body.title,
        &body.description,
        body.severity,
        ctx.username(),
    ) {
        Ok(incident) => {
            (StatusCode::CREATED, Json(dto::incident_to_json(&incident))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_incidents(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<dto::IncidentListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("incidents.read")) {
        return resp;
    }

    let items = services
        .list_incidents(IncidentFilter {
            status: query.status,
            bus_id: query.bus_id,
        })
        .iter()
        .map(dto::incident_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_incident(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("incidents.read")) {
        return resp;
    }

    let id: IncidentId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.get_incident(id) {
        Some(incident) => (StatusCode::OK, Json(dto::incident_to_json(&incident))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "incident not found"),
    }
}

pub async fn resolve_incident(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ResolveIncidentRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("incidents.resolve")) {
        return resp;
    }

    let id: IncidentId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.resolve_incident(id, body.note) {
        Ok(incident) => (StatusCode::OK, Json(dto::incident_to_json(&incident))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_incident(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_permission(&ctx, &Permission::new("incidents.delete")) {
        return resp;
    }

    let id: IncidentId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.delete_incident(id) {
        Ok(incident) => (StatusCode::OK, Json(dto::incident_to_json(&incident))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
