use serde::Deserialize;

use fleetwatch_core::BusId;
use fleetwatch_incidents::{Bus, Incident, IncidentStatus, Severity};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBusRequest {
    pub fleet_number: String,
    pub registration: String,
    pub capacity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ReportIncidentRequest {
    pub bus_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Deserialize)]
pub struct ResolveIncidentRequest {
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IncidentListQuery {
    pub status: Option<IncidentStatus>,
    pub bus_id: Option<BusId>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn bus_to_json(bus: &Bus) -> serde_json::Value {
    serde_json::json!({
        "id": bus.id.to_string(),
        "fleet_number": bus.fleet_number,
        "registration": bus.registration,
        "capacity": bus.capacity,
        "active": bus.active,
    })
}

pub fn incident_to_json(incident: &Incident) -> serde_json::Value {
    serde_json::json!({
        "id": incident.id.to_string(),
        "bus_id": incident.bus_id.to_string(),
        "title": incident.title,
        "description": incident.description,
        "severity": incident.severity,
        "status": incident.status,
        "reported_by": incident.reported_by,
        "reported_at": incident.reported_at,
        "resolved_at": incident.resolved_at,
        "resolution_note": incident.resolution_note,
    })
}
