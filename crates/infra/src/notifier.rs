use std::sync::Arc;

use fleetwatch_incidents::Incident;

/// Delivery seam for incident notifications.
///
/// Invoked after a report is stored; implementations must not block the
/// request path on remote delivery.
pub trait IncidentNotifier: Send + Sync {
    fn incident_reported(&self, incident: &Incident);
}

impl<N> IncidentNotifier for Arc<N>
where
    N: IncidentNotifier + ?Sized,
{
    fn incident_reported(&self, incident: &Incident) {
        (**self).incident_reported(incident)
    }
}

/// Notifier that writes to the structured log. The shipped default; chat or
/// pager delivery plugs in behind the same trait.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl IncidentNotifier for LogNotifier {
    fn incident_reported(&self, incident: &Incident) {
        tracing::info!(
            incident_id = %incident.id,
            bus_id = %incident.bus_id,
            severity = ?incident.severity,
            title = %incident.title,
            "incident reported"
        );
    }
}
