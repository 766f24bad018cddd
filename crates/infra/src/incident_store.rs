use std::collections::HashMap;
use std::sync::RwLock;

use fleetwatch_core::{BusId, DomainError, DomainResult, IncidentId};
use fleetwatch_incidents::{Incident, IncidentStatus};

/// Optional filters for incident listings. Both filters are conjunctive.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub bus_id: Option<BusId>,
}

/// In-memory incident store.
#[derive(Debug, Default)]
pub struct InMemoryIncidentStore {
    inner: RwLock<HashMap<IncidentId, Incident>>,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, incident: Incident) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("incident store lock poisoned"))?;
        map.insert(incident.id, incident);
        Ok(())
    }

    pub fn get(&self, id: IncidentId) -> Option<Incident> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    /// Matching incidents, newest report first.
    pub fn list(&self, filter: IncidentFilter) -> Vec<Incident> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut incidents: Vec<Incident> = map
            .values()
            .filter(|i| filter.status.is_none_or(|s| i.status == s))
            .filter(|i| filter.bus_id.is_none_or(|b| i.bus_id == b))
            .cloned()
            .collect();
        incidents.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        incidents
    }

    /// Store an updated copy of an already-recorded incident.
    pub fn save(&self, incident: Incident) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("incident store lock poisoned"))?;
        if !map.contains_key(&incident.id) {
            return Err(DomainError::not_found());
        }
        map.insert(incident.id, incident);
        Ok(())
    }

    pub fn remove(&self, id: IncidentId) -> DomainResult<Incident> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("incident store lock poisoned"))?;
        map.remove(&id).ok_or(DomainError::NotFound)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
