use std::collections::HashMap;
use std::sync::RwLock;

use fleetwatch_core::{BusId, DomainError, DomainResult};
use fleetwatch_incidents::Bus;

/// In-memory bus registry.
///
/// Enforces the fleet-number uniqueness the domain record cannot see on its
/// own. Reads clone out so no lock is held across caller code.
#[derive(Debug, Default)]
pub struct InMemoryBusRegistry {
    inner: RwLock<HashMap<BusId, Bus>>,
}

impl InMemoryBusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bus, rejecting a duplicate fleet number.
    pub fn register(&self, bus: Bus) -> DomainResult<Bus> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("bus registry lock poisoned"))?;
        if map.values().any(|b| b.fleet_number == bus.fleet_number) {
            return Err(DomainError::conflict(format!(
                "fleet number {} is already registered",
                bus.fleet_number
            )));
        }
        map.insert(bus.id, bus.clone());
        Ok(bus)
    }

    pub fn get(&self, id: BusId) -> Option<Bus> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    /// All buses, ordered by fleet number for stable listings.
    pub fn list(&self) -> Vec<Bus> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut buses: Vec<Bus> = map.values().cloned().collect();
        buses.sort_by(|a, b| a.fleet_number.cmp(&b.fleet_number));
        buses
    }

    /// Store an updated copy of an already-registered bus.
    pub fn save(&self, bus: Bus) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("bus registry lock poisoned"))?;
        if !map.contains_key(&bus.id) {
            return Err(DomainError::not_found());
        }
        map.insert(bus.id, bus);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
