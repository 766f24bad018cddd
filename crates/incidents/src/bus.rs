use serde::{Deserialize, Serialize};

use fleetwatch_core::{BusId, DomainError, DomainResult};

/// A fleet vehicle.
///
/// `fleet_number` is the operator-facing natural key; uniqueness across the
/// fleet is enforced by the registry, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    pub id: BusId,
    pub fleet_number: String,
    pub registration: String,
    pub capacity: u32,
    pub active: bool,
}

impl Bus {
    /// Register a new bus. New buses are always active.
    pub fn register(
        fleet_number: impl Into<String>,
        registration: impl Into<String>,
        capacity: u32,
    ) -> DomainResult<Self> {
        let fleet_number = fleet_number.into().trim().to_string();
        let registration = registration.into().trim().to_string();

        if fleet_number.is_empty() {
            return Err(DomainError::validation("fleet number must not be empty"));
        }
        if registration.is_empty() {
            return Err(DomainError::validation("registration must not be empty"));
        }
        if capacity == 0 {
            return Err(DomainError::validation("capacity must be positive"));
        }

        Ok(Self {
            id: BusId::new(),
            fleet_number,
            registration,
            capacity,
            active: true,
        })
    }

    /// Take the bus out of service. Retiring an already-retired bus is an
    /// invariant violation.
    pub fn retire(&mut self) -> DomainResult<()> {
        if !self.active {
            return Err(DomainError::invariant(format!(
                "bus {} is already retired",
                self.fleet_number
            )));
        }
        self.active = false;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
