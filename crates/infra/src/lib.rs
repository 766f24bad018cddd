//! `fleetwatch-infra` — in-memory infrastructure for dev and tests.
//!
//! Everything here implements storage seams defined elsewhere: the user
//! directory from `fleetwatch-auth` and the fleet stores the API wires up.
//! Production deployments swap these for database-backed implementations
//! without touching the session lifecycle or the domain records.

pub mod bus_registry;
pub mod incident_store;
pub mod notifier;
pub mod user_directory;

pub use bus_registry::InMemoryBusRegistry;
pub use incident_store::{IncidentFilter, InMemoryIncidentStore};
pub use notifier::{IncidentNotifier, LogNotifier};
pub use user_directory::InMemoryUserDirectory;
