//! `fleetwatch-incidents` — fleet domain records.
//!
//! Plain CRUD domain: buses and the incidents reported against them, with
//! deterministic validation and state transitions. No IO, no clock reads;
//! timestamps come in from the caller.

pub mod bus;
pub mod incident;

pub use bus::Bus;
pub use incident::{Incident, IncidentStatus, Severity};
