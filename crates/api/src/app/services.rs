//! Service wiring: the session lifecycle services plus the fleet stores,
//! gathered behind one struct handlers pull out of request extensions.
//!
//! Handlers inject the wall clock at this boundary; everything below takes
//! `now` as a parameter.

use std::sync::Arc;

use chrono::Utc;

use fleetwatch_auth::{
    AuthConfig, ClearedSession, Credentials, LoginOutcome, PresentedTokens, RefreshOutcome,
    SessionIssuer, SessionRenewer, SessionTerminator, TokenCodec, UserDirectory,
};
use fleetwatch_core::{BusId, DomainError, DomainResult, IncidentId};
use fleetwatch_incidents::{Bus, Incident, Severity};
use fleetwatch_infra::{
    IncidentFilter, IncidentNotifier, InMemoryBusRegistry, InMemoryIncidentStore,
};

pub struct AppServices {
    issuer: SessionIssuer,
    renewer: SessionRenewer,
    terminator: SessionTerminator,
    auth_config: Arc<AuthConfig>,
    directory: Arc<dyn UserDirectory>,
    buses: Arc<InMemoryBusRegistry>,
    incidents: Arc<InMemoryIncidentStore>,
    notifier: Arc<dyn IncidentNotifier>,
}

impl AppServices {
    pub fn new(
        codec: Arc<TokenCodec>,
        auth_config: Arc<AuthConfig>,
        directory: Arc<dyn UserDirectory>,
        buses: Arc<InMemoryBusRegistry>,
        incidents: Arc<InMemoryIncidentStore>,
        notifier: Arc<dyn IncidentNotifier>,
    ) -> Self {
        Self {
            issuer: SessionIssuer::new(codec.clone(), auth_config.clone()),
            renewer: SessionRenewer::new(codec, auth_config.clone()),
            terminator: SessionTerminator::new(auth_config.clone()),
            auth_config,
            directory,
            buses,
            incidents,
            notifier,
        }
    }

    // ── Session lifecycle ────────────────────────────────────────────────────

    pub fn login(&self, credentials: &Credentials, presented: &PresentedTokens) -> LoginOutcome {
        self.issuer
            .login(&*self.directory, credentials, presented, Utc::now())
    }

    pub fn refresh(&self, refresh_token: &str) -> RefreshOutcome {
        self.renewer
            .refresh(&*self.directory, refresh_token, Utc::now())
    }

    pub fn logout(&self) -> ClearedSession {
        self.terminator.logout()
    }

    pub fn access_cookie_name(&self) -> &str {
        &self.auth_config.cookies.access_name
    }

    pub fn refresh_cookie_name(&self) -> &str {
        &self.auth_config.cookies.refresh_name
    }

    // ── Buses ────────────────────────────────────────────────────────────────

    pub fn register_bus(
        &self,
        fleet_number: &str,
        registration: &str,
        capacity: u32,
    ) -> DomainResult<Bus> {
        let bus = Bus::register(fleet_number, registration, capacity)?;
        self.buses.register(bus)
    }

    pub fn list_buses(&self) -> Vec<Bus> {
        self.buses.list()
    }

    pub fn get_bus(&self, id: BusId) -> Option<Bus> {
        self.buses.get(id)
    }

    pub fn retire_bus(&self, id: BusId) -> DomainResult<Bus> {
        let mut bus = self.buses.get(id).ok_or(DomainError::NotFound)?;
        bus.retire()?;
        self.buses.save(bus.clone())?;
        Ok(bus)
    }

    // ── Incidents ────────────────────────────────────────────────────────────

    pub fn report_incident(
        &self,
        bus_id: BusId,
        title: &str,
        description: &str,
        severity: Severity,
        reported_by: &str,
    ) -> DomainResult<Incident> {
        if self.buses.get(bus_id).is_none() {
            return Err(DomainError::NotFound);
        }
        let incident =
            Incident::report(bus_id, title, description, severity, reported_by, Utc::now())?;
        self.incidents.insert(incident.clone())?;
        self.notifier.incident_reported(&incident);
        Ok(incident)
    }

    pub fn list_incidents(&self, filter: IncidentFilter) -> Vec<Incident> {
        self.incidents.list(filter)
    }

    pub fn get_incident(&self, id: IncidentId) -> Option<Incident> {
        self.incidents.get(id)
    }

    pub fn resolve_incident(&self, id: IncidentId, note: Option<String>) -> DomainResult<Incident> {
        let mut incident = self.incidents.get(id).ok_or(DomainError::NotFound)?;
        incident.resolve(note, Utc::now())?;
        self.incidents.save(incident.clone())?;
        Ok(incident)
    }

    pub fn delete_incident(&self, id: IncidentId) -> DomainResult<Incident> {
        self.incidents.remove(id)
    }
}
