use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetwatch_core::{BusId, DomainError, DomainResult, IncidentId};

/// How badly the incident affects service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Incident lifecycle. The only transition is `Open -> Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Open,
    Resolved,
}

/// An incident reported against a bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub bus_id: BusId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    /// Username of the reporting operator.
    pub reported_by: String,
    pub reported_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_note: Option<String>,
}

impl Incident {
    pub const MAX_TITLE_LEN: usize = 200;

    /// Report a new incident. Reports always start out open.
    pub fn report(
        bus_id: BusId,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        reported_by: impl Into<String>,
        reported_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = title.into().trim().to_string();
        let reported_by = reported_by.into();

        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        if title.chars().count() > Self::MAX_TITLE_LEN {
            return Err(DomainError::validation(format!(
                "title must be at most {} characters",
                Self::MAX_TITLE_LEN
            )));
        }
        if reported_by.trim().is_empty() {
            return Err(DomainError::validation("reporter must not be empty"));
        }

        Ok(Self {
            id: IncidentId::new(),
            bus_id,
            title,
            description: description.into(),
            severity,
            status: IncidentStatus::Open,
            reported_by,
            reported_at,
            resolved_at: None,
            resolution_note: None,
        })
    }

    /// Close the incident. Resolving an already-resolved incident is an
    /// invariant violation, not a no-op.
    pub fn resolve(&mut self, note: Option<String>, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status == IncidentStatus::Resolved {
            return Err(DomainError::invariant(format!(
                "incident {} is already resolved",
                self.id
            )));
        }
        self.status = IncidentStatus::Resolved;
        self.resolved_at = Some(at);
        self.resolution_note = note;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
