use crate::access::Permission;
use crate::model::{
    EventId, ScheduleId, ShiftId, TeamId, UserId, VendorId, VendorScheduleId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Affectation d'un bénévole à un shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewScheduledShift {
    pub event_id: EventId,
    pub shift_id: ShiftId,
    pub user_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Modification d'un shift planifié ; `None` garde la valeur actuelle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleUpdate {
    pub shift_id: Option<ShiftId>,
    pub user_id: Option<UserId>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Période cible d'un prestataire, `id` à 0 pour une nouvelle entrée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorScheduleTarget {
    #[serde(default)]
    pub id: VendorScheduleId,
    pub vendor_id: VendorId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub inserted: Vec<VendorScheduleId>,
    pub updated: Vec<VendorScheduleId>,
    pub deleted: Vec<VendorScheduleId>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("unknown event: {0}")]
    UnknownEvent(EventId),
    #[error("unknown volunteer {user} for event {event}")]
    UnknownVolunteer { event: EventId, user: UserId },
    #[error("unknown shift: {0}")]
    UnknownShift(ShiftId),
    #[error("unknown scheduled shift: {0}")]
    UnknownScheduledShift(ScheduleId),
    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),
    #[error("unknown vendor {vendor} for team {team}")]
    UnknownVendor { team: TeamId, vendor: VendorId },
    #[error("missing permission: {0}")]
    Forbidden(Permission),
    #[error("Cannot schedule a shift at that time for the volunteer")]
    ShiftUnavailable,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchedError {
    /// Refus métier (contexte introuvable ou créneau invalide), par opposition
    /// à une panne de stockage.
    pub fn is_declined(&self) -> bool {
        !matches!(self, SchedError::Other(_))
    }
}
