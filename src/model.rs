use crate::interval::ShiftInterval;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }
            pub fn get(self) -> u64 {
                self.0
            }
            /// Identifiant sous forme de clé de map côté client.
            pub fn as_key(self) -> String {
                itoa::Buffer::new().format(self.0).to_owned()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(EventId);
numeric_id!(UserId);
numeric_id!(TeamId);
numeric_id!(
    /// Catégorie de travail (« Registration Desk »), pas une occurrence.
    ShiftId
);
numeric_id!(
    /// Occurrence planifiée d'un shift pour un bénévole.
    ScheduleId
);
numeric_id!(VendorId);
numeric_id!(VendorScheduleId);
numeric_id!(ActivityId);
numeric_id!(TimeslotId);
numeric_id!(LocationId);
numeric_id!(AreaId);

impl VendorScheduleId {
    /// Sentinelle des entrées pas encore persistées dans une demande de réconciliation.
    pub const UNSAVED: Self = Self(0);

    pub fn is_unsaved(self) -> bool {
        self == Self::UNSAVED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub slug: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub event_id: EventId,
    pub name: String,
    /// Équipe de prestataires (secours, sécurité...) suivie hors bénévoles.
    #[serde(default)]
    pub vendor_team: bool,
    /// Affiche la carte de l'équipe à tous les visiteurs du planning.
    #[serde(default)]
    pub show_card: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub leadership: bool,
}

/// Plage horaire préférée d'un bénévole. Repasse minuit quand
/// `end_hour <= start_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl PreferenceWindow {
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self, String> {
        if start_hour >= 24 || end_hour >= 24 {
            return Err("preference hours must be within [0, 24)".to_string());
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Intervalles couverts par la fenêtre sur chaque jour de `range` (un jour
    /// de marge avant pour les fenêtres qui passent minuit).
    pub fn daily_intervals(&self, range: &ShiftInterval) -> Vec<ShiftInterval> {
        let (Some(start_time), Some(end_time)) = (
            NaiveTime::from_hms_opt(u32::from(self.start_hour), 0, 0),
            NaiveTime::from_hms_opt(u32::from(self.end_hour), 0, 0),
        ) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut day = range.start.date_naive() - Duration::days(1);
        let last = range.end.date_naive();
        while day <= last {
            let start = Utc.from_utc_datetime(&day.and_time(start_time));
            let mut end = Utc.from_utc_datetime(&day.and_time(end_time));
            if self.end_hour <= self.start_hour {
                end += Duration::days(1);
            }
            out.push(ShiftInterval { start, end });
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        out
    }
}

/// Bénévole inscrit à un événement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    pub user_id: UserId,
    pub event_id: EventId,
    pub team_id: TeamId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Exceptions de disponibilité, stockées en JSON brut.
    #[serde(default)]
    pub availability_exceptions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_timeslots: Vec<TimeslotId>,
    #[serde(default)]
    pub preference_window: Option<PreferenceWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub event_id: EventId,
    pub team_id: TeamId,
    pub name: String,
    /// Activité du programme qui porte ce shift ; `None` pour un shift interne.
    #[serde(default)]
    pub activity_id: Option<ActivityId>,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledShift {
    pub id: ScheduleId,
    pub event_id: EventId,
    pub shift_id: ShiftId,
    pub user_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
}

impl ScheduledShift {
    pub fn interval(&self) -> ShiftInterval {
        ShiftInterval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            shift_id: self.shift_id,
            user_id: self.user_id,
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub team_id: TeamId,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorScheduleEntry {
    pub id: VendorScheduleId,
    pub vendor_id: VendorId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
}

impl VendorScheduleEntry {
    pub fn interval(&self) -> ShiftInterval {
        ShiftInterval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub area_id: AreaId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub event_id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    pub id: TimeslotId,
    pub activity_id: ActivityId,
    pub location_id: LocationId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Timeslot {
    pub fn interval(&self) -> ShiftInterval {
        ShiftInterval {
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: u64,
    pub event_id: EventId,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed: Option<DateTime<Utc>>,
}

impl HelpRequest {
    pub fn is_pending(&self) -> bool {
        self.acknowledged.is_none() && self.closed.is_none()
    }
}

/// Conseil affiché en rotation sur le planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub id: u64,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeQuestion {
    pub id: u64,
    pub event_id: EventId,
    pub category: String,
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourite {
    pub user_id: UserId,
    pub event_id: EventId,
    pub activity_id: ActivityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

/// Valeurs d'un shift planifié à un instant donné.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub shift_id: ShiftId,
    pub user_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Entrée immuable du journal des modifications du planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationLogEntry {
    pub id: Uuid,
    pub event_id: EventId,
    pub schedule_id: ScheduleId,
    pub kind: MutationKind,
    pub before: Option<ScheduleSnapshot>,
    pub after: Option<ScheduleSnapshot>,
    pub actor: UserId,
    pub timestamp: DateTime<Utc>,
}

/// État persistant complet (tables).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub events: Vec<Event>,
    pub teams: Vec<Team>,
    pub volunteers: Vec<Volunteer>,
    pub shifts: Vec<Shift>,
    pub schedule: Vec<ScheduledShift>,
    pub vendors: Vec<Vendor>,
    pub vendor_schedule: Vec<VendorScheduleEntry>,
    pub areas: Vec<Area>,
    pub locations: Vec<Location>,
    pub activities: Vec<Activity>,
    pub timeslots: Vec<Timeslot>,
    pub help_requests: Vec<HelpRequest>,
    pub advice: Vec<Advice>,
    pub knowledge: Vec<KnowledgeQuestion>,
    pub favourites: Vec<Favourite>,
    pub mutation_log: Vec<MutationLogEntry>,
}

impl Dataset {
    pub fn find_event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
    pub fn find_team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }
    pub fn find_volunteer(&self, event: EventId, user: UserId) -> Option<&Volunteer> {
        self.volunteers
            .iter()
            .find(|v| v.event_id == event && v.user_id == user)
    }
    pub fn find_shift(&self, id: ShiftId) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == id)
    }
    pub fn find_scheduled_shift_mut(&mut self, id: ScheduleId) -> Option<&mut ScheduledShift> {
        self.schedule.iter_mut().find(|s| s.id == id && !s.is_deleted())
    }
    pub fn find_vendor(&self, id: VendorId) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }
    pub fn find_vendor_entry_mut(
        &mut self,
        id: VendorScheduleId,
    ) -> Option<&mut VendorScheduleEntry> {
        self.vendor_schedule.iter_mut().find(|e| e.id == id)
    }
    pub fn find_location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }
    pub fn find_area(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn next_schedule_id(&self) -> ScheduleId {
        ScheduleId(self.schedule.iter().map(|s| s.id.0).max().unwrap_or(0) + 1)
    }

    pub fn next_vendor_schedule_id(&self) -> VendorScheduleId {
        VendorScheduleId(
            self.vendor_schedule
                .iter()
                .map(|e| e.id.0)
                .max()
                .unwrap_or(0)
                + 1,
        )
    }
}
