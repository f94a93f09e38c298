//! Modèle de disponibilité d'un bénévole.
//!
//! Base : créneaux indisponibles par défaut (créneaux marqués par le
//! bénévole, heures hors de la fenêtre de travail de l'événement). Les
//! exceptions viennent ensuite : `available` retire la couverture,
//! `unavailable` l'ajoute. La première exception qui couvre un instant
//! l'emporte.

use crate::interval::{IntervalSet, ShiftInterval};
use crate::model::{Event, Timeslot, Volunteer};
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionState {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityException {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub state: ExceptionState,
}

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("malformed availability exceptions: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("availability exception #{index} ends before it starts")]
    InvalidRange { index: usize },
}

/// Liste d'exceptions validée, dans l'ordre de saisie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityExceptions(Vec<AvailabilityException>);

impl AvailabilityExceptions {
    pub fn new(exceptions: Vec<AvailabilityException>) -> Self {
        Self(exceptions)
    }

    /// Lecture stricte de la valeur stockée.
    pub fn parse(raw: &str) -> Result<Self, AvailabilityError> {
        let exceptions: Vec<AvailabilityException> = serde_json::from_str(raw)?;
        if let Some(index) = exceptions.iter().position(|e| e.end <= e.start) {
            return Err(AvailabilityError::InvalidRange { index });
        }
        Ok(Self(exceptions))
    }

    /// Lecture permissive : une valeur illisible équivaut à « aucune exception ».
    pub fn from_stored(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };
        match Self::parse(raw) {
            Ok(exceptions) => exceptions,
            Err(err) => {
                warn!(error = %err, "ignoring stored availability exceptions");
                Self::default()
            }
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &AvailabilityException> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityOptions {
    /// Prend en compte la plage préférée du bénévole.
    pub include_preferences: bool,
}

impl AvailabilityOptions {
    /// Vérification d'une affectation faite par un administrateur : les
    /// préférences restent indicatives.
    pub fn administrator() -> Self {
        Self {
            include_preferences: false,
        }
    }

    /// Parcours libre-service du bénévole.
    pub fn self_service() -> Self {
        Self {
            include_preferences: true,
        }
    }
}

/// Disponibilité d'un bénévole à un instant donné.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Until(DateTime<Utc>),
    /// Indisponible jusqu'à la fin de l'événement.
    NotReturning,
}

impl Availability {
    /// Projection client : absent, `-1`, ou timestamp unix de retour.
    pub fn as_unix(&self) -> Option<i64> {
        match self {
            Availability::Available => None,
            Availability::Until(at) => Some(at.timestamp()),
            Availability::NotReturning => Some(-1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnavailableIntervals {
    pub unavailable: Vec<ShiftInterval>,
}

impl UnavailableIntervals {
    pub fn availability_at(&self, now: DateTime<Utc>, event_end: DateTime<Utc>) -> Availability {
        match self
            .unavailable
            .iter()
            .find(|iv| iv.start <= now && now < iv.end)
        {
            None => Availability::Available,
            Some(iv) if iv.end >= event_end => Availability::NotReturning,
            Some(iv) => Availability::Until(iv.end),
        }
    }
}

pub fn compute_unavailable_intervals(
    event: &Event,
    volunteer: &Volunteer,
    settings: &Settings,
    timeslots: &[Timeslot],
    opts: AvailabilityOptions,
) -> UnavailableIntervals {
    let mut set: IntervalSet = timeslots
        .iter()
        .filter(|slot| volunteer.unavailable_timeslots.contains(&slot.id))
        .map(Timeslot::interval)
        .collect();

    let event_range = ShiftInterval {
        start: event.start,
        end: event.end,
    };
    if let Some(window) = settings.availability_window {
        block_outside(&mut set, &event_range, window.daily_intervals(&event_range));
    }
    if opts.include_preferences {
        if let Some(window) = volunteer.preference_window {
            block_outside(&mut set, &event_range, window.daily_intervals(&event_range));
        }
    }

    // Appliquées en ordre inverse : la première exception passe en dernier et gagne.
    let exceptions =
        AvailabilityExceptions::from_stored(volunteer.availability_exceptions.as_deref());
    for exception in exceptions.iter().rev() {
        let interval = ShiftInterval {
            start: exception.start,
            end: exception.end,
        };
        match exception.state {
            ExceptionState::Available => set.remove(interval),
            ExceptionState::Unavailable => set.insert(interval),
        }
    }

    UnavailableIntervals {
        unavailable: set.into_vec(),
    }
}

fn block_outside(set: &mut IntervalSet, range: &ShiftInterval, allowed: Vec<ShiftInterval>) {
    let mut outside: IntervalSet = [*range].into_iter().collect();
    for interval in allowed {
        outside.remove(interval);
    }
    for interval in outside.into_vec() {
        set.insert(interval);
    }
}
