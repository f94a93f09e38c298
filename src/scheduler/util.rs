use super::SchedError;
use crate::access::{AccessCheck, Permission, ViewerContext};
use crate::model::{Dataset, Event, EventId, Shift, ShiftId, UserId, Volunteer};
use chrono::{DateTime, Utc};

pub(super) fn require_event(dataset: &Dataset, id: EventId) -> Result<&Event, SchedError> {
    dataset.find_event(id).ok_or(SchedError::UnknownEvent(id))
}

pub(super) fn require_volunteer(
    dataset: &Dataset,
    event: EventId,
    user: UserId,
) -> Result<&Volunteer, SchedError> {
    dataset
        .find_volunteer(event, user)
        .ok_or(SchedError::UnknownVolunteer { event, user })
}

pub(super) fn require_shift(
    dataset: &Dataset,
    event: EventId,
    id: ShiftId,
) -> Result<&Shift, SchedError> {
    dataset
        .find_shift(id)
        .filter(|s| s.event_id == event)
        .ok_or(SchedError::UnknownShift(id))
}

pub(super) fn require_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), SchedError> {
    if end <= start {
        return Err(SchedError::InvalidTimeRange);
    }
    Ok(())
}

/// Auteur de la modification, s'il a le droit d'écrire dans le planning.
pub(super) fn authorize(actor: &ViewerContext) -> Result<UserId, SchedError> {
    match actor.user_id {
        Some(user) if actor.can(Permission::ScheduleWrite) => Ok(user),
        _ => Err(SchedError::Forbidden(Permission::ScheduleWrite)),
    }
}
