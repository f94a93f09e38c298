use super::{util, validity, NewScheduledShift, SchedError, ScheduleUpdate};
use crate::interval::ShiftInterval;
use crate::model::{
    Dataset, MutationKind, MutationLogEntry, ScheduleId, ScheduleSnapshot, ScheduledShift, UserId,
};
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

pub(super) fn create(
    dataset: &mut Dataset,
    settings: &Settings,
    request: NewScheduledShift,
    actor: UserId,
    now: DateTime<Utc>,
) -> Result<ScheduleId, SchedError> {
    util::require_range(request.start, request.end)?;
    let event = util::require_event(dataset, request.event_id)?;
    util::require_shift(dataset, event.id, request.shift_id)?;
    let volunteer = util::require_volunteer(dataset, event.id, request.user_id)?;

    let interval = ShiftInterval {
        start: request.start,
        end: request.end,
    };
    if !validity::is_valid_shift(dataset, settings, event, volunteer, &interval, None) {
        return Err(SchedError::ShiftUnavailable);
    }

    let row = ScheduledShift {
        id: dataset.next_schedule_id(),
        event_id: request.event_id,
        shift_id: request.shift_id,
        user_id: request.user_id,
        start: request.start,
        end: request.end,
        created_by: actor,
        updated_by: actor,
        created: now,
        updated: now,
        deleted: None,
    };
    let id = row.id;
    append_log(dataset, &row, MutationKind::Created, None, Some(row.snapshot()), actor, now);
    dataset.schedule.push(row);

    info!(schedule = %id, user = %request.user_id, "scheduled shift created");
    Ok(id)
}

/// Retourne `false` quand la modification ne change rien.
pub(super) fn update(
    dataset: &mut Dataset,
    settings: &Settings,
    id: ScheduleId,
    update: ScheduleUpdate,
    actor: UserId,
    now: DateTime<Utc>,
) -> Result<bool, SchedError> {
    let (event_id, before) = dataset
        .schedule
        .iter()
        .find(|s| s.id == id && !s.is_deleted())
        .map(|s| (s.event_id, s.snapshot()))
        .ok_or(SchedError::UnknownScheduledShift(id))?;

    let after = ScheduleSnapshot {
        shift_id: update.shift_id.unwrap_or(before.shift_id),
        user_id: update.user_id.unwrap_or(before.user_id),
        start: update.start.unwrap_or(before.start),
        end: update.end.unwrap_or(before.end),
    };
    if after == before {
        return Ok(false);
    }
    util::require_range(after.start, after.end)?;

    let event = util::require_event(dataset, event_id)?;
    util::require_shift(dataset, event.id, after.shift_id)?;
    let volunteer = util::require_volunteer(dataset, event.id, after.user_id)?;
    let interval = ShiftInterval {
        start: after.start,
        end: after.end,
    };
    if !validity::is_valid_shift(dataset, settings, event, volunteer, &interval, Some(id)) {
        return Err(SchedError::ShiftUnavailable);
    }

    let row = dataset
        .find_scheduled_shift_mut(id)
        .ok_or(SchedError::UnknownScheduledShift(id))?;
    row.shift_id = after.shift_id;
    row.user_id = after.user_id;
    row.start = after.start;
    row.end = after.end;
    row.updated_by = actor;
    row.updated = now;
    let row = row.clone();

    append_log(dataset, &row, MutationKind::Updated, Some(before), Some(after), actor, now);
    info!(schedule = %id, "scheduled shift updated");
    Ok(true)
}

/// Suppression logique : la ligne reste, horodatée.
pub(super) fn delete(
    dataset: &mut Dataset,
    id: ScheduleId,
    actor: UserId,
    now: DateTime<Utc>,
) -> Result<(), SchedError> {
    let row = dataset
        .find_scheduled_shift_mut(id)
        .ok_or(SchedError::UnknownScheduledShift(id))?;
    row.deleted = Some(now);
    row.updated_by = actor;
    row.updated = now;
    let row = row.clone();

    append_log(dataset, &row, MutationKind::Deleted, Some(row.snapshot()), None, actor, now);
    info!(schedule = %id, "scheduled shift removed");
    Ok(())
}

fn append_log(
    dataset: &mut Dataset,
    row: &ScheduledShift,
    kind: MutationKind,
    before: Option<ScheduleSnapshot>,
    after: Option<ScheduleSnapshot>,
    actor: UserId,
    now: DateTime<Utc>,
) {
    dataset.mutation_log.push(MutationLogEntry {
        id: Uuid::new_v4(),
        event_id: row.event_id,
        schedule_id: row.id,
        kind,
        before,
        after,
        actor,
        timestamp: now,
    });
}
