use super::types::{AggregatedSchedule, ScheduleEntryView, VolunteerView};
use crate::access::{AccessCheck, Permission};
use crate::availability::{compute_unavailable_intervals, AvailabilityOptions};
use crate::model::{Dataset, Event};
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use tracing::debug;

pub(super) fn populate_volunteers(
    out: &mut AggregatedSchedule,
    dataset: &Dataset,
    settings: &Settings,
    event: &Event,
    viewer: &dyn AccessCheck,
    now: DateTime<Utc>,
) {
    let private = viewer.can(Permission::VolunteerPrivateInfo);

    for volunteer in dataset.volunteers.iter().filter(|v| v.event_id == event.id) {
        let show_private = private || volunteer.role.leadership;
        let availability = compute_unavailable_intervals(
            event,
            volunteer,
            settings,
            &dataset.timeslots,
            AvailabilityOptions::administrator(),
        )
        .availability_at(now, event.end);

        let key = volunteer.user_id.as_key();
        out.volunteers.insert(
            key.clone(),
            VolunteerView {
                id: key,
                name: volunteer.name.clone(),
                role: volunteer.role.name.clone(),
                avatar: volunteer.avatar.clone(),
                team: volunteer.team_id.as_key(),
                phone: volunteer.phone.clone().filter(|_| show_private),
                notes: volunteer.notes.clone().filter(|_| show_private),
                unavailable_until: availability.as_unix(),
                active_shift: None,
            },
        );
    }
}

/// Occurrences planifiées ; marque le shift en cours de chaque bénévole.
pub(super) fn populate_schedule(
    out: &mut AggregatedSchedule,
    dataset: &Dataset,
    event: &Event,
    now: DateTime<Utc>,
) {
    for row in dataset
        .schedule
        .iter()
        .filter(|s| s.event_id == event.id && !s.is_deleted())
    {
        let volunteer_key = row.user_id.as_key();
        let shift_key = row.shift_id.as_key();
        let Some(volunteer) = out.volunteers.get_mut(&volunteer_key) else {
            debug!(schedule = %row.id, "scheduled shift for unknown volunteer");
            continue;
        };
        if !out.shifts.contains_key(&shift_key) {
            debug!(schedule = %row.id, "scheduled shift for unknown shift");
            continue;
        }

        let key = row.id.as_key();
        if row.interval().is_active_at(now) {
            volunteer.active_shift = Some(key.clone());
            out.meta.active_volunteers += 1;
        }
        out.schedule.insert(
            key.clone(),
            ScheduleEntryView {
                id: key,
                shift: shift_key,
                volunteer: volunteer_key,
                start: row.start.timestamp(),
                end: row.end.timestamp(),
            },
        );
    }
}
