use super::types::{
    ActivityView, AggregatedSchedule, AreaView, LocationView, ShiftView, TimeslotView,
};
use super::INTERNAL_ID_OFFSET;
use crate::interval::{merge_overlapping, ShiftInterval};
use crate::model::{Dataset, Event, LocationId};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Activités, créneaux, lieux et zones du programme, puis les shifts.
pub(super) fn populate_program(
    out: &mut AggregatedSchedule,
    dataset: &Dataset,
    event: &Event,
    now: DateTime<Utc>,
) {
    for activity in dataset.activities.iter().filter(|a| a.event_id == event.id) {
        let activity_key = activity.id.as_key();
        out.activities.insert(
            activity_key.clone(),
            ActivityView {
                id: activity_key.clone(),
                title: activity.title.clone(),
                description: activity.description.clone(),
                internal: false,
                timeslots: Vec::new(),
            },
        );

        for timeslot in dataset
            .timeslots
            .iter()
            .filter(|t| t.activity_id == activity.id)
        {
            insert_timeslot(
                out,
                dataset,
                &activity_key,
                timeslot.id.as_key(),
                timeslot.location_id,
                timeslot.interval(),
                now,
            );
        }
    }

    // Shifts internes sans activité : identifiants synthétiques au-delà de
    // INTERNAL_ID_OFFSET, créneaux fusionnés à partir du planning.
    let mut next_timeslot = INTERNAL_ID_OFFSET;

    for shift in dataset.shifts.iter().filter(|s| s.event_id == event.id) {
        let activity_key = match shift.activity_id {
            Some(activity) => activity.as_key(),
            None => {
                let key = itoa::Buffer::new()
                    .format(INTERNAL_ID_OFFSET + shift.id.get())
                    .to_owned();
                out.activities.insert(
                    key.clone(),
                    ActivityView {
                        id: key.clone(),
                        title: shift.name.clone(),
                        description: shift.description.clone(),
                        internal: true,
                        timeslots: Vec::new(),
                    },
                );

                let intervals: Vec<ShiftInterval> = dataset
                    .schedule
                    .iter()
                    .filter(|s| s.shift_id == shift.id && !s.is_deleted())
                    .map(|s| s.interval())
                    .collect();
                match shift.location_id {
                    Some(location) => {
                        for interval in merge_overlapping(intervals) {
                            let timeslot_key =
                                itoa::Buffer::new().format(next_timeslot).to_owned();
                            next_timeslot += 1;
                            insert_timeslot(
                                out,
                                dataset,
                                &key,
                                timeslot_key,
                                location,
                                interval,
                                now,
                            );
                        }
                    }
                    None => debug!(shift = %shift.id, "internal shift without location"),
                }
                key
            }
        };

        let shift_key = shift.id.as_key();
        out.shifts.insert(
            shift_key.clone(),
            ShiftView {
                id: shift_key,
                name: shift.name.clone(),
                team: shift.team_id.as_key(),
                activity: activity_key,
                colour: shift.colour.clone(),
                description: shift.description.clone(),
            },
        );
    }
}

fn insert_timeslot(
    out: &mut AggregatedSchedule,
    dataset: &Dataset,
    activity_key: &str,
    timeslot_key: String,
    location_id: LocationId,
    interval: ShiftInterval,
    now: DateTime<Utc>,
) {
    let Some(location) = dataset.find_location(location_id) else {
        debug!(location = %location_id, "timeslot at unknown location");
        return;
    };
    let Some(area) = dataset.find_area(location.area_id) else {
        debug!(area = %location.area_id, "location in unknown area");
        return;
    };

    let active = interval.is_active_at(now);
    let area_key = area.id.as_key();
    let location_key = location.id.as_key();

    let area_view = out.areas.entry(area_key.clone()).or_insert_with(|| AreaView {
        id: area_key.clone(),
        name: area.name.clone(),
        icon: area.icon.clone(),
        active: 0,
        locations: Vec::new(),
    });
    if !area_view.locations.contains(&location_key) {
        area_view.locations.push(location_key.clone());
    }
    if active {
        area_view.active += 1;
    }

    let location_view = out
        .locations
        .entry(location_key.clone())
        .or_insert_with(|| LocationView {
            id: location_key.clone(),
            name: location.name.clone(),
            area: area_key,
            active: 0,
            timeslots: Vec::new(),
        });
    location_view.timeslots.push(timeslot_key.clone());
    if active {
        location_view.active += 1;
    }

    if let Some(activity) = out.activities.get_mut(activity_key) {
        activity.timeslots.push(timeslot_key.clone());
    }

    out.timeslots.insert(
        timeslot_key.clone(),
        TimeslotView {
            id: timeslot_key,
            activity: activity_key.to_string(),
            location: location_key,
            start: interval.start.timestamp(),
            end: interval.end.timestamp(),
            active,
        },
    );
}
