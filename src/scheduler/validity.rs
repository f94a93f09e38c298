use crate::availability::{compute_unavailable_intervals, AvailabilityOptions};
use crate::interval::ShiftInterval;
use crate::model::{Dataset, Event, ScheduleId, Volunteer};
use crate::settings::Settings;

/// Vrai si `shift` ne chevauche aucun intervalle indisponible. Les bornes qui
/// se touchent ne sont pas un conflit.
pub fn interval_is_free(shift: &ShiftInterval, unavailable: &[ShiftInterval]) -> bool {
    for u in unavailable {
        if shift.end <= u.start || shift.start >= u.end {
            continue;
        }
        return false;
    }
    true
}

/// Contrôle d'une affectation administrateur : disponibilités du bénévole
/// (sans ses préférences) et ses autres shifts planifiés, hors
/// `ignore_schedule_id`.
pub fn is_valid_shift(
    dataset: &Dataset,
    settings: &Settings,
    event: &Event,
    volunteer: &Volunteer,
    shift: &ShiftInterval,
    ignore_schedule_id: Option<ScheduleId>,
) -> bool {
    let mut unavailable = compute_unavailable_intervals(
        event,
        volunteer,
        settings,
        &dataset.timeslots,
        AvailabilityOptions::administrator(),
    )
    .unavailable;

    unavailable.extend(
        dataset
            .schedule
            .iter()
            .filter(|s| s.event_id == event.id && s.user_id == volunteer.user_id)
            .filter(|s| !s.is_deleted() && Some(s.id) != ignore_schedule_id)
            .map(|s| s.interval()),
    );

    interval_is_free(shift, &unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 0, 0, 0).unwrap() + chrono::Duration::minutes(minute)
    }

    fn iv(start: i64, end: i64) -> ShiftInterval {
        ShiftInterval::new(at(start), at(end)).unwrap()
    }

    #[test]
    fn touching_boundaries_do_not_conflict() {
        let blocked = [iv(600, 720)];
        assert!(interval_is_free(&iv(480, 600), &blocked));
        assert!(interval_is_free(&iv(720, 780), &blocked));
        assert!(!interval_is_free(&iv(599, 601), &blocked));
    }

    #[test]
    fn partial_and_containing_overlaps_conflict() {
        let blocked = [iv(600, 720)];
        assert!(!interval_is_free(&iv(540, 660), &blocked));
        assert!(!interval_is_free(&iv(660, 780), &blocked));
        assert!(!interval_is_free(&iv(500, 800), &blocked));
        assert!(!interval_is_free(&iv(620, 640), &blocked));
    }

    proptest! {
        #[test]
        fn invalid_iff_strict_overlap(
            a_start in 0i64..1000, a_len in 1i64..300,
            u_start in 0i64..1000, u_len in 1i64..300,
        ) {
            let a = iv(a_start, a_start + a_len);
            let u = iv(u_start, u_start + u_len);
            let overlap = a.start < u.end && a.end > u.start;
            prop_assert_eq!(interval_is_free(&a, &[u]), !overlap);
        }
    }
}
