#![forbid(unsafe_code)]
use benevoles::{
    format_mutation,
    model::{
        Dataset, Event, EventId, MutationKind, Role, ScheduleId, Shift, ShiftId, Team, TeamId,
        UserId, Vendor, VendorId, VendorScheduleEntry, VendorScheduleId, Volunteer,
    },
    Grants, MemoryStore, MutationView, NewScheduledShift, Permission, SchedError, ScheduleUpdate,
    Scheduler, Settings, ShiftInterval, Store, VendorScheduleTarget, ViewerContext,
};
use chrono::{DateTime, TimeZone, Utc};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, hour, 0, 0).unwrap()
}

fn volunteer(user: u64, name: &str, exceptions: Option<String>) -> Volunteer {
    Volunteer {
        user_id: UserId(user),
        event_id: EventId(1),
        team_id: TeamId(1),
        name: name.into(),
        role: Role {
            name: "Steward".into(),
            leadership: false,
        },
        avatar: None,
        phone: None,
        notes: None,
        availability_exceptions: exceptions,
        unavailable_timeslots: Vec::new(),
        preference_window: None,
    }
}

fn scheduler() -> Scheduler<MemoryStore> {
    let mut d = Dataset::default();
    d.events.push(Event {
        id: EventId(1),
        name: "AnimeCon 2025".into(),
        slug: "2025".into(),
        start: at(8),
        end: at(23),
    });
    d.teams.push(Team {
        id: TeamId(1),
        event_id: EventId(1),
        name: "Stewards".into(),
        vendor_team: false,
        show_card: false,
    });
    d.teams.push(Team {
        id: TeamId(2),
        event_id: EventId(1),
        name: "First Aid".into(),
        vendor_team: true,
        show_card: true,
    });
    for (id, name) in [(1, "Registration Desk"), (2, "Stage")] {
        d.shifts.push(Shift {
            id: ShiftId(id),
            event_id: EventId(1),
            team_id: TeamId(1),
            name: name.into(),
            activity_id: None,
            location_id: None,
            colour: None,
            description: None,
        });
    }
    let busy = format!(
        r#"[{{"start":"{}","end":"{}","state":"unavailable"}}]"#,
        at(14).to_rfc3339(),
        at(16).to_rfc3339()
    );
    d.volunteers.push(volunteer(7, "Alice", Some(busy)));
    d.volunteers.push(volunteer(8, "Bob", None));
    for (id, name) in [(1, "Dana"), (2, "Erik")] {
        d.vendors.push(Vendor {
            id: VendorId(id),
            team_id: TeamId(2),
            name: name.into(),
            role: None,
        });
    }
    d.vendor_schedule.push(VendorScheduleEntry {
        id: VendorScheduleId(5),
        vendor_id: VendorId(1),
        start: at(10),
        end: at(12),
        created: at(0),
        updated: at(0),
        deleted: None,
    });
    Scheduler::new(MemoryStore::new(d), Settings::default())
}

fn admin() -> ViewerContext {
    ViewerContext::new(Some(UserId(1)), Grants::from_iter([Permission::ScheduleWrite]))
}

fn assign(user: u64, start: u32, end: u32) -> NewScheduledShift {
    NewScheduledShift {
        event_id: EventId(1),
        shift_id: ShiftId(1),
        user_id: UserId(user),
        start: at(start),
        end: at(end),
    }
}

#[test]
fn assignment_respects_availability() {
    let s = scheduler();
    let err = s
        .create_scheduled_shift(assign(7, 15, 17), &admin(), at(9))
        .unwrap_err();
    assert!(matches!(err, SchedError::ShiftUnavailable));
    assert_eq!(
        err.to_string(),
        "Cannot schedule a shift at that time for the volunteer"
    );
    assert!(s.store().snapshot().schedule.is_empty());

    // Touche la fin de l'indisponibilité sans la chevaucher.
    let id = s
        .create_scheduled_shift(assign(7, 16, 18), &admin(), at(9))
        .unwrap();
    assert_eq!(id, ScheduleId(1));
}

#[test]
fn existing_shifts_block_double_booking_but_not_themselves() {
    let s = scheduler();
    let id = s
        .create_scheduled_shift(assign(8, 10, 12), &admin(), at(9))
        .unwrap();

    let overlapping = ShiftInterval::new(at(11), at(13)).unwrap();
    assert!(!s
        .is_valid_shift(EventId(1), UserId(8), &overlapping, None)
        .unwrap());
    assert!(s
        .is_valid_shift(EventId(1), UserId(8), &overlapping, Some(id))
        .unwrap());

    let changed = s
        .update_scheduled_shift(
            id,
            ScheduleUpdate {
                end: Some(at(13)),
                ..ScheduleUpdate::default()
            },
            &admin(),
            at(9),
        )
        .unwrap();
    assert!(changed);
    assert_eq!(s.store().snapshot().schedule[0].end, at(13));
}

#[test]
fn missing_context_is_not_found() {
    let s = scheduler();
    let interval = ShiftInterval::new(at(10), at(11)).unwrap();
    assert!(matches!(
        s.is_valid_shift(EventId(9), UserId(7), &interval, None),
        Err(SchedError::UnknownEvent(_))
    ));
    assert!(matches!(
        s.is_valid_shift(EventId(1), UserId(99), &interval, None),
        Err(SchedError::UnknownVolunteer { .. })
    ));
}

#[test]
fn mutations_are_logged_in_order() {
    let s = scheduler();
    let id = s
        .create_scheduled_shift(assign(7, 10, 12), &admin(), at(9))
        .unwrap();
    s.update_scheduled_shift(
        id,
        ScheduleUpdate {
            user_id: Some(UserId(8)),
            ..ScheduleUpdate::default()
        },
        &admin(),
        at(9),
    )
    .unwrap();
    s.update_scheduled_shift(
        id,
        ScheduleUpdate {
            shift_id: Some(ShiftId(2)),
            ..ScheduleUpdate::default()
        },
        &admin(),
        at(9),
    )
    .unwrap();
    s.delete_scheduled_shift(id, &admin(), at(10)).unwrap();

    let dataset = s.store().snapshot();
    assert!(dataset.schedule[0].deleted.is_some());

    let kinds: Vec<MutationKind> = dataset.mutation_log.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MutationKind::Created,
            MutationKind::Updated,
            MutationKind::Updated,
            MutationKind::Deleted
        ]
    );

    let lines: Vec<String> = dataset
        .mutation_log
        .iter()
        .map(|e| format_mutation(&MutationView::describe(e, &dataset)))
        .collect();
    assert_eq!(
        lines,
        vec![
            "Created a new shift for Alice",
            "Moved a Registration Desk shift from Alice to Bob",
            "Changed a shift for Bob from Registration Desk to Stage",
            "Removed a Stage shift for Bob",
        ]
    );

    assert!(matches!(
        s.delete_scheduled_shift(id, &admin(), at(11)),
        Err(SchedError::UnknownScheduledShift(_))
    ));
}

#[test]
fn unchanged_update_writes_nothing() {
    let s = scheduler();
    let id = s
        .create_scheduled_shift(assign(8, 10, 12), &admin(), at(9))
        .unwrap();
    let changed = s
        .update_scheduled_shift(
            id,
            ScheduleUpdate {
                start: Some(at(10)),
                ..ScheduleUpdate::default()
            },
            &admin(),
            at(9),
        )
        .unwrap();
    assert!(!changed);
    assert_eq!(s.store().snapshot().mutation_log.len(), 1);
}

#[test]
fn reconciliation_commits_per_resource_changes() {
    let s = scheduler();
    let target = [
        VendorScheduleTarget {
            id: VendorScheduleId::UNSAVED,
            vendor_id: VendorId(2),
            start: at(9),
            end: at(11),
        },
        VendorScheduleTarget {
            id: VendorScheduleId(5),
            vendor_id: VendorId(1),
            start: at(10),
            end: at(13),
        },
    ];
    let report = s
        .reconcile_vendor_schedule(
            TeamId(2),
            &[VendorId(1), VendorId(2)],
            &target,
            &admin(),
            at(20),
        )
        .unwrap();
    assert_eq!(report.updated, vec![VendorScheduleId(5)]);
    assert_eq!(report.inserted, vec![VendorScheduleId(6)]);
    assert!(report.deleted.is_empty());
    assert_eq!(s.store().load().unwrap().vendor_schedule.len(), 2);
}

#[test]
fn failed_reconciliation_rolls_back_everything() {
    let s = scheduler();
    let before = s.store().snapshot();

    // Le premier prestataire est traité, le second est inconnu.
    let err = s
        .reconcile_vendor_schedule(
            TeamId(2),
            &[VendorId(1), VendorId(42)],
            &[],
            &admin(),
            at(20),
        )
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownVendor { .. }));
    assert_eq!(s.store().snapshot(), before);
}

#[test]
fn invalid_target_range_rolls_back_earlier_resources() {
    let s = scheduler();
    let before = s.store().snapshot();
    let target = [
        VendorScheduleTarget {
            id: VendorScheduleId(5),
            vendor_id: VendorId(1),
            start: at(10),
            end: at(13),
        },
        VendorScheduleTarget {
            id: VendorScheduleId::UNSAVED,
            vendor_id: VendorId(2),
            start: at(12),
            end: at(11),
        },
    ];

    // Le prestataire 1 est mis à jour avant que la plage du 2 soit refusée.
    let err = s
        .reconcile_vendor_schedule(
            TeamId(2),
            &[VendorId(1), VendorId(2)],
            &target,
            &admin(),
            at(20),
        )
        .unwrap_err();
    assert!(matches!(err, SchedError::InvalidTimeRange));
    assert_eq!(s.store().snapshot(), before);
    assert_eq!(before.vendor_schedule[0].end, at(12));
}

#[test]
fn mutations_require_schedule_write() {
    let s = scheduler();
    let reader = ViewerContext::new(
        Some(UserId(1)),
        Grants::from_iter([Permission::VendorCalendars]),
    );
    let err = s
        .create_scheduled_shift(assign(8, 10, 12), &reader, at(9))
        .unwrap_err();
    assert!(matches!(err, SchedError::Forbidden(Permission::ScheduleWrite)));
    assert_eq!(err.to_string(), "missing permission: schedule-write");

    let anonymous = ViewerContext::new(None, Grants::from_iter([Permission::ScheduleWrite]));
    assert!(matches!(
        s.reconcile_vendor_schedule(TeamId(2), &[VendorId(1)], &[], &anonymous, at(20)),
        Err(SchedError::Forbidden(_))
    ));

    let id = s
        .create_scheduled_shift(assign(8, 10, 12), &admin(), at(9))
        .unwrap();
    assert!(matches!(
        s.delete_scheduled_shift(id, &reader, at(10)),
        Err(SchedError::Forbidden(_))
    ));
    let dataset = s.store().snapshot();
    assert!(dataset.schedule[0].deleted.is_none());
    assert_eq!(dataset.mutation_log.len(), 1);
    assert_eq!(dataset.mutation_log[0].actor, UserId(1));
}
