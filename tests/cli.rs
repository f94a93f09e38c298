#![forbid(unsafe_code)]
use assert_cmd::Command;
use benevoles::{
    model::{
        Dataset, Event, EventId, Role, Shift, ShiftId, Team, TeamId, UserId, Vendor, VendorId,
        Volunteer,
    },
    JsonStore, Store,
};
use chrono::{TimeZone, Utc};
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn seed(path: &Path) {
    let at = |hour| Utc.with_ymd_and_hms(2025, 6, 14, hour, 0, 0).unwrap();
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
    d.vendors.push(Vendor {
        id: VendorId(1),
        team_id: TeamId(2),
        name: "Dana".into(),
        role: None,
    });
    d.shifts.push(Shift {
        id: ShiftId(1),
        event_id: EventId(1),
        team_id: TeamId(1),
        name: "Registration Desk".into(),
        activity_id: None,
        location_id: None,
        colour: None,
        description: None,
    });
    d.volunteers.push(Volunteer {
        user_id: UserId(7),
        event_id: EventId(1),
        team_id: TeamId(1),
        name: "Alice".into(),
        role: Role {
            name: "Steward".into(),
            leadership: false,
        },
        avatar: None,
        phone: None,
        notes: None,
        availability_exceptions: Some(format!(
            r#"[{{"start":"{}","end":"{}","state":"unavailable"}}]"#,
            at(14).to_rfc3339(),
            at(16).to_rfc3339()
        )),
        unavailable_timeslots: Vec::new(),
        preference_window: None,
    });
    JsonStore::open(path).unwrap().save(&d).unwrap();
}

fn cli(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("benevoles-cli").unwrap();
    cmd.arg("--data").arg(data);
    cmd.arg("--settings").arg(data.with_file_name("settings.json"));
    cmd
}

fn writer(data: &Path) -> Command {
    let mut cmd = cli(data);
    cmd.args(["--grant", "schedule-write"]);
    cmd
}

const ASSIGN_10_12: [&str; 13] = [
    "assign",
    "--event",
    "1",
    "--shift",
    "1",
    "--user",
    "7",
    "--start",
    "2025-06-14T10:00:00Z",
    "--end",
    "2025-06-14T12:00:00Z",
    "--actor",
    "1",
];

#[test]
fn declined_assignment_exits_with_code_2() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);

    writer(&data)
        .args([
            "assign",
            "--event",
            "1",
            "--shift",
            "1",
            "--user",
            "7",
            "--start",
            "2025-06-14T15:00:00Z",
            "--end",
            "2025-06-14T17:00:00Z",
            "--actor",
            "1",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Cannot schedule a shift at that time for the volunteer",
        ));
}

#[test]
fn assign_then_show_log() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);

    writer(&data)
        .args([
            "assign",
            "--event",
            "1",
            "--shift",
            "1",
            "--user",
            "7",
            "--start",
            "2025-06-14T10:00:00Z",
            "--end",
            "2025-06-14T12:00:00Z",
            "--actor",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("scheduled shift 1 created"));

    cli(&data)
        .args(["log", "--event", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created a new shift for Alice"));

    let stored = JsonStore::open(&data).unwrap().load().unwrap();
    assert_eq!(stored.schedule.len(), 1);
}

#[test]
fn schedule_prints_json() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);

    cli(&data)
        .args(["schedule", "--event", "1", "--grant", "volunteer-private-info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"volunteers\""))
        .stdout(predicate::str::contains("\"Alice\""));

    cli(&data)
        .args(["schedule", "--event", "5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown event: 5"));
}

#[test]
fn assign_without_grant_is_refused() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);

    cli(&data)
        .args(ASSIGN_10_12)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing permission: schedule-write"));

    let stored = JsonStore::open(&data).unwrap().load().unwrap();
    assert!(stored.schedule.is_empty());
}

#[test]
fn check_shift_reports_fit_and_conflict() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);

    let check = |start: &str, end: &str| {
        let mut cmd = cli(&data);
        cmd.args([
            "check-shift",
            "--event",
            "1",
            "--user",
            "7",
            "--start",
            start,
            "--end",
            end,
        ]);
        cmd
    };

    check("2025-06-14T10:00:00Z", "2025-06-14T14:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
    check("2025-06-14T15:00:00Z", "2025-06-14T17:00:00Z")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot schedule"));
}

#[test]
fn update_and_remove_are_logged() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);

    writer(&data).args(ASSIGN_10_12).assert().success();
    writer(&data)
        .args([
            "update",
            "--id",
            "1",
            "--end",
            "2025-06-14T13:00:00Z",
            "--actor",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("scheduled shift 1 updated"));
    writer(&data)
        .args(["remove", "--id", "1", "--actor", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scheduled shift 1 removed"));

    cli(&data)
        .args(["log", "--event", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Changed the end time of a Registration Desk shift for Alice",
        ))
        .stdout(predicate::str::contains(
            "Removed a Registration Desk shift for Alice",
        ));

    let csv = dir.path().join("log.csv");
    cli(&data)
        .args(["log", "--event", "2", "--out-csv"])
        .arg(&csv)
        .assert()
        .success();
    let exported = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(exported.lines().count(), 1);

    let stored = JsonStore::open(&data).unwrap().load().unwrap();
    assert!(stored.schedule[0].deleted.is_some());
    assert_eq!(stored.mutation_log.len(), 3);
}

#[test]
fn reconcile_vendors_from_csv() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);
    let target = dir.path().join("target.csv");
    std::fs::write(
        &target,
        "id,vendor,start,end\n,1,2025-06-14T09:00:00Z,2025-06-14T11:00:00Z\n",
    )
    .unwrap();

    writer(&data)
        .args(["reconcile-vendors", "--team", "2", "--resources", "1", "--actor", "1"])
        .arg("--csv")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("inserted 1 | updated 0 | removed 0"));

    writer(&data)
        .args(["reconcile-vendors", "--team", "1", "--resources", "1", "--actor", "1"])
        .arg("--csv")
        .arg(&target)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown team: 1"));

    let stored = JsonStore::open(&data).unwrap().load().unwrap();
    assert_eq!(stored.vendor_schedule.len(), 1);
}

#[test]
fn favourite_toggles() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("dataset.json");
    seed(&data);
    let toggle = || {
        let mut cmd = cli(&data);
        cmd.args(["favourite", "--event", "1", "--user", "7", "--activity", "10"]);
        cmd
    };

    toggle().assert().success().stdout(predicate::str::contains("added"));
    assert_eq!(JsonStore::open(&data).unwrap().load().unwrap().favourites.len(), 1);
    toggle().assert().success().stdout(predicate::str::contains("removed"));
    assert!(JsonStore::open(&data).unwrap().load().unwrap().favourites.is_empty());
}
