use super::types::{AggregatedSchedule, VendorShiftView, VendorTeamView, VendorView};
use crate::access::{AccessCheck, Permission};
use crate::model::{Dataset, Event};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Équipes de prestataires. Les visiteurs autorisés voient toutes les
/// équipes et leurs plannings ; les autres seulement les équipes dont la
/// carte est affichée, avec la liste des prestataires en poste.
pub(super) fn populate_vendors(
    out: &mut AggregatedSchedule,
    dataset: &Dataset,
    event: &Event,
    viewer: &dyn AccessCheck,
    now: DateTime<Utc>,
) {
    let privileged = viewer.can(Permission::VendorCalendars);

    for team in dataset
        .teams
        .iter()
        .filter(|t| t.event_id == event.id && t.vendor_team)
    {
        if !team.show_card && !privileged {
            continue;
        }

        let mut active = Vec::new();
        let mut calendars = BTreeMap::new();

        for vendor in dataset.vendors.iter().filter(|v| v.team_id == team.id) {
            let mut shifts: Vec<_> = dataset
                .vendor_schedule
                .iter()
                .filter(|e| e.vendor_id == vendor.id && !e.is_deleted())
                .map(|e| e.interval())
                .collect();
            shifts.sort();

            if shifts.iter().any(|s| s.is_active_at(now)) {
                active.push(vendor.name.clone());
            }
            if privileged {
                let key = vendor.id.as_key();
                calendars.insert(
                    key.clone(),
                    VendorView {
                        id: key,
                        name: vendor.name.clone(),
                        role: vendor.role.clone(),
                        shifts: shifts
                            .iter()
                            .map(|s| VendorShiftView {
                                start: s.start.timestamp(),
                                end: s.end.timestamp(),
                            })
                            .collect(),
                    },
                );
            }
        }
        active.sort();

        let key = team.id.as_key();
        out.vendors.insert(
            key.clone(),
            VendorTeamView {
                id: key,
                name: team.name.clone(),
                active,
                schedule: privileged.then_some(calendars),
            },
        );
    }
}
