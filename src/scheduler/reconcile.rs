use super::{util, ReconcileReport, SchedError, VendorScheduleTarget};
use crate::interval::ShiftInterval;
use crate::model::{Dataset, TeamId, VendorId, VendorScheduleEntry, VendorScheduleId};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::debug;

/// Aligne le planning persisté des prestataires `resources` sur `target`.
///
/// Seuls les prestataires listés sont concernés : une entrée cible pour un
/// autre prestataire est ignorée, et aucun prestataire absent de la liste
/// n'est modifié. Les lignes inchangées gardent leur identifiant. Un
/// prestataire listé plusieurs fois n'est traité qu'une fois.
pub(super) fn reconcile_vendor_schedule(
    dataset: &mut Dataset,
    team: TeamId,
    resources: &[VendorId],
    target: &[VendorScheduleTarget],
    now: DateTime<Utc>,
) -> Result<ReconcileReport, SchedError> {
    if !dataset.find_team(team).is_some_and(|t| t.vendor_team) {
        return Err(SchedError::UnknownTeam(team));
    }

    let resources: IndexSet<VendorId> = resources.iter().copied().collect();
    let mut report = ReconcileReport::default();

    for vendor in resources {
        if dataset.find_vendor(vendor).map(|v| v.team_id) != Some(team) {
            return Err(SchedError::UnknownVendor { team, vendor });
        }

        let known: Vec<(VendorScheduleId, ShiftInterval)> = dataset
            .vendor_schedule
            .iter()
            .filter(|e| e.vendor_id == vendor && !e.is_deleted())
            .map(|e| (e.id, e.interval()))
            .collect();
        let mut seen: HashSet<VendorScheduleId> = HashSet::new();

        for entry in target.iter().filter(|e| e.vendor_id == vendor) {
            util::require_range(entry.start, entry.end)?;

            let existing = if entry.id.is_unsaved() {
                None
            } else {
                known.iter().find(|(id, _)| *id == entry.id)
            };

            match existing {
                None => {
                    let id = dataset.next_vendor_schedule_id();
                    dataset.vendor_schedule.push(VendorScheduleEntry {
                        id,
                        vendor_id: vendor,
                        start: entry.start,
                        end: entry.end,
                        created: now,
                        updated: now,
                        deleted: None,
                    });
                    debug!(vendor = %vendor, entry = %id, "vendor shift inserted");
                    report.inserted.push(id);
                }
                Some((id, current)) => {
                    if current.start != entry.start || current.end != entry.end {
                        if let Some(row) = dataset.find_vendor_entry_mut(*id) {
                            row.start = entry.start;
                            row.end = entry.end;
                            row.updated = now;
                        }
                        debug!(vendor = %vendor, entry = %id, "vendor shift updated");
                        report.updated.push(*id);
                    }
                    seen.insert(*id);
                }
            }
        }

        for (id, _) in known.iter().filter(|(id, _)| !seen.contains(id)) {
            if let Some(row) = dataset.find_vendor_entry_mut(*id) {
                row.deleted = Some(now);
                row.updated = now;
            }
            debug!(vendor = %vendor, entry = %id, "vendor shift removed");
            report.deleted.push(*id);
        }
    }

    Ok(report)
}
