use crate::model::{Dataset, EventId, VendorId, VendorScheduleId};
use crate::mutation_log::{format_mutation, MutationView};
use crate::schedule::AggregatedSchedule;
use crate::scheduler::VendorScheduleTarget;
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'un planning cible de prestataires : header `id,vendor,start,end`
/// (RFC3339 UTC). Un `id` vide ou `0` désigne une nouvelle entrée.
pub fn import_vendor_schedule_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Vec<VendorScheduleTarget>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = line + 2;
        let id = rec.get(0).context("missing id")?.trim();
        let vendor = rec.get(1).context("missing vendor")?.trim();
        let start = rec.get(2).context("missing start")?.trim();
        let end = rec.get(3).context("missing end")?.trim();

        let id = if id.is_empty() {
            VendorScheduleId::UNSAVED
        } else {
            VendorScheduleId(id.parse().with_context(|| format!("invalid id on row {row}"))?)
        };
        let vendor_id = VendorId(
            vendor
                .parse()
                .with_context(|| format!("invalid vendor on row {row}"))?,
        );
        let start: DateTime<Utc> = start
            .parse()
            .with_context(|| format!("start RFC3339 on row {row}"))?;
        let end: DateTime<Utc> = end
            .parse()
            .with_context(|| format!("end RFC3339 on row {row}"))?;
        if end <= start {
            bail!("row {row}: end must be after start");
        }
        out.push(VendorScheduleTarget {
            id,
            vendor_id,
            start,
            end,
        });
    }
    Ok(out)
}

/// Export JSON du planning agrégé (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(
    path: P,
    schedule: &AggregatedSchedule,
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du journal : header `id,timestamp,actor,schedule_id,description`,
/// limité à un événement si `event` est donné.
pub fn export_mutation_log_csv<P: AsRef<Path>>(
    path: P,
    dataset: &Dataset,
    event: Option<EventId>,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "timestamp", "actor", "schedule_id", "description"])?;
    for entry in dataset
        .mutation_log
        .iter()
        .filter(|e| event.map_or(true, |id| e.event_id == id))
    {
        let description = format_mutation(&MutationView::describe(entry, dataset));
        w.write_record([
            entry.id.to_string(),
            entry.timestamp.to_rfc3339(),
            entry.actor.to_string(),
            entry.schedule_id.to_string(),
            description,
        ])?;
    }
    w.flush()?;
    Ok(())
}
