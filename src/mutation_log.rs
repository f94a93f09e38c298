//! Phrases lisibles pour le journal des modifications du planning.

use crate::model::{Dataset, MutationKind, MutationLogEntry, ShiftId, UserId};
use chrono::{DateTime, Utc};

/// Paires avant/après d'une modification. Seules les paires qui ont
/// réellement changé sont renseignées.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationView {
    pub mutation: MutationKind,
    pub shift: Option<String>,
    pub user: Option<String>,
    pub before_shift: Option<String>,
    pub after_shift: Option<String>,
    pub before_user: Option<String>,
    pub after_user: Option<String>,
    pub before_start: Option<DateTime<Utc>>,
    pub after_start: Option<DateTime<Utc>>,
    pub before_end: Option<DateTime<Utc>>,
    pub after_end: Option<DateTime<Utc>>,
}

impl MutationView {
    pub fn new(mutation: MutationKind) -> Self {
        Self {
            mutation,
            shift: None,
            user: None,
            before_shift: None,
            after_shift: None,
            before_user: None,
            after_user: None,
            before_start: None,
            after_start: None,
            before_end: None,
            after_end: None,
        }
    }

    /// Construit la vue d'une entrée du journal, noms résolus via `dataset`.
    pub fn describe(entry: &MutationLogEntry, dataset: &Dataset) -> Self {
        let shift_name = |id: ShiftId| dataset.find_shift(id).map(|s| s.name.clone());
        let user_name = |id: UserId| {
            Some(
                dataset
                    .find_volunteer(entry.event_id, id)
                    .map(|v| v.name.clone())
                    .unwrap_or_else(|| format!("volunteer #{id}")),
            )
        };

        let mut view = Self::new(entry.kind);
        if let Some(current) = entry.after.or(entry.before) {
            view.shift = shift_name(current.shift_id);
            view.user = user_name(current.user_id);
        }

        if let (MutationKind::Updated, Some(before), Some(after)) =
            (entry.kind, entry.before, entry.after)
        {
            if before.shift_id != after.shift_id {
                view.before_shift = shift_name(before.shift_id);
                view.after_shift = shift_name(after.shift_id);
            }
            if before.user_id != after.user_id {
                view.before_user = user_name(before.user_id);
                view.after_user = user_name(after.user_id);
            }
            if before.start != after.start {
                view.before_start = Some(before.start);
                view.after_start = Some(after.start);
            }
            if before.end != after.end {
                view.before_end = Some(before.end);
                view.after_end = Some(after.end);
            }
        }
        view
    }
}

/// Rendu d'une modification. Pour une mise à jour, la première catégorie
/// applicable l'emporte : type de shift, bénévole, début et fin, début, fin.
pub fn format_mutation(view: &MutationView) -> String {
    let shift = match view.shift.as_deref() {
        Some(name) => format!("{name} shift"),
        None => "shift".to_string(),
    };
    let user = view.user.as_deref().unwrap_or("a volunteer");

    match view.mutation {
        MutationKind::Created => format!("Created a new shift for {user}"),
        MutationKind::Deleted => format!("Removed a {shift} for {user}"),
        MutationKind::Updated => {
            if let (Some(before), Some(after)) = (&view.before_shift, &view.after_shift) {
                return format!("Changed a shift for {user} from {before} to {after}");
            }
            if let (Some(before), Some(after)) = (&view.before_user, &view.after_user) {
                return format!("Moved a {shift} from {before} to {after}");
            }
            match (
                view.before_start,
                view.after_start,
                view.before_end,
                view.after_end,
            ) {
                (Some(bs), Some(a_s), Some(be), Some(ae)) => format!(
                    "Moved a {shift} for {user} from {}–{} to {}–{}",
                    time(bs),
                    time(be),
                    time(a_s),
                    time(ae)
                ),
                (Some(bs), Some(a_s), _, _) => format!(
                    "Changed the start time of a {shift} for {user} from {} to {}",
                    time(bs),
                    time(a_s)
                ),
                (_, _, Some(be), Some(ae)) => format!(
                    "Changed the end time of a {shift} for {user} from {} to {}",
                    time(be),
                    time(ae)
                ),
                _ => "Unknown mutation".to_string(),
            }
        }
    }
}

fn time(at: DateTime<Utc>) -> String {
    at.format("%a %H:%M").to_string()
}
