//! Agrégation du planning public.
//!
//! Une passe sans état par requête : chaque étape remplit sa partie de
//! [`AggregatedSchedule`] à partir des lignes déjà chargées. Tous les calculs
//! « en cours » utilisent l'heure décalée par les réglages, jamais l'heure
//! système brute.

mod metadata;
mod program;
mod types;
mod vendors;
mod volunteers;

pub use metadata::{advice_seed, AdvicePicker, SeededAdvicePicker};
pub use types::*;

use crate::access::ViewerContext;
use crate::favourites::{favourites_for, FavouriteCache};
use crate::model::{Dataset, EventId};
use crate::scheduler::SchedError;
use crate::settings::Settings;
use chrono::{DateTime, Utc};

/// Début de la plage d'identifiants synthétiques des shifts internes.
pub const INTERNAL_ID_OFFSET: u64 = 1_000_000;

pub struct ScheduleAggregator<'a> {
    dataset: &'a Dataset,
    settings: &'a Settings,
    picker: &'a dyn AdvicePicker,
    favourites: &'a dyn FavouriteCache,
}

impl<'a> ScheduleAggregator<'a> {
    pub fn new(
        dataset: &'a Dataset,
        settings: &'a Settings,
        picker: &'a dyn AdvicePicker,
        favourites: &'a dyn FavouriteCache,
    ) -> Self {
        Self {
            dataset,
            settings,
            picker,
            favourites,
        }
    }

    /// `wall_clock` est l'heure système ; le décalage des réglages y est appliqué.
    pub fn build(
        &self,
        event: EventId,
        viewer: &ViewerContext,
        wall_clock: DateTime<Utc>,
    ) -> Result<AggregatedSchedule, SchedError> {
        let event = self
            .dataset
            .find_event(event)
            .ok_or(SchedError::UnknownEvent(event))?;
        let now = self.settings.current_time(wall_clock)?;

        let mut out = AggregatedSchedule::default();
        if self.settings.knowledge_base_enabled {
            metadata::populate_knowledge(&mut out, self.dataset, event);
        }
        metadata::populate_meta(
            &mut out,
            self.dataset,
            self.settings,
            event,
            viewer,
            self.picker,
            now,
        );
        program::populate_program(&mut out, self.dataset, event, now);
        vendors::populate_vendors(&mut out, self.dataset, event, viewer, now);
        volunteers::populate_volunteers(&mut out, self.dataset, self.settings, event, viewer, now);
        volunteers::populate_schedule(&mut out, self.dataset, event, now);

        if let Some(user) = viewer.user_id {
            out.favourites = favourites_for(self.dataset, self.favourites, user, event.id)
                .into_iter()
                .map(|id| id.as_key())
                .collect();
        }

        Ok(out)
    }
}
