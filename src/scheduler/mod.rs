mod mutate;
mod reconcile;
mod types;
mod util;
pub mod validity;

pub use types::{
    NewScheduledShift, ReconcileReport, SchedError, ScheduleUpdate, VendorScheduleTarget,
};
pub use validity::{interval_is_free, is_valid_shift};

use crate::access::ViewerContext;
use crate::interval::ShiftInterval;
use crate::model::{EventId, ScheduleId, TeamId, UserId, VendorId};
use crate::settings::Settings;
use crate::storage::{transaction, Store};
use chrono::{DateTime, Utc};

/// Scheduler : opérations sur le planning, chacune dans une transaction.
pub struct Scheduler<S> {
    store: S,
    settings: Settings,
}

impl<S: Store> Scheduler<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Le shift proposé est-il compatible avec les disponibilités du bénévole ?
    pub fn is_valid_shift(
        &self,
        event: EventId,
        user: UserId,
        shift: &ShiftInterval,
        ignore_schedule_id: Option<ScheduleId>,
    ) -> Result<bool, SchedError> {
        let dataset = self.store.load()?;
        let event = util::require_event(&dataset, event)?;
        let volunteer = util::require_volunteer(&dataset, event.id, user)?;
        Ok(validity::is_valid_shift(
            &dataset,
            &self.settings,
            event,
            volunteer,
            shift,
            ignore_schedule_id,
        ))
    }

    /// Les modifications exigent [`Permission::ScheduleWrite`](crate::Permission)
    /// et un auteur identifié.
    pub fn create_scheduled_shift(
        &self,
        request: NewScheduledShift,
        actor: &ViewerContext,
        now: DateTime<Utc>,
    ) -> Result<ScheduleId, SchedError> {
        let actor = util::authorize(actor)?;
        transaction(&self.store, |d| {
            mutate::create(d, &self.settings, request, actor, now)
        })
    }

    pub fn update_scheduled_shift(
        &self,
        id: ScheduleId,
        update: ScheduleUpdate,
        actor: &ViewerContext,
        now: DateTime<Utc>,
    ) -> Result<bool, SchedError> {
        let actor = util::authorize(actor)?;
        transaction(&self.store, |d| {
            mutate::update(d, &self.settings, id, update, actor, now)
        })
    }

    pub fn delete_scheduled_shift(
        &self,
        id: ScheduleId,
        actor: &ViewerContext,
        now: DateTime<Utc>,
    ) -> Result<(), SchedError> {
        let actor = util::authorize(actor)?;
        transaction(&self.store, |d| mutate::delete(d, id, actor, now))
    }

    /// Réconciliation du planning des prestataires, tout ou rien.
    pub fn reconcile_vendor_schedule(
        &self,
        team: TeamId,
        resources: &[VendorId],
        target: &[VendorScheduleTarget],
        actor: &ViewerContext,
        now: DateTime<Utc>,
    ) -> Result<ReconcileReport, SchedError> {
        util::authorize(actor)?;
        transaction(&self.store, |d| {
            reconcile::reconcile_vendor_schedule(d, team, resources, target, now)
        })
    }
}
