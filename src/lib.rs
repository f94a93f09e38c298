#![forbid(unsafe_code)]
//! Benevoles : cœur de planification des bénévoles d'un événement.
//!
//! - Disponibilités : créneaux indisponibles, exceptions, préférences.
//! - Validité d'un shift proposé pour un bénévole.
//! - Réconciliation transactionnelle des plannings prestataires.
//! - Journal des modifications en phrases lisibles.
//! - Agrégation du planning public pour l'application cliente.
//! - Tout en UTC ; parsing RFC3339 ; affichage local en dehors de la lib.

pub mod access;
pub mod availability;
pub mod favourites;
pub mod interval;
pub mod io;
pub mod model;
pub mod mutation_log;
pub mod schedule;
pub mod scheduler;
pub mod settings;
pub mod storage;

pub use access::{AccessCheck, Grants, Permission, ViewerContext};
pub use availability::{
    compute_unavailable_intervals, Availability, AvailabilityException, AvailabilityExceptions,
    AvailabilityOptions, ExceptionState, UnavailableIntervals,
};
pub use favourites::{
    favourites_for, toggle_favourite, FavouriteCache, LruFavouriteCache, NoopFavouriteCache,
};
pub use interval::{merge_overlapping, IntervalSet, ShiftInterval};
pub use model::{Dataset, Event, MutationKind, MutationLogEntry, ScheduledShift, Volunteer};
pub use mutation_log::{format_mutation, MutationView};
pub use schedule::{AdvicePicker, AggregatedSchedule, ScheduleAggregator, SeededAdvicePicker};
pub use scheduler::{
    NewScheduledShift, ReconcileReport, SchedError, ScheduleUpdate, Scheduler,
    VendorScheduleTarget,
};
pub use settings::Settings;
pub use storage::{JsonStore, MemoryStore, Store};
