use super::types::{AdviceView, AggregatedSchedule, KnowledgeCategoryView, KnowledgeQuestionView};
use crate::access::{AccessCheck, Permission};
use crate::model::{Dataset, Event};
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Choix du conseil affiché à partir d'une graine.
pub trait AdvicePicker {
    /// Index dans `[0, len)`, `len > 0`.
    fn pick(&self, seed: u64, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SeededAdvicePicker;

impl AdvicePicker for SeededAdvicePicker {
    fn pick(&self, seed: u64, len: usize) -> usize {
        StdRng::seed_from_u64(seed).gen_range(0..len)
    }
}

/// `round(now / window) * window` : tous les visiteurs d'une même fenêtre
/// partagent la même graine.
pub fn advice_seed(now: DateTime<Utc>, window_seconds: u64) -> u64 {
    let window = i64::try_from(window_seconds.max(1)).unwrap_or(i64::MAX);
    let bucket = (now.timestamp() + window / 2).div_euclid(window);
    bucket.saturating_mul(window) as u64
}

pub(super) fn populate_knowledge(out: &mut AggregatedSchedule, dataset: &Dataset, event: &Event) {
    let mut categories: BTreeMap<String, KnowledgeCategoryView> = BTreeMap::new();
    for question in dataset.knowledge.iter().filter(|q| q.event_id == event.id) {
        categories
            .entry(question.category.clone())
            .or_default()
            .questions
            .push(KnowledgeQuestionView {
                question: question.question.clone(),
                answer: question.answer.clone(),
            });
    }
    out.knowledge = Some(categories);
}

pub(super) fn populate_meta(
    out: &mut AggregatedSchedule,
    dataset: &Dataset,
    settings: &Settings,
    event: &Event,
    viewer: &dyn AccessCheck,
    picker: &dyn AdvicePicker,
    now: DateTime<Utc>,
) {
    out.meta.now = now.timestamp();
    out.meta.day_view_start = settings.schedule_day_view_start;
    out.meta.event_view_hours = settings.schedule_event_view_hours;

    if settings.help_requests_visible && viewer.can(Permission::HelpRequests) {
        let pending = dataset
            .help_requests
            .iter()
            .filter(|r| r.event_id == event.id && r.is_pending())
            .count();
        out.meta.pending_help_requests = Some(u32::try_from(pending).unwrap_or(u32::MAX));
    }

    if !dataset.advice.is_empty() {
        let seed = advice_seed(now, settings.advice_window_seconds);
        let index = picker.pick(seed, dataset.advice.len()) % dataset.advice.len();
        let advice = &dataset.advice[index];
        out.meta.advice = Some(AdviceView {
            title: advice.title.clone(),
            text: advice.text.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn seed_is_stable_within_a_bucket() {
        let a = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 10).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 6, 14, 12, 2, 0).unwrap();
        let c = Utc.with_ymd_and_hms(2025, 6, 14, 12, 3, 0).unwrap();
        assert_eq!(advice_seed(a, 300), advice_seed(b, 300));
        assert_ne!(advice_seed(a, 300), advice_seed(c, 300));
        assert_eq!(advice_seed(a, 300) % 300, 0);
    }

    #[test]
    fn seeded_picker_is_deterministic() {
        let picker = SeededAdvicePicker;
        let first = picker.pick(1_749_902_400, 7);
        assert!(first < 7);
        assert_eq!(picker.pick(1_749_902_400, 7), first);
    }
}
