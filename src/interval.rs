use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intervalle de travail UTC `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShiftInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ShiftInterval {
    /// Crée un intervalle en validant que `end > start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if end <= start {
            return Err("end must be strictly after start".to_string());
        }
        Ok(Self { start, end })
    }

    /// Chevauchement strict : deux intervalles qui se touchent ne se chevauchent pas.
    pub fn overlaps(&self, other: &ShiftInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Vrai si `at` tombe strictement à l'intérieur (`start < at < end`).
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start < at && at < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Ensemble d'intervalles triés, disjoints et fusionnés.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: Vec<ShiftInterval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute la couverture de `interval`, en fusionnant avec les voisins.
    pub fn insert(&mut self, interval: ShiftInterval) {
        self.intervals.push(interval);
        self.intervals = merge_overlapping(std::mem::take(&mut self.intervals));
    }

    /// Retire la couverture de `interval`, en découpant les intervalles concernés.
    pub fn remove(&mut self, interval: ShiftInterval) {
        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        for current in self.intervals.drain(..) {
            if !current.overlaps(&interval) {
                out.push(current);
                continue;
            }
            if current.start < interval.start {
                out.push(ShiftInterval {
                    start: current.start,
                    end: interval.start,
                });
            }
            if interval.end < current.end {
                out.push(ShiftInterval {
                    start: interval.end,
                    end: current.end,
                });
            }
        }
        self.intervals = out;
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShiftInterval> {
        self.intervals.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn into_vec(self) -> Vec<ShiftInterval> {
        self.intervals
    }
}

impl FromIterator<ShiftInterval> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = ShiftInterval>>(iter: I) -> Self {
        Self {
            intervals: merge_overlapping(iter.into_iter().collect()),
        }
    }
}

/// Balayage : tri par `(start, end)` puis fusion de tout intervalle dont le
/// début est `<=` la fin de l'intervalle courant.
pub fn merge_overlapping(mut intervals: Vec<ShiftInterval>) -> Vec<ShiftInterval> {
    intervals.sort();

    let mut merged: Vec<ShiftInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(current) if interval.start <= current.end => {
                current.end = current.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}
