use crate::model::PreferenceWindow;
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Réglages de l'application (clé/valeur), tous optionnels dans le fichier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Heure de début de la vue « journée » du planning.
    pub schedule_day_view_start: u8,
    /// Nombre d'heures affichées dans la vue « événement ».
    pub schedule_event_view_hours: u32,
    /// Fenêtre de rotation du conseil affiché, en secondes.
    pub advice_window_seconds: u64,
    pub knowledge_base_enabled: bool,
    pub help_requests_visible: bool,
    /// Décalage appliqué à l'heure courante (tests, démos).
    pub time_offset_seconds: i64,
    pub favourites_cache_capacity: usize,
    /// Heures de travail de l'événement ; en dehors, les bénévoles sont
    /// indisponibles par défaut.
    pub availability_window: Option<PreferenceWindow>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schedule_day_view_start: 8,
            schedule_event_view_hours: 24,
            advice_window_seconds: 300,
            knowledge_base_enabled: true,
            help_requests_visible: true,
            time_offset_seconds: 0,
            favourites_cache_capacity: 512,
            availability_window: None,
        }
    }
}

impl Settings {
    /// Charge les réglages ; un fichier absent donne les valeurs par défaut.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_json::from_slice(&data)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        settings
            .time_offset()
            .with_context(|| format!("invalid settings {}", path.display()))?;
        Ok(settings)
    }

    /// Valeurs JSON des clés demandées ; les clés inconnues sont ignorées.
    pub fn read_settings(&self, keys: &[&str]) -> anyhow::Result<BTreeMap<String, serde_json::Value>> {
        let serde_json::Value::Object(all) = serde_json::to_value(self)? else {
            anyhow::bail!("settings did not serialize to an object");
        };
        Ok(keys
            .iter()
            .filter_map(|key| all.get(*key).map(|v| ((*key).to_string(), v.clone())))
            .collect())
    }

    fn time_offset(&self) -> anyhow::Result<Duration> {
        Duration::try_seconds(self.time_offset_seconds).with_context(|| {
            format!("time_offset_seconds out of range: {}", self.time_offset_seconds)
        })
    }

    /// Heure de référence pour tous les calculs « en cours ».
    pub fn current_time(&self, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
        let offset = self.time_offset()?;
        now.checked_add_signed(offset)
            .with_context(|| format!("{now} shifted by {offset} is out of range"))
    }
}
