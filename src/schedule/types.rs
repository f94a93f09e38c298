use serde::Serialize;
use std::collections::BTreeMap;

/// Vue dénormalisée du planning pour l'application cliente. Les maps sont
/// indexées par identifiant numérique sous forme de chaîne ; les instants sont
/// des timestamps unix.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedSchedule {
    pub meta: ScheduleMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<BTreeMap<String, KnowledgeCategoryView>>,
    pub areas: BTreeMap<String, AreaView>,
    pub locations: BTreeMap<String, LocationView>,
    pub activities: BTreeMap<String, ActivityView>,
    pub timeslots: BTreeMap<String, TimeslotView>,
    pub shifts: BTreeMap<String, ShiftView>,
    pub schedule: BTreeMap<String, ScheduleEntryView>,
    pub volunteers: BTreeMap<String, VolunteerView>,
    pub vendors: BTreeMap<String, VendorTeamView>,
    pub favourites: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleMeta {
    pub now: i64,
    pub day_view_start: u8,
    pub event_view_hours: u32,
    pub active_volunteers: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_help_requests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<AdviceView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceView {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KnowledgeCategoryView {
    pub questions: Vec<KnowledgeQuestionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeQuestionView {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub active: u32,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub id: String,
    pub name: String,
    pub area: String,
    pub active: u32,
    pub timeslots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Activité synthétique d'un shift interne.
    pub internal: bool,
    pub timeslots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeslotView {
    pub id: String,
    pub activity: String,
    pub location: String,
    pub start: i64,
    pub end: i64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftView {
    pub id: String,
    pub name: String,
    pub team: String,
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntryView {
    pub id: String,
    pub shift: String,
    pub volunteer: String,
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolunteerView {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `-1` : ne revient pas ; absent : disponible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_until: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_shift: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorTeamView {
    pub id: String,
    pub name: String,
    /// Noms des prestataires en poste maintenant.
    pub active: Vec<String>,
    /// Plannings détaillés, réservés aux visiteurs autorisés.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BTreeMap<String, VendorView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub shifts: Vec<VendorShiftView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorShiftView {
    pub start: i64,
    pub end: i64,
}
