use crate::model::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Droits consultés par le planning public et par les modifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// Plannings détaillés des prestataires.
    VendorCalendars,
    /// Téléphone et notes des bénévoles.
    VolunteerPrivateInfo,
    /// Nombre de demandes d'aide en attente.
    HelpRequests,
    /// Affectations, modifications et réconciliations du planning.
    ScheduleWrite,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VendorCalendars => "vendor-calendars",
            Self::VolunteerPrivateInfo => "volunteer-private-info",
            Self::HelpRequests => "help-requests",
            Self::ScheduleWrite => "schedule-write",
        })
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vendor-calendars" => Ok(Self::VendorCalendars),
            "volunteer-private-info" => Ok(Self::VolunteerPrivateInfo),
            "help-requests" => Ok(Self::HelpRequests),
            "schedule-write" => Ok(Self::ScheduleWrite),
            other => Err(format!("unknown permission: {other}")),
        }
    }
}

/// Façade de contrôle d'accès.
pub trait AccessCheck {
    fn can(&self, permission: Permission) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grants(BTreeSet<Permission>);

impl Grants {
    pub fn none() -> Self {
        Self::default()
    }
}

impl FromIterator<Permission> for Grants {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AccessCheck for Grants {
    fn can(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }
}

/// Personne qui consulte le planning.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    pub user_id: Option<UserId>,
    pub grants: Grants,
}

impl ViewerContext {
    pub fn new(user_id: Option<UserId>, grants: Grants) -> Self {
        Self { user_id, grants }
    }
}

impl AccessCheck for ViewerContext {
    fn can(&self, permission: Permission) -> bool {
        self.grants.can(permission)
    }
}
