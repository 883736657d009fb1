use serde::{Deserialize, Serialize};

use super::wire_enum;

wire_enum! {
    MaintenanceStatus ("maintenance status") {
        Active => "active", "En Progreso",
        Scheduled => "scheduled", "Programado",
        Completed => "completed", "Completado",
        Delayed => "delayed", "Retrasado",
    }
}

impl Default for MaintenanceStatus {
    fn default() -> Self {
        MaintenanceStatus::Scheduled
    }
}

/// A scheduled or performed maintenance visit. `client` and `asset` are
/// display names, not references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: String,
    pub title: String,
    pub client: String,
    pub asset: String,
    pub date: String,
    pub status: MaintenanceStatus,
    pub technician: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaintenanceDraft {
    pub title: String,
    pub client: String,
    pub asset: String,
    pub date: String,
    pub status: MaintenanceStatus,
    pub technician: String,
    pub kind: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaintenancePatch {
    pub title: Option<String>,
    pub client: Option<String>,
    pub asset: Option<String>,
    pub date: Option<String>,
    pub status: Option<MaintenanceStatus>,
    pub technician: Option<String>,
    pub kind: Option<String>,
    pub notes: Option<String>,
}

impl MaintenancePatch {
    pub fn status(status: MaintenanceStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
