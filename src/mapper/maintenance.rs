use serde::{Deserialize, Serialize};

use super::{string_or_number, EntityMessages, FieldMapper};
use crate::error::MapError;
use crate::models::{Maintenance, MaintenanceDraft, MaintenancePatch, MaintenanceStatus};

/// Row of the `maintenances` table as read back
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub client: Option<String>,
    pub asset: Option<String>,
    pub date: Option<String>,
    pub status: String,
    pub technician: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceNewRow {
    pub title: String,
    pub client: String,
    pub asset: String,
    pub date: String,
    pub status: String,
    pub technician: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaintenanceRowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub struct MaintenanceMapper;

impl FieldMapper for MaintenanceMapper {
    type Entity = Maintenance;
    type Draft = MaintenanceDraft;
    type Patch = MaintenancePatch;
    type Row = MaintenanceRow;
    type NewRow = MaintenanceNewRow;
    type RowPatch = MaintenanceRowPatch;

    const TABLE: &'static str = "maintenances";
    const CACHE_KEY: &'static str = "maintenances";
    const MESSAGES: EntityMessages = EntityMessages {
        created: ("Mantenimiento registrado", "El mantenimiento ha sido registrado exitosamente."),
        create_failed: "No se pudo registrar el mantenimiento. Por favor, intenta nuevamente.",
        updated: ("Mantenimiento actualizado", "El mantenimiento ha sido actualizado exitosamente."),
        update_failed: "No se pudo actualizar el mantenimiento. Por favor, intenta nuevamente.",
        deleted: ("Mantenimiento eliminado", "El mantenimiento ha sido eliminado exitosamente."),
        delete_failed: "No se pudo eliminar el mantenimiento. Por favor, intenta nuevamente.",
    };

    fn to_new_row(draft: &MaintenanceDraft) -> MaintenanceNewRow {
        MaintenanceNewRow {
            title: draft.title.clone(),
            client: draft.client.clone(),
            asset: draft.asset.clone(),
            date: draft.date.clone(),
            status: draft.status.as_str().to_string(),
            technician: draft.technician.clone(),
            kind: draft.kind.clone(),
            notes: draft.notes.clone(),
        }
    }

    fn to_row_patch(patch: &MaintenancePatch) -> MaintenanceRowPatch {
        MaintenanceRowPatch {
            title: patch.title.clone(),
            client: patch.client.clone(),
            asset: patch.asset.clone(),
            date: patch.date.clone(),
            status: patch.status.as_ref().map(|s| s.as_str().to_string()),
            technician: patch.technician.clone(),
            kind: patch.kind.clone(),
            notes: patch.notes.clone(),
        }
    }

    fn from_row(row: MaintenanceRow) -> Result<Maintenance, MapError> {
        Ok(Maintenance {
            id: row.id,
            title: row.title,
            client: row.client.unwrap_or_default(),
            asset: row.asset.unwrap_or_default(),
            date: row.date.unwrap_or_default(),
            status: MaintenanceStatus::from_stored(&row.status),
            technician: row.technician.unwrap_or_default(),
            kind: row.kind,
            notes: row.notes,
        })
    }

    fn entity_id(maintenance: &Maintenance) -> &str {
        &maintenance.id
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn kind_is_stored_as_type() {
        let draft = MaintenanceDraft {
            title: "Revisión trimestral".into(),
            kind: Some("preventivo".into()),
            ..Default::default()
        };
        let row = serde_json::to_value(MaintenanceMapper::to_new_row(&draft)).unwrap();
        assert_eq!(row["type"], "preventivo");
        assert_eq!(row["status"], "scheduled");
        assert!(row.get("kind").is_none());
    }

    #[test]
    fn status_patch_sends_one_key() {
        let patch = MaintenancePatch::status(MaintenanceStatus::Completed);
        let value = serde_json::to_value(MaintenanceMapper::to_row_patch(&patch)).unwrap();
        assert_eq!(value, json!({ "status": "completed" }));
    }

    #[test]
    fn draft_round_trips_through_a_stored_row() {
        let draft = MaintenanceDraft {
            title: "Revisión de compresor".into(),
            client: "Mariscos Sur".into(),
            asset: "CON-005".into(),
            date: "2024-08-12".into(),
            status: MaintenanceStatus::Delayed,
            technician: "Ana Ruiz".into(),
            kind: Some("preventivo".into()),
            notes: Some("Pendiente de repuesto".into()),
        };
        let mut stored = serde_json::to_value(MaintenanceMapper::to_new_row(&draft)).unwrap();
        stored["id"] = json!("c41d");
        let row: MaintenanceRow = serde_json::from_value(stored).unwrap();

        let expected = Maintenance {
            id: "c41d".into(),
            title: draft.title,
            client: draft.client,
            asset: draft.asset,
            date: draft.date,
            status: draft.status,
            technician: draft.technician,
            kind: draft.kind,
            notes: draft.notes,
        };
        assert_eq!(MaintenanceMapper::from_row(row).unwrap(), expected);
    }

    #[test]
    fn row_maps_back() {
        let row: MaintenanceRow = serde_json::from_value(json!({
            "id": "b8a2",
            "title": "Cambio de filtro",
            "client": "Pescados Norte",
            "asset": "CON-002",
            "date": "2024-05-10",
            "status": "delayed",
            "technician": "Luis",
            "type": "correctivo",
            "notes": null
        }))
        .unwrap();
        let maintenance = MaintenanceMapper::from_row(row).unwrap();
        assert_eq!(maintenance.status, MaintenanceStatus::Delayed);
        assert_eq!(maintenance.kind.as_deref(), Some("correctivo"));
        assert_eq!(maintenance.notes, None);
    }
}
