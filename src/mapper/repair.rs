use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{string_or_number, EntityMessages, FieldMapper, IdKind};
use crate::error::MapError;
use crate::models::{Repair, RepairDraft, RepairPatch, RepairPriority, RepairStatus, RepairType};

/// Row of the `repairs` table as read back. `id` is a serial column.
#[derive(Debug, Clone, Deserialize)]
pub struct RepairRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub asset_id: Option<String>,
    pub order_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub equipment_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub problem_description: Option<String>,
    pub diagnosis: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub repair_type: Option<String>,
    pub assigned_to: Option<String>,
    pub cost: Option<f64>,
    pub estimated_completion: Option<String>,
    pub completed_at: Option<String>,
    pub notes: Option<String>,
    /// A text array, or a single string in older rows
    #[serde(default)]
    pub parts_used: Value,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairNewRow {
    pub asset_id: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub equipment_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub problem_description: String,
    pub diagnosis: Option<String>,
    pub status: String,
    pub priority: String,
    pub repair_type: String,
    pub assigned_to: Option<String>,
    pub cost: Option<f64>,
    pub estimated_completion: String,
    pub notes: Option<String>,
    pub parts_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepairRowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts_used: Option<Vec<String>>,
}

fn parts_list(raw: Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    }
}

fn or_default<T: Default>(raw: Option<String>, parse: fn(&str) -> T) -> T {
    match raw.as_deref() {
        Some(raw) if !raw.is_empty() => parse(raw),
        _ => T::default(),
    }
}

pub struct RepairMapper;

impl FieldMapper for RepairMapper {
    type Entity = Repair;
    type Draft = RepairDraft;
    type Patch = RepairPatch;
    type Row = RepairRow;
    type NewRow = RepairNewRow;
    type RowPatch = RepairRowPatch;

    const TABLE: &'static str = "repairs";
    const CACHE_KEY: &'static str = "repairs";
    const ID_KIND: IdKind = IdKind::Serial;
    const MESSAGES: EntityMessages = EntityMessages {
        created: ("Reparación creada", "La reparación ha sido creada exitosamente"),
        create_failed: "No se pudo crear la reparación. Por favor, intenta nuevamente.",
        updated: ("Reparación actualizada", "La reparación ha sido actualizada exitosamente"),
        update_failed: "No se pudo actualizar la reparación. Por favor, intenta nuevamente.",
        deleted: ("Reparación eliminada", "La reparación ha sido eliminada exitosamente"),
        delete_failed: "No se pudo eliminar la reparación. Por favor, intenta nuevamente.",
    };

    fn to_new_row(draft: &RepairDraft) -> RepairNewRow {
        RepairNewRow {
            asset_id: draft.asset_id.clone(),
            order_number: draft.order_number.clone(),
            customer_name: draft.customer_name.clone(),
            customer_phone: draft.customer_phone.clone(),
            customer_email: draft.customer_email.clone(),
            equipment_type: draft.equipment_type.clone(),
            brand: draft.brand.clone(),
            model: draft.model.clone(),
            serial_number: draft.serial_number.clone(),
            problem_description: draft.problem_description.clone(),
            diagnosis: draft.diagnosis.clone(),
            status: draft.status.as_str().to_string(),
            priority: draft.priority.as_str().to_string(),
            repair_type: draft.repair_type.as_str().to_string(),
            assigned_to: draft.assigned_to.clone(),
            cost: draft.cost,
            estimated_completion: draft.estimated_completion.clone(),
            notes: draft.notes.clone(),
            parts_used: draft.parts_used.clone(),
        }
    }

    fn to_row_patch(patch: &RepairPatch) -> RepairRowPatch {
        RepairRowPatch {
            asset_id: patch.asset_id.clone(),
            order_number: patch.order_number.clone(),
            customer_name: patch.customer_name.clone(),
            customer_phone: patch.customer_phone.clone(),
            customer_email: patch.customer_email.clone(),
            equipment_type: patch.equipment_type.clone(),
            brand: patch.brand.clone(),
            model: patch.model.clone(),
            serial_number: patch.serial_number.clone(),
            problem_description: patch
                .problem_description
                .clone()
                .or_else(|| patch.description.clone()),
            diagnosis: patch.diagnosis.clone(),
            status: patch.status.as_ref().map(|s| s.as_str().to_string()),
            priority: patch.priority.as_ref().map(|p| p.as_str().to_string()),
            repair_type: patch.repair_type.as_ref().map(|t| t.as_str().to_string()),
            assigned_to: patch.assigned_to.clone(),
            cost: patch.cost,
            estimated_completion: patch.estimated_completion.clone(),
            completed_at: patch.completed_at.clone(),
            notes: patch.notes.clone(),
            parts_used: patch.parts_used.clone(),
        }
    }

    fn from_row(row: RepairRow) -> Result<Repair, MapError> {
        Ok(Repair {
            id: row.id,
            asset_id: row.asset_id.unwrap_or_default(),
            order_number: row.order_number.unwrap_or_default(),
            customer_name: row.customer_name.unwrap_or_default(),
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            equipment_type: row.equipment_type.unwrap_or_default(),
            brand: row.brand,
            model: row.model,
            serial_number: row.serial_number,
            problem_description: row.problem_description.unwrap_or_default(),
            diagnosis: row.diagnosis,
            // a null status is kept as an unrecognized empty value
            status: RepairStatus::from_stored(row.status.as_deref().unwrap_or_default()),
            priority: or_default(row.priority, RepairPriority::from_stored),
            repair_type: or_default(row.repair_type, RepairType::from_stored),
            assigned_to: row.assigned_to,
            cost: row.cost,
            estimated_completion: row.estimated_completion.unwrap_or_default(),
            completed_at: row.completed_at,
            notes: row.notes,
            parts_used: parts_list(row.parts_used),
            created_at: row.created_at.unwrap_or_default(),
            updated_at: row.updated_at.unwrap_or_default(),
        })
    }

    fn entity_id(repair: &Repair) -> &str {
        &repair.id
    }
}
