use serde::{Deserialize, Serialize};

use super::wire_enum;

wire_enum! {
    RepairStatus ("repair status") {
        Pending => "pending", "Pendiente",
        InProgress => "in_progress", "En Progreso",
        Completed => "completed", "Completada",
        Cancelled => "cancelled", "Cancelada",
    }
}

wire_enum! {
    RepairPriority ("repair priority") {
        Low => "low", "Baja",
        Medium => "medium", "Media",
        High => "high", "Alta",
        Urgent => "urgent", "Urgente",
    }
}

wire_enum! {
    RepairType ("repair type") {
        Corrective => "corrective", "Correctivo",
        Preventive => "preventive", "Preventivo",
    }
}

impl Default for RepairStatus {
    fn default() -> Self {
        RepairStatus::Pending
    }
}

impl Default for RepairPriority {
    fn default() -> Self {
        RepairPriority::Medium
    }
}

impl Default for RepairType {
    fn default() -> Self {
        RepairType::Corrective
    }
}

/// A repair order. Any status may follow any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    /// Serial id of the stored row, as text
    pub id: String,
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
    pub status: RepairStatus,
    pub priority: RepairPriority,
    pub repair_type: RepairType,
    pub assigned_to: Option<String>,
    pub cost: Option<f64>,
    pub estimated_completion: String,
    pub completed_at: Option<String>,
    pub notes: Option<String>,
    pub parts_used: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Repair {
    /// Display name of the order, the same value as `order_number`
    pub fn repair_number(&self) -> &str {
        &self.order_number
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RepairDraft {
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
    pub status: RepairStatus,
    pub priority: RepairPriority,
    pub repair_type: RepairType,
    pub assigned_to: Option<String>,
    pub cost: Option<f64>,
    pub estimated_completion: String,
    pub notes: Option<String>,
    pub parts_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RepairPatch {
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
    /// Older forms send the problem text under this name; it is used only
    /// when `problem_description` is absent.
    pub description: Option<String>,
    pub diagnosis: Option<String>,
    pub status: Option<RepairStatus>,
    pub priority: Option<RepairPriority>,
    pub repair_type: Option<RepairType>,
    pub assigned_to: Option<String>,
    pub cost: Option<f64>,
    pub estimated_completion: Option<String>,
    pub completed_at: Option<String>,
    pub notes: Option<String>,
    pub parts_used: Option<Vec<String>>,
}

impl RepairPatch {
    pub fn status(status: RepairStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
