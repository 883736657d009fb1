use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{wire_enum, Coordinates};
use crate::error::{Error, Result};

wire_enum! {
    /// Where a cooler is in its rental lifecycle
    AssetStatus ("asset status") {
        Available => "available", "Disponible",
        InUse => "in-use", "En Uso",
        Maintenance => "maintenance", "Mantenimiento",
        Retired => "retired", "Retirado",
    }
}

/// Capacities offered by the registration form
pub const CAPACITY_OPTIONS: [&str; 5] = [
    "20 bolsas (5kg)",
    "40 bolsas (5kg)",
    "60 bolsas (5kg)",
    "100 bolsas (5kg)",
    "250 bolsas (5kg)",
];

/// Picture used when a new cooler is registered without one
pub const DEFAULT_ASSET_IMAGE: &str = "https://images.unsplash.com/photo-1562184552-997c461abbe6?ixlib=rb-4.0.3&auto=format&fit=crop&w=900&q=60";

pub const DEFAULT_ASSET_LOCATION: &str = "Almacén Principal";

/// A cooler ("conservador")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub model: String,
    pub serial_number: String,
    pub status: AssetStatus,
    pub location: String,
    /// Free-form date as typed or generated by the form, never parsed
    pub last_maintenance: String,
    pub capacity: String,
    pub temperature_range: String,
    pub image_src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Partial update of an [`Asset`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPatch {
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<AssetStatus>,
    pub location: Option<String>,
    pub last_maintenance: Option<String>,
    pub capacity: Option<String>,
    pub temperature_range: Option<String>,
    pub image_src: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// `Some(None)` unassigns the cooler
    pub assigned_to: Option<Option<String>>,
}

impl AssetPatch {
    pub fn status(status: AssetStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Hands the cooler to a client and marks it in use
    pub fn assign(client_name: &str) -> Self {
        Self {
            status: Some(AssetStatus::InUse),
            assigned_to: Some(Some(client_name.to_string())),
            ..Default::default()
        }
    }
}

/// Input of the "new cooler" form
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssetForm {
    pub model: String,
    pub serial_number: String,
    pub location: String,
    pub capacity: String,
    pub temperature_range: String,
    pub image_src: String,
}

impl Default for NewAssetForm {
    fn default() -> Self {
        Self {
            model: String::new(),
            serial_number: String::new(),
            location: DEFAULT_ASSET_LOCATION.to_string(),
            capacity: "100 bolsas (5kg)".to_string(),
            temperature_range: String::new(),
            image_src: String::new(),
        }
    }
}

impl NewAssetForm {
    pub fn validate(&self) -> Result<()> {
        let required = [
            (&self.model, "El modelo es requerido"),
            (&self.serial_number, "El número de serie es requerido"),
            (&self.location, "La ubicación es requerida"),
            (&self.temperature_range, "El rango de temperatura es requerido"),
        ];
        if let Some((_, message)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
            return Err(Error::invalid_input(message));
        }
        if !CAPACITY_OPTIONS.contains(&self.capacity.as_str()) {
            return Err(Error::invalid_input("Debe seleccionar una capacidad válida"));
        }
        if !self.image_src.is_empty() && url::Url::parse(&self.image_src).is_err() {
            return Err(Error::invalid_input("Debe ser una URL válida"));
        }
        Ok(())
    }

    /// Builds the cooler to insert: next free `CON-NNN` id, status
    /// available, maintenance date `today` and the default picture when
    /// none was given.
    pub fn into_asset(self, existing: &[Asset], today: NaiveDate) -> Result<Asset> {
        self.validate()?;
        let image_src = if self.image_src.is_empty() {
            DEFAULT_ASSET_IMAGE.to_string()
        } else {
            self.image_src
        };
        Ok(Asset {
            id: next_asset_id(existing)?,
            model: self.model,
            serial_number: self.serial_number,
            status: AssetStatus::Available,
            location: self.location,
            last_maintenance: today.format("%d/%m/%Y").to_string(),
            capacity: self.capacity,
            temperature_range: self.temperature_range,
            image_src,
            coordinates: None,
            assigned_to: None,
        })
    }
}

/// Next `CON-NNN` id after the highest one in `existing`.
///
/// Only as unique as the list it scans: two sessions creating coolers at
/// the same time can pick the same id. Fails when the highest suffix has
/// no successor.
pub fn next_asset_id(existing: &[Asset]) -> Result<String> {
    let last = existing
        .iter()
        .filter_map(|asset| asset.id.strip_prefix("CON-"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let next = last
        .checked_add(1)
        .ok_or_else(|| Error::invalid_input(format!("no asset id left after CON-{}", last)))?;
    Ok(format!("CON-{:03}", next))
}
