use serde::{Deserialize, Serialize};

use super::{decode_coordinates, encode_coordinates, non_empty, EntityMessages, FieldMapper};
use crate::error::MapError;
use crate::models::{Asset, AssetPatch, AssetStatus};
use crate::seed;

/// Row of the `assets` table as read back
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRow {
    pub id: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub status: String,
    pub location: Option<String>,
    pub last_maintenance: Option<String>,
    pub capacity: Option<String>,
    pub temperature_range: Option<String>,
    pub image_src: Option<String>,
    pub coordinates: Option<String>,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetNewRow {
    pub id: String,
    pub model: String,
    pub serial_number: String,
    pub status: String,
    pub location: String,
    pub last_maintenance: String,
    pub capacity: String,
    pub temperature_range: String,
    pub image_src: String,
    pub coordinates: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetRowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_maintenance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
}

pub struct AssetMapper;

impl FieldMapper for AssetMapper {
    type Entity = Asset;
    type Draft = Asset;
    type Patch = AssetPatch;
    type Row = AssetRow;
    type NewRow = AssetNewRow;
    type RowPatch = AssetRowPatch;

    const TABLE: &'static str = "assets";
    const CACHE_KEY: &'static str = "assets";
    const MESSAGES: EntityMessages = EntityMessages {
        created: ("Conservador añadido", "El conservador ha sido añadido con éxito."),
        create_failed: "No se pudo añadir el conservador. Por favor, intenta nuevamente.",
        updated: ("Conservador actualizado", "La información del conservador ha sido actualizada."),
        update_failed: "No se pudo actualizar el conservador. Por favor, intenta nuevamente.",
        deleted: ("Conservador eliminado", "El conservador ha sido eliminado de la base de datos."),
        delete_failed: "No se pudo eliminar el conservador. Por favor, intenta nuevamente.",
    };

    fn to_new_row(asset: &Asset) -> AssetNewRow {
        AssetNewRow {
            id: asset.id.clone(),
            model: asset.model.clone(),
            serial_number: asset.serial_number.clone(),
            status: asset.status.as_str().to_string(),
            location: asset.location.clone(),
            last_maintenance: asset.last_maintenance.clone(),
            capacity: asset.capacity.clone(),
            temperature_range: asset.temperature_range.clone(),
            image_src: asset.image_src.clone(),
            coordinates: encode_coordinates(&asset.coordinates),
            assigned_to: non_empty(&asset.assigned_to),
        }
    }

    fn to_row_patch(patch: &AssetPatch) -> AssetRowPatch {
        AssetRowPatch {
            model: patch.model.clone(),
            serial_number: patch.serial_number.clone(),
            status: patch.status.as_ref().map(|s| s.as_str().to_string()),
            location: patch.location.clone(),
            last_maintenance: patch.last_maintenance.clone(),
            capacity: patch.capacity.clone(),
            temperature_range: patch.temperature_range.clone(),
            image_src: patch.image_src.clone(),
            coordinates: encode_coordinates(&patch.coordinates),
            assigned_to: patch.assigned_to.as_ref().map(non_empty),
        }
    }

    fn from_row(row: AssetRow) -> Result<Asset, MapError> {
        Ok(Asset {
            id: row.id,
            model: row.model,
            serial_number: row.serial_number.unwrap_or_default(),
            status: AssetStatus::from_stored(&row.status),
            location: row.location.unwrap_or_default(),
            last_maintenance: row.last_maintenance.unwrap_or_default(),
            capacity: row.capacity.unwrap_or_default(),
            temperature_range: row.temperature_range.unwrap_or_default(),
            image_src: row.image_src.unwrap_or_default(),
            coordinates: decode_coordinates(row.coordinates)?,
            assigned_to: non_empty(&row.assigned_to),
        })
    }

    fn entity_id(asset: &Asset) -> &str {
        &asset.id
    }

    fn seed_rows() -> Vec<AssetNewRow> {
        seed::assets().iter().map(Self::to_new_row).collect()
    }
}
