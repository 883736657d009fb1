//! Translation between dashboard entities and stored rows
//!
//! Each entity has a zero-sized mapper type implementing [`FieldMapper`].
//! Rows are snake_case JSON objects; coordinates are stored as JSON text.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::MapError;
use crate::models::Coordinates;

mod asset;
mod client;
mod maintenance;
mod repair;

pub use asset::{AssetMapper, AssetNewRow, AssetRow, AssetRowPatch};
pub use client::{ClientMapper, ClientNewRow, ClientRow, ClientRowPatch};
pub use maintenance::{MaintenanceMapper, MaintenanceNewRow, MaintenanceRow, MaintenanceRowPatch};
pub use repair::{RepairMapper, RepairNewRow, RepairRow, RepairRowPatch};

/// How the storage layer identifies rows of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Text ids; generated as UUIDs when an insert omits one
    Text,
    /// Auto-increment integer ids
    Serial,
}

/// Notification texts shown after each mutation
#[derive(Debug, Clone, Copy)]
pub struct EntityMessages {
    pub created: (&'static str, &'static str),
    pub create_failed: &'static str,
    pub updated: (&'static str, &'static str),
    pub update_failed: &'static str,
    pub deleted: (&'static str, &'static str),
    pub delete_failed: &'static str,
}

/// Bidirectional translation for one entity and its table.
///
/// `to_row_patch` must only emit the keys present in the patch, so an
/// update never touches columns the caller did not name.
pub trait FieldMapper: Send + Sync + 'static {
    type Entity: Clone + Send + Sync + 'static;
    type Draft: Send + Sync;
    type Patch: Send + Sync;
    type Row: DeserializeOwned + Send;
    type NewRow: Serialize + Send + Sync;
    type RowPatch: Serialize + Send + Sync;

    const TABLE: &'static str;
    const CACHE_KEY: &'static str;
    const ID_COLUMN: &'static str = "id";
    const ID_KIND: IdKind = IdKind::Text;
    const MESSAGES: EntityMessages;

    fn to_new_row(draft: &Self::Draft) -> Self::NewRow;

    fn to_row_patch(patch: &Self::Patch) -> Self::RowPatch;

    fn from_row(row: Self::Row) -> Result<Self::Entity, MapError>;

    fn entity_id(entity: &Self::Entity) -> &str;

    /// Bootstrap rows inserted when the table is found empty
    fn seed_rows() -> Vec<Self::NewRow> {
        Vec::new()
    }
}

pub(crate) fn encode_coordinates(coordinates: &Option<Coordinates>) -> Option<String> {
    coordinates.as_ref().map(Coordinates::to_column)
}

pub(crate) fn decode_coordinates(raw: Option<String>) -> Result<Option<Coordinates>, MapError> {
    match raw {
        Some(raw) if !raw.is_empty() => Coordinates::from_column(&raw).map(Some),
        _ => Ok(None),
    }
}

/// Empty optional relations are stored as `null`
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Accepts a JSON string or number and yields its text form
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    })
}
