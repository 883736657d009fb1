use serde::{Deserialize, Serialize};

use super::{decode_coordinates, encode_coordinates, non_empty, EntityMessages, FieldMapper};
use crate::error::MapError;
use crate::models::{ChannelType, Client, ClientDraft, ClientPatch, ClientStatus};
use crate::seed;

/// Row of the `clients_extended` table as read back
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub assets_assigned: Option<i32>,
    pub max_credit: Option<i32>,
    pub active_credit: Option<i32>,
    pub status: String,
    pub image_src: Option<String>,
    pub coordinates: Option<String>,
    pub channel_type: Option<String>,
    pub conserver_productivity: Option<i32>,
    pub conserver: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientNewRow {
    /// Left out on regular inserts so the table default assigns it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub assets_assigned: i32,
    pub max_credit: i32,
    pub active_credit: i32,
    pub status: String,
    pub image_src: String,
    pub coordinates: Option<String>,
    pub channel_type: String,
    pub conserver_productivity: i32,
    pub conserver: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientRowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_assigned: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_credit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_credit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conserver_productivity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conserver: Option<Option<String>>,
}

pub struct ClientMapper;

impl ClientMapper {
    /// Insert payload carrying a fixed id, used for the bootstrap rows
    pub fn to_new_row_with_id(client: &Client) -> ClientNewRow {
        ClientNewRow {
            id: Some(client.id.clone()),
            name: client.name.clone(),
            contact_person: client.contact_person.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            address: client.address.clone(),
            assets_assigned: client.assets_assigned,
            max_credit: client.max_credit,
            active_credit: client.active_credit,
            status: client.status.as_str().to_string(),
            image_src: client.image_src.clone(),
            coordinates: encode_coordinates(&client.coordinates),
            channel_type: client.channel_type.as_str().to_string(),
            conserver_productivity: client.conserver_productivity,
            conserver: non_empty(&client.conserver),
        }
    }
}

impl FieldMapper for ClientMapper {
    type Entity = Client;
    type Draft = ClientDraft;
    type Patch = ClientPatch;
    type Row = ClientRow;
    type NewRow = ClientNewRow;
    type RowPatch = ClientRowPatch;

    const TABLE: &'static str = "clients_extended";
    const CACHE_KEY: &'static str = "clients";
    const MESSAGES: EntityMessages = EntityMessages {
        created: ("Cliente añadido", "El cliente ha sido añadido con éxito."),
        create_failed: "No se pudo añadir el cliente. Por favor, intenta nuevamente.",
        updated: ("Cliente actualizado", "La información del cliente ha sido actualizada."),
        update_failed: "No se pudo actualizar el cliente. Por favor, intenta nuevamente.",
        deleted: ("Cliente eliminado", "El cliente ha sido eliminado de la base de datos."),
        delete_failed: "No se pudo eliminar el cliente. Por favor, intenta nuevamente.",
    };

    fn to_new_row(draft: &ClientDraft) -> ClientNewRow {
        ClientNewRow {
            id: None,
            name: draft.name.clone(),
            contact_person: draft.contact_person.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            address: draft.address.clone(),
            assets_assigned: draft.assets_assigned,
            max_credit: draft.max_credit,
            active_credit: draft.active_credit,
            status: draft.status.as_str().to_string(),
            image_src: draft.image_src.clone(),
            coordinates: encode_coordinates(&draft.coordinates),
            channel_type: draft.channel_type.as_str().to_string(),
            conserver_productivity: draft.conserver_productivity,
            conserver: non_empty(&draft.conserver),
        }
    }

    fn to_row_patch(patch: &ClientPatch) -> ClientRowPatch {
        ClientRowPatch {
            name: patch.name.clone(),
            contact_person: patch.contact_person.clone(),
            phone: patch.phone.clone(),
            email: patch.email.clone(),
            address: patch.address.clone(),
            assets_assigned: patch.assets_assigned,
            max_credit: patch.max_credit,
            active_credit: patch.active_credit,
            status: patch.status.as_ref().map(|s| s.as_str().to_string()),
            image_src: patch.image_src.clone(),
            coordinates: encode_coordinates(&patch.coordinates),
            channel_type: patch.channel_type.as_ref().map(|c| c.as_str().to_string()),
            conserver_productivity: patch.conserver_productivity,
            conserver: patch.conserver.as_ref().map(non_empty),
        }
    }

    fn from_row(row: ClientRow) -> Result<Client, MapError> {
        Ok(Client {
            id: row.id,
            name: row.name,
            contact_person: row.contact_person.unwrap_or_default(),
            phone: row.phone.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            address: row.address.unwrap_or_default(),
            assets_assigned: row.assets_assigned.unwrap_or_default(),
            max_credit: row.max_credit.unwrap_or_default(),
            active_credit: row.active_credit.unwrap_or_default(),
            status: ClientStatus::from_stored(&row.status),
            image_src: row.image_src.unwrap_or_default(),
            coordinates: decode_coordinates(row.coordinates)?,
            channel_type: row
                .channel_type
                .as_deref()
                .map(ChannelType::from_stored)
                .unwrap_or_default(),
            conserver_productivity: row.conserver_productivity.unwrap_or_default(),
            conserver: non_empty(&row.conserver),
        })
    }

    fn entity_id(client: &Client) -> &str {
        &client.id
    }

    fn seed_rows() -> Vec<ClientNewRow> {
        seed::clients().iter().map(Self::to_new_row_with_id).collect()
    }
}
