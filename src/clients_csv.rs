//! Client list import and export as CSV
//!
//! Exports use the camelCase column names and Spanish labels of the
//! dashboard. Imports accept the same columns or their Spanish names and
//! never fail on an unknown status or channel: they fall back to a default
//! and log the substitution.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{ChannelType, Client, ClientDraft, ClientStatus, Coordinates};

/// Centre of the area where imported clients are placed until geocoded
const IMPORT_ORIGIN: (f64, f64) = (-70.6506, -33.4372);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    contact_person: &'a str,
    phone: &'a str,
    email: &'a str,
    address: &'a str,
    status: &'static str,
    channel_type: &'a str,
    conserver_productivity: i32,
    assets_assigned: i32,
}

impl<'a> From<&'a Client> for ExportRow<'a> {
    fn from(client: &'a Client) -> Self {
        let status = match client.status {
            ClientStatus::Active => "Activo",
            _ => "Inactivo",
        };
        let channel_type = if client.channel_type.is_recognized() {
            client.channel_type.label()
        } else {
            "Tradicional"
        };
        Self {
            id: &client.id,
            name: &client.name,
            contact_person: &client.contact_person,
            phone: &client.phone,
            email: &client.email,
            address: &client.address,
            status,
            channel_type,
            conserver_productivity: client.conserver_productivity,
            assets_assigned: client.assets_assigned,
        }
    }
}

/// CSV text with a header row, one line per client
pub fn export(clients: &[Client]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for client in clients {
        writer.serialize(ExportRow::from(client))?;
    }
    if clients.is_empty() {
        writer.write_record([
            "id",
            "name",
            "contactPerson",
            "phone",
            "email",
            "address",
            "status",
            "channelType",
            "conserverProductivity",
            "assetsAssigned",
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(Error::invalid_input)
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("clientes-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the export into `dir` and returns the path of the new file
pub fn write_export_file(dir: &Path, clients: &[Client], date: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(export_file_name(date));
    fs::write(&path, export(clients)?)?;
    tracing::info!(path = %path.display(), count = clients.len(), "exported clients");
    Ok(path)
}

/// A client row as read from an import file, before completion
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedClient {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub status: ClientStatus,
    pub channel_type: ChannelType,
    pub conserver_productivity: i32,
}

impl ImportedClient {
    /// Completes the row into a client to insert: blank contact fields get
    /// placeholders, credit starts at 5 with nothing in use, and the avatar
    /// and position are picked at random.
    pub fn into_draft<R: Rng + ?Sized>(self, rng: &mut R) -> ClientDraft {
        let gender = if rng.gen_bool(0.5) { "men" } else { "women" };
        let portrait = rng.gen_range(1..=70);
        let (longitude, latitude) = IMPORT_ORIGIN;

        ClientDraft {
            name: or_placeholder(self.name, "Sin nombre"),
            contact_person: or_placeholder(self.contact_person, "Sin contacto"),
            phone: or_placeholder(self.phone, "Sin teléfono"),
            email: or_placeholder(self.email, "sin@email.com"),
            address: or_placeholder(self.address, "Sin dirección"),
            assets_assigned: 0,
            max_credit: 5,
            active_credit: 0,
            status: self.status,
            image_src: format!("https://randomuser.me/api/portraits/{gender}/{portrait}.jpg"),
            coordinates: Some(Coordinates::new(
                longitude + (rng.gen::<f64>() - 0.5) * 5.0,
                latitude + (rng.gen::<f64>() - 0.5) * 10.0,
            )),
            channel_type: self.channel_type,
            conserver_productivity: self.conserver_productivity,
            conserver: None,
        }
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

/// Parses a header-row CSV into client rows
pub fn import<R: Read>(reader: R) -> Result<Vec<ImportedClient>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_string(), index))
        .collect();

    let mut clients = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let field = |names: &[&str]| pick(&columns, &record, names);

        clients.push(ImportedClient {
            name: field(&["name", "nombre"]),
            contact_person: field(&["contactPerson", "contacto"]),
            phone: field(&["phone", "telefono"]),
            email: field(&["email", "correo"]),
            address: field(&["address", "direccion"]),
            status: import_status(&field(&["status", "estado"])),
            channel_type: import_channel(&field(&["channelType", "canal"])),
            conserver_productivity: leading_int(&field(&[
                "conserverProductivity",
                "productividad",
            ])),
        });
    }

    tracing::debug!(count = clients.len(), "parsed client import");
    Ok(clients)
}

// first non-empty column wins, English name before Spanish
fn pick(columns: &HashMap<String, usize>, record: &csv::StringRecord, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| columns.get(*name))
        .filter_map(|index| record.get(*index))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub fn import_str(text: &str) -> Result<Vec<ImportedClient>> {
    import(text.as_bytes())
}

pub fn read_import_file(path: &Path) -> Result<Vec<ImportedClient>> {
    import(fs::File::open(path)?)
}

fn import_status(raw: &str) -> ClientStatus {
    let parsed = ClientStatus::parse(raw)
        .or_else(|err| ClientStatus::from_label(raw).ok_or(err));
    match parsed {
        Ok(ClientStatus::Active) => ClientStatus::Active,
        Ok(_) => ClientStatus::Inactive,
        Err(err) => {
            if !raw.is_empty() {
                tracing::warn!(%err, "importing client as inactive");
            }
            ClientStatus::Inactive
        }
    }
}

fn import_channel(raw: &str) -> ChannelType {
    if raw.is_empty() {
        return ChannelType::default();
    }
    ChannelType::parse(raw)
        .or_else(|err| ChannelType::from_label(raw).ok_or(err))
        .unwrap_or_else(|err| {
            tracing::warn!(%err, "importing client with the default channel");
            ChannelType::default()
        })
}

/// Integer prefix of `raw` ("85%" is 85); anything else is 0
fn leading_int(raw: &str) -> i32 {
    let raw = raw.trim_start();
    let digits_end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(raw.len(), |(i, _)| i);
    raw[..digits_end].parse().unwrap_or(0)
}
