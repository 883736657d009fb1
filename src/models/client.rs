use serde::{Deserialize, Serialize};

use super::{wire_enum, Coordinates};

wire_enum! {
    ClientStatus ("client status") {
        Active => "active", "Activo",
        Inactive => "inactive", "Inactivo",
    }
}

wire_enum! {
    /// Commercial segment of a client, used by the reports
    ChannelType ("channel type") {
        Tradicional => "tradicional", "Tradicional",
        Moderno => "moderno", "Moderno",
        Industrial => "industrial", "Industrial",
    }
}

impl Default for ClientStatus {
    fn default() -> Self {
        ClientStatus::Active
    }
}

impl Default for ChannelType {
    fn default() -> Self {
        ChannelType::Tradicional
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub assets_assigned: i32,
    pub max_credit: i32,
    pub active_credit: i32,
    pub status: ClientStatus,
    pub image_src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub channel_type: ChannelType,
    pub conserver_productivity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conserver: Option<String>,
}

impl Client {
    /// Share of the credit line in use, in percent. `active_credit` may
    /// exceed `max_credit`, in which case this goes past 100.
    pub fn credit_utilization(&self) -> f64 {
        if self.max_credit == 0 {
            return 0.0;
        }
        f64::from(self.active_credit) / f64::from(self.max_credit) * 100.0
    }
}

/// A client to create. The id is assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientDraft {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub assets_assigned: i32,
    pub max_credit: i32,
    pub active_credit: i32,
    pub status: ClientStatus,
    pub image_src: String,
    pub coordinates: Option<Coordinates>,
    pub channel_type: ChannelType,
    pub conserver_productivity: i32,
    pub conserver: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub assets_assigned: Option<i32>,
    pub max_credit: Option<i32>,
    pub active_credit: Option<i32>,
    pub status: Option<ClientStatus>,
    pub image_src: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub channel_type: Option<ChannelType>,
    pub conserver_productivity: Option<i32>,
    /// `Some(None)` clears the assigned cooler
    pub conserver: Option<Option<String>>,
}

impl ClientPatch {
    pub fn status(status: ClientStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(max_credit: i32, active_credit: i32) -> Client {
        Client {
            id: "CL-1".into(),
            name: "Pescados Norte".into(),
            contact_person: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            assets_assigned: 0,
            max_credit,
            active_credit,
            status: ClientStatus::Active,
            image_src: String::new(),
            coordinates: None,
            channel_type: ChannelType::Tradicional,
            conserver_productivity: 0,
            conserver: None,
        }
    }

    #[test]
    fn credit_utilization() {
        assert_eq!(client(5, 3).credit_utilization(), 60.0);
        assert_eq!(client(0, 2).credit_utilization(), 0.0);
        assert_eq!(client(2, 3).credit_utilization(), 150.0);
    }

    #[test]
    fn entity_serializes_camel_case() {
        let json = serde_json::to_value(client(5, 3)).unwrap();
        assert_eq!(json["contactPerson"], "");
        assert_eq!(json["channelType"], "tradicional");
        assert!(json.get("conserver").is_none());
    }
}
