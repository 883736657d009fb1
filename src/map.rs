//! GeoJSON sources for the map widget

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{Asset, Client, Coordinates};

/// Highest zoom level at which points are still clustered
pub const CLUSTER_MAX_ZOOM: u8 = 14;
/// Cluster radius in pixels
pub const CLUSTER_RADIUS: u16 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Point")]
pub struct Point {
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: Value,
    pub geometry: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// One point per cooler with known coordinates
pub fn asset_features(assets: &[Asset]) -> FeatureCollection {
    let features = assets
        .iter()
        .filter_map(|asset| {
            let coordinates = asset.coordinates?;
            Some(Feature {
                properties: json!({
                    "id": asset.id,
                    "model": asset.model,
                    "location": asset.location,
                    "capacity": asset.capacity,
                    "assignedTo": asset.assigned_to.as_deref().unwrap_or(""),
                    "status": asset.status.as_str(),
                }),
                geometry: Point { coordinates },
            })
        })
        .collect();
    FeatureCollection { features }
}

/// One point per client with known coordinates
pub fn client_features(clients: &[Client]) -> FeatureCollection {
    let features = clients
        .iter()
        .filter_map(|client| {
            let coordinates = client.coordinates?;
            Some(Feature {
                properties: json!({
                    "id": client.id,
                    "name": client.name,
                    "address": client.address,
                    "status": client.status.as_str(),
                    "channelType": client.channel_type.as_str(),
                }),
                geometry: Point { coordinates },
            })
        })
        .collect();
    FeatureCollection { features }
}
