use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Everything a client needs to draw the office map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapEmbed {
    pub center: LatLng,
    pub zoom: u8,
    pub marker_title: String,

    /// CSS height of the map container, e.g. `400px`.
    pub height: String,

    /// Browser key for the map provider. Absent when none is configured, in
    /// which case clients show a static placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServerWellKnownResponse {
    pub server_version: String,
    pub public_url: String,
}
