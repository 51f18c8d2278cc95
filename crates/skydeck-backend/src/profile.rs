//! Profile types for the remote location store.

use serde::{Deserialize, Serialize};

use crate::weather::RawCurrent;

/// A saved location, as returned by the profile store.
///
/// The id is backend-assigned and opaque to this crate. Coordinates are
/// either both present or both absent; `coordinates()` enforces the pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub location_name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Current-weather summary embedded in list responses. Left raw here;
    /// the aggregated endpoint is the authoritative source for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_weather: Option<RawCurrent>,
}

impl Profile {
    /// Paired coordinates, if both halves are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Request to create a new profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileCreateRequest {
    pub location_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ProfileCreateRequest {
    /// A profile created from a typed city name.
    pub fn named(location_name: impl Into<String>) -> Self {
        Self {
            location_name: location_name.into(),
            country: None,
            latitude: None,
            longitude: None,
        }
    }

    /// A profile created from captured device coordinates.
    pub fn at(location_name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            location_name: location_name.into(),
            country: None,
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

/// Request to update an existing profile (partial update).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}
