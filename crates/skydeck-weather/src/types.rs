use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use skydeck_core::LookupError;

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// How a location is addressed for provider lookups.
///
/// Coordinates always win over the display name when both are known.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coords(Coordinates),
    Name(String),
}

impl LocationQuery {
    /// Build a query from an optional coordinate pair and a display name,
    /// preferring the coordinates.
    pub fn new(coordinates: Option<(f64, f64)>, name: &str) -> Self {
        match coordinates {
            Some((lat, lon)) => LocationQuery::Coords(Coordinates::new(lat, lon)),
            None => LocationQuery::Name(name.to_string()),
        }
    }
}

/// Coarse time-of-day buckets derived from the local hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Bucket a local hour (0-23). Night wraps: [21,24) and [0,6).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeOfDay::Night,
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Night => "Night",
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved local clock reading for one location.
///
/// Wholly replaced on every refresh; never merged with its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSnapshot {
    pub profile_id: i64,
    /// Formatted clock string, e.g. "7:05 PM"
    pub clock: String,
    pub time_of_day: TimeOfDay,
}

/// One geocoding hit from the provider (forward or reverse).
#[derive(Debug, Clone, PartialEq)]
pub struct GeoHit {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// 2-letter country code
    pub country: String,
    pub state: Option<String>,
}

/// Descriptive country metadata for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    /// 2-letter country code
    pub code: String,
    pub name: String,
    pub official_name: String,
    pub population: u64,
    pub region: String,
    pub subregion: Option<String>,
    pub capital: Option<String>,
    /// Language code -> language name
    pub languages: BTreeMap<String, String>,
    /// Currency code -> descriptive name
    pub currencies: BTreeMap<String, String>,
    /// Area in km²
    pub area: f64,
    /// Primary timezone label, e.g. "UTC+05:30"
    pub timezone: Option<String>,
    pub flag_url: Option<String>,
}

/// A country resolution, plus the coordinates the forward-geocoding path
/// surfaced for map centering (absent on the coordinate path, where the
/// caller already has them).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCountry {
    pub record: CountryRecord,
    pub map_center: Option<Coordinates>,
}
