//! Aggregated weather snapshot: wire shapes from the backend and the
//! normalized presentation types.
//!
//! The backend owns the upstream provider call and already splits the
//! result into `current_weather` and `forecast` fields; this module only
//! normalizes presentation. The two sections fail independently: a broken
//! current-conditions block does not take the forecast down with it, and
//! vice versa.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const FORECAST_WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wire shape of the backend's `current_weather` object. Either a readable
/// summary or a bare `error` message; every field is optional because the
/// backend collapses failures into `{ "error": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCurrent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
}

/// Wire shape of the aggregated weather response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawSnapshot {
    #[serde(default)]
    pub current_weather: Option<RawCurrent>,
    #[serde(default)]
    pub forecast: Option<Vec<RawForecastEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawForecastEntry {
    pub date: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// A snapshot section that resolved, or the reason it didn't.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Section<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T> Section<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Section::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            Section::Unavailable { .. } => None,
        }
    }
}

/// Normalized current conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    /// Location label as reported by the weather provider
    pub location: String,
    /// Temperature in °C
    pub temperature: f64,
    pub description: String,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

impl CurrentConditions {
    /// Temperature rounded to the nearest whole degree, as displayed.
    pub fn temperature_rounded(&self) -> i64 {
        self.temperature.round() as i64
    }
}

/// One normalized forecast entry (3-hour slot promoted to a daily sample).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub description: String,
    /// Provider icon code, e.g. "10d"
    pub icon: String,
}

impl ForecastEntry {
    pub fn temperature_rounded(&self) -> i64 {
        self.temperature.round() as i64
    }

    /// Long display date, e.g. "Monday, June 7"
    pub fn date_display(&self) -> String {
        self.timestamp.format("%A, %B %-d").to_string()
    }

    /// Display time of the forecast slot, e.g. "12:00"
    pub fn time_display(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    /// Provider-hosted icon image for this entry.
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// The per-location aggregated weather view, with independently failing
/// current and forecast sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub current: Section<CurrentConditions>,
    pub forecast: Section<Vec<ForecastEntry>>,
}

impl WeatherSnapshot {
    /// A snapshot where the backend call itself failed: both sections down.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            current: Section::unavailable(reason.clone()),
            forecast: Section::unavailable(reason),
        }
    }

    pub fn is_fully_ready(&self) -> bool {
        self.current.is_ready() && self.forecast.is_ready()
    }

    pub(crate) fn from_raw(raw: RawSnapshot) -> Self {
        let current = match raw.current_weather {
            Some(RawCurrent {
                error: Some(reason),
                ..
            }) => Section::unavailable(reason),
            Some(RawCurrent {
                temperature: Some(temperature),
                description: Some(description),
                location,
                humidity,
                wind_speed,
                ..
            }) => Section::Ready(CurrentConditions {
                location: location.unwrap_or_default(),
                temperature,
                description,
                humidity: humidity.unwrap_or_default(),
                wind_speed: wind_speed.unwrap_or_default(),
            }),
            _ => Section::unavailable("Current weather data unavailable"),
        };

        let entries: Vec<ForecastEntry> = raw
            .forecast
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| {
                match NaiveDateTime::parse_from_str(&entry.date, FORECAST_WIRE_FORMAT) {
                    Ok(timestamp) => Some(ForecastEntry {
                        timestamp,
                        temperature: entry.temperature,
                        description: entry.description,
                        icon: entry.icon,
                    }),
                    Err(e) => {
                        tracing::warn!("Dropping forecast entry with bad date {:?}: {}", entry.date, e);
                        None
                    }
                }
            })
            .collect();

        let forecast = if entries.is_empty() {
            Section::unavailable("5-day forecast unavailable")
        } else {
            Section::Ready(entries)
        };

        Self { current, forecast }
    }
}
