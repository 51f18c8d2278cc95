//! OpenWeather client: UTC-offset lookup and forward/reverse geocoding.
//!
//! Every operation needs an API key; without one the client returns
//! `LookupError::MissingApiKey` before touching the network, and callers
//! degrade to their local fallback.

use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::types::{Coordinates, GeoHit, LocationQuery, LookupError};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct OwTimezoneResponse {
    /// Seconds east of UTC
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwGeoHit {
    #[serde(default)]
    name: Option<String>,
    lat: f64,
    lon: f64,
    country: String,
    #[serde(default)]
    state: Option<String>,
}

impl From<OwGeoHit> for GeoHit {
    fn from(hit: OwGeoHit) -> Self {
        GeoHit {
            name: hit.name.unwrap_or_default(),
            latitude: hit.lat,
            longitude: hit.lon,
            country: hit.country,
            state: hit.state,
        }
    }
}

/// Weather/geocoding provider client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: Url,
    client: Arc<Client>,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Result<Self, LookupError> {
        Self::with_base_url(OPENWEATHER_URL, api_key)
    }

    /// Client against a non-default endpoint (tests).
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self, LookupError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LookupError::Upstream(format!("Invalid provider URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(LookupError::from)?;

        Ok(Self {
            base_url,
            client: Arc::new(client),
            api_key,
        })
    }

    fn key(&self) -> Result<&str, LookupError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LookupError::MissingApiKey)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, LookupError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| LookupError::Upstream(format!("Invalid endpoint {}: {}", path, e)))?;

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(LookupError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Upstream(format!(
                "Provider returned status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::Upstream(format!("Provider response parse error: {}", e)))
    }

    fn location_params(query: &LocationQuery, key: &str) -> Vec<(&'static str, String)> {
        let mut params = match query {
            LocationQuery::Coords(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
            LocationQuery::Name(name) => vec![("q", name.clone())],
        };
        params.push(("appid", key.to_string()));
        params
    }

    /// Look up the UTC offset (seconds east of UTC) for a location.
    ///
    /// Callers treat any error as "offset unavailable" and fall back to the
    /// system wall clock.
    pub async fn utc_offset(&self, query: &LocationQuery) -> Result<i32, LookupError> {
        let key = self.key()?;
        let params = Self::location_params(query, key);

        tracing::debug!("Fetching UTC offset for {:?}", query);
        let parsed: OwTimezoneResponse = self.get_json("data/2.5/weather", &params).await?;
        Ok(parsed.timezone)
    }

    /// Reverse-geocode coordinates to place hits (first hit wins downstream).
    pub async fn reverse_geocode(&self, coords: Coordinates) -> Result<Vec<GeoHit>, LookupError> {
        let key = self.key()?;
        let params = vec![
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("limit", "1".to_string()),
            ("appid", key.to_string()),
        ];

        tracing::debug!(
            "Reverse geocoding ({}, {})",
            coords.latitude,
            coords.longitude
        );
        let hits: Vec<OwGeoHit> = self.get_json("geo/1.0/reverse", &params).await?;
        Ok(hits.into_iter().map(GeoHit::from).collect())
    }

    /// Forward-geocode a place name to coordinate/country hits.
    pub async fn forward_geocode(&self, name: &str) -> Result<Vec<GeoHit>, LookupError> {
        let key = self.key()?;
        let params = vec![
            ("q", name.to_string()),
            ("limit", "1".to_string()),
            ("appid", key.to_string()),
        ];

        tracing::debug!("Forward geocoding {:?}", name);
        let hits: Vec<OwGeoHit> = self.get_json("geo/1.0/direct", &params).await?;
        Ok(hits.into_iter().map(GeoHit::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_hit_deserialization() {
        let json = r#"{
            "name": "Seattle",
            "lat": 47.6062,
            "lon": -122.3321,
            "country": "US",
            "state": "Washington"
        }"#;
        let hit: OwGeoHit = serde_json::from_str(json).unwrap();
        let hit = GeoHit::from(hit);
        assert_eq!(hit.name, "Seattle");
        assert_eq!(hit.country, "US");
        assert_eq!(hit.state.as_deref(), Some("Washington"));
    }

    #[test]
    fn test_timezone_deserialization_ignores_extra_fields() {
        let json = r#"{"name": "Mumbai", "timezone": 19800, "main": {"temp": 31.0}}"#;
        let parsed: OwTimezoneResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.timezone, 19800);
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = OpenWeatherClient::with_base_url("http://127.0.0.1:9", None).unwrap();
        let err = client
            .utc_offset(&LocationQuery::Name("London".into()))
            .await
            .unwrap_err();
        assert_eq!(err, LookupError::MissingApiKey);
    }

    #[tokio::test]
    async fn test_empty_key_short_circuits() {
        let client =
            OpenWeatherClient::with_base_url("http://127.0.0.1:9", Some(String::new())).unwrap();
        let err = client
            .reverse_geocode(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(err, LookupError::MissingApiKey);
    }
}
