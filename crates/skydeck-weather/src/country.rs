//! Country-data client (REST Countries v3.1). No credential required.

use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::types::{CountryRecord, LookupError};

const REST_COUNTRIES_URL: &str = "https://restcountries.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct RcName {
    common: String,
    official: String,
}

#[derive(Debug, Deserialize)]
struct RcCurrency {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RcFlags {
    #[serde(default)]
    png: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RcCountry {
    cca2: String,
    name: RcName,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    region: String,
    #[serde(default)]
    subregion: Option<String>,
    #[serde(default)]
    capital: Option<Vec<String>>,
    #[serde(default)]
    languages: Option<BTreeMap<String, String>>,
    #[serde(default)]
    currencies: Option<BTreeMap<String, RcCurrency>>,
    #[serde(default)]
    area: f64,
    #[serde(default)]
    timezones: Option<Vec<String>>,
    #[serde(default)]
    flags: Option<RcFlags>,
}

impl From<RcCountry> for CountryRecord {
    fn from(raw: RcCountry) -> Self {
        CountryRecord {
            code: raw.cca2,
            name: raw.name.common,
            official_name: raw.name.official,
            population: raw.population,
            region: raw.region,
            subregion: raw.subregion,
            capital: raw.capital.and_then(|mut c| {
                if c.is_empty() {
                    None
                } else {
                    Some(c.remove(0))
                }
            }),
            languages: raw.languages.unwrap_or_default(),
            currencies: raw
                .currencies
                .unwrap_or_default()
                .into_iter()
                .map(|(code, currency)| (code, currency.name))
                .collect(),
            area: raw.area,
            timezone: raw
                .timezones
                .and_then(|t| t.into_iter().next()),
            flag_url: raw.flags.and_then(|f| f.png),
        }
    }
}

/// Country metadata client
#[derive(Debug, Clone)]
pub struct CountryClient {
    base_url: Url,
    client: Arc<Client>,
}

impl CountryClient {
    pub fn new() -> Result<Self, LookupError> {
        Self::with_base_url(REST_COUNTRIES_URL)
    }

    /// Client against a non-default endpoint (tests).
    pub fn with_base_url(base_url: &str) -> Result<Self, LookupError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LookupError::Upstream(format!("Invalid country URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(LookupError::from)?;

        Ok(Self {
            base_url,
            client: Arc::new(client),
        })
    }

    /// Fetch the country record for a 2-letter code.
    ///
    /// The endpoint answers with a one-element array; an empty array or a
    /// 404 both map to `NotFound`.
    pub async fn country_by_code(&self, code: &str) -> Result<CountryRecord, LookupError> {
        let url = self
            .base_url
            .join(&format!("v3.1/alpha/{}", code))
            .map_err(|e| LookupError::Upstream(format!("Invalid country endpoint: {}", e)))?;

        tracing::debug!("Fetching country record for {}", code);
        let response = self.client.get(url).send().await.map_err(LookupError::from)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !status.is_success() {
            return Err(LookupError::Upstream(format!(
                "Country service returned status {}",
                status
            )));
        }

        let mut countries: Vec<RcCountry> = response
            .json()
            .await
            .map_err(|e| LookupError::Upstream(format!("Country response parse error: {}", e)))?;

        if countries.is_empty() {
            return Err(LookupError::NotFound);
        }
        Ok(CountryRecord::from(countries.remove(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_record_mapping() {
        let json = r#"{
            "cca2": "IN",
            "name": {"common": "India", "official": "Republic of India"},
            "population": 1380004385,
            "region": "Asia",
            "subregion": "Southern Asia",
            "capital": ["New Delhi"],
            "languages": {"eng": "English", "hin": "Hindi"},
            "currencies": {"INR": {"name": "Indian rupee", "symbol": "₹"}},
            "area": 3287590.0,
            "timezones": ["UTC+05:30"],
            "flags": {"png": "https://flagcdn.com/w320/in.png"}
        }"#;
        let raw: RcCountry = serde_json::from_str(json).unwrap();
        let record = CountryRecord::from(raw);

        assert_eq!(record.code, "IN");
        assert_eq!(record.name, "India");
        assert_eq!(record.official_name, "Republic of India");
        assert_eq!(record.capital.as_deref(), Some("New Delhi"));
        assert_eq!(record.languages.get("hin").map(String::as_str), Some("Hindi"));
        assert_eq!(
            record.currencies.get("INR").map(String::as_str),
            Some("Indian rupee")
        );
        assert_eq!(record.timezone.as_deref(), Some("UTC+05:30"));
        assert!(record.flag_url.is_some());
    }

    #[test]
    fn test_country_record_sparse_fields() {
        let json = r#"{
            "cca2": "AQ",
            "name": {"common": "Antarctica", "official": "Antarctica"}
        }"#;
        let raw: RcCountry = serde_json::from_str(json).unwrap();
        let record = CountryRecord::from(raw);

        assert_eq!(record.capital, None);
        assert!(record.languages.is_empty());
        assert!(record.currencies.is_empty());
        assert_eq!(record.timezone, None);
    }
}
