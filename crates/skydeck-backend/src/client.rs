//! HTTP client for the profile store backend.

use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use skydeck_core::BackendError;

use crate::profile::{Profile, ProfileCreateRequest, ProfileUpdateRequest};
use crate::weather::{RawSnapshot, WeatherSnapshot};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

/// Profile store API client
#[derive(Debug, Clone)]
pub struct ProfileClient {
    base_url: Url,
    client: Arc<Client>,
}

impl ProfileClient {
    /// Create a new client for the given base URL.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        // Url::join treats the last path segment as a file unless the base
        // ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| BackendError::InvalidResponse(format!("Invalid base URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(BackendError::from)?;

        Ok(Self {
            base_url,
            client: Arc::new(client),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidResponse(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// Check response status, extracting the backend's `detail` message.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or(body);

        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// List all saved profiles, in backend order.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, BackendError> {
        tracing::debug!("Fetching profile list");

        let url = self.endpoint("profiles/")?;
        let response = self.client.get(url).send().await.map_err(BackendError::from)?;
        let response = self.check_response(response).await?;
        let profiles: Vec<Profile> = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        tracing::info!("Fetched {} profiles", profiles.len());
        Ok(profiles)
    }

    /// Create a new profile.
    pub async fn create_profile(
        &self,
        request: &ProfileCreateRequest,
    ) -> Result<Profile, BackendError> {
        tracing::debug!("Creating profile: {}", request.location_name);

        let url = self.endpoint("profiles/")?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(BackendError::from)?;
        let response = self.check_response(response).await?;
        let profile: Profile = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        tracing::info!("Created profile {} ({})", profile.id, profile.location_name);
        Ok(profile)
    }

    /// Update an existing profile.
    pub async fn update_profile(
        &self,
        id: i64,
        request: &ProfileUpdateRequest,
    ) -> Result<Profile, BackendError> {
        tracing::debug!("Updating profile {}", id);

        let url = self.endpoint(&format!("profiles/{}", id))?;
        let response = self
            .client
            .put(url)
            .json(request)
            .send()
            .await
            .map_err(BackendError::from)?;
        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// Delete a profile.
    pub async fn delete_profile(&self, id: i64) -> Result<(), BackendError> {
        tracing::debug!("Deleting profile {}", id);

        let url = self.endpoint(&format!("profiles/{}", id))?;
        let response = self.client.delete(url).send().await.map_err(BackendError::from)?;
        self.check_response(response).await?;

        tracing::info!("Deleted profile {}", id);
        Ok(())
    }

    /// Fetch the aggregated weather for a profile.
    ///
    /// A transport failure or non-2xx is an error (the caller renders the
    /// whole snapshot unavailable); a 2xx with per-section error markers
    /// still produces a snapshot with the other section intact.
    pub async fn fetch_weather(&self, id: i64) -> Result<WeatherSnapshot, BackendError> {
        tracing::debug!("Fetching weather for profile {}", id);

        let url = self.endpoint(&format!("profiles/{}/weather", id))?;
        let response = self.client.get(url).send().await.map_err(BackendError::from)?;
        let response = self.check_response(response).await?;
        let raw: RawSnapshot = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(WeatherSnapshot::from_raw(raw))
    }

    /// Fetch the export document: all profiles, verbatim.
    ///
    /// The document is kept as raw JSON so the export file is a byte-level
    /// passthrough of what the backend returned (modulo pretty-printing).
    pub async fn export_profiles(&self) -> Result<serde_json::Value, BackendError> {
        tracing::debug!("Fetching export document");

        let url = self.endpoint("export")?;
        let response = self.client.get(url).send().await.map_err(BackendError::from)?;
        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = ProfileClient::new("http://localhost:8000").unwrap();
        let url = client.endpoint("profiles/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/profiles/");
    }

    #[test]
    fn test_base_url_with_path_keeps_prefix() {
        let client = ProfileClient::new("http://localhost:8000/api/v2").unwrap();
        let url = client.endpoint("profiles/7/weather").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v2/profiles/7/weather");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(ProfileClient::new("not a url").is_err());
    }
}
