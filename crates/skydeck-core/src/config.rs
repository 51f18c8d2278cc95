use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Profile store backend
    pub backend: BackendConfig,

    /// Weather/geocoding provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Map widget credential
    #[serde(default)]
    pub map: MapConfig,

    /// Dashboard behavior
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the profile store API
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for the weather/geocoding provider (optional, can be set via
    /// the WEATHER_API_KEY environment variable). Without it, local time
    /// falls back to the system clock and country lookups are skipped.
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("WEATHER_API_KEY").ok(),
        }
    }
}

impl ProviderConfig {
    /// Check if a usable credential is present (not empty, not a placeholder)
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty() && !k.starts_with("YOUR_"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// API key for the map widget (optional, can be set via the MAPS_API_KEY
    /// environment variable). Without it the detail view shows a static
    /// message instead of a marker.
    pub api_key: Option<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("MAPS_API_KEY").ok(),
        }
    }
}

impl MapConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty() && !k.starts_with("YOUR_"))
    }
}

/// What to do with the local view when a backend delete fails after the
/// optimistic removal already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Keep the location removed locally; only the error is surfaced.
    #[default]
    KeepRemoved,
    /// Reinsert the location (and its clock) and surface the error.
    RestoreOnFailure,
}

/// Named concurrency strategy for list-view refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RefreshStrategy {
    /// One location at a time; total latency scales with location count.
    #[default]
    Sequential,
    /// Fan out with at most `limit` in-flight requests.
    Bounded { limit: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Seconds between local-time recomputations per visible location
    #[serde(default = "default_clock_refresh_seconds")]
    pub clock_refresh_seconds: u64,

    /// Behavior after a failed backend delete (default: keep removed)
    #[serde(default)]
    pub delete_policy: DeletePolicy,

    /// List-view refresh concurrency (default: sequential)
    #[serde(default)]
    pub refresh: RefreshStrategy,

    /// Directory for exported documents (default: the user's download dir)
    #[serde(default)]
    pub export_dir: Option<String>,
}

fn default_clock_refresh_seconds() -> u64 {
    60
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            clock_refresh_seconds: default_clock_refresh_seconds(),
            delete_policy: DeletePolicy::default(),
            refresh: RefreshStrategy::default(),
            export_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Effective export directory: configured path, else downloads, else cwd.
    pub fn effective_export_dir(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skydeck");

        Self {
            config_dir,
            backend: BackendConfig::default(),
            provider: ProviderConfig::default(),
            map: MapConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.backend.base_url, "backend.base_url", &mut result);

        // The clock cadence drives a tokio interval; zero would panic at runtime
        if self.dashboard.clock_refresh_seconds == 0 {
            result.add_error(
                "dashboard.clock_refresh_seconds",
                "Clock refresh interval must be greater than 0",
            );
        } else if self.dashboard.clock_refresh_seconds > 3600 {
            result.add_warning(
                "dashboard.clock_refresh_seconds",
                "Clock refresh interval is more than an hour",
            );
        }

        if let RefreshStrategy::Bounded { limit } = self.dashboard.refresh {
            if limit == 0 {
                result.add_error(
                    "dashboard.refresh",
                    "Bounded refresh needs a limit of at least 1",
                );
            }
        }

        if !self.provider.is_configured() {
            result.add_warning(
                "provider.api_key",
                "Weather API key not configured - local time falls back to the system clock and country lookups are skipped",
            );
        }

        if !self.map.is_configured() {
            result.add_warning(
                "map.api_key",
                "Map API key not configured - the detail view shows a static message instead of a map",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skydeck");

        Ok(config_dir.join("config.toml"))
    }
}
