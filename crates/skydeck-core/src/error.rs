//! Centralized error types for the SkyDeck application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the SkyDeck application should be convertible to this type.
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Backend(e) => e.user_message(),
            AppError::Lookup(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Errors from the profile store backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed (connection refused, timeout, DNS).
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend answered 2xx but the body could not be decoded.
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn user_message(&self) -> &'static str {
        match self {
            BackendError::Transport(_) => {
                "Unable to reach the location store. Check your connection."
            }
            BackendError::Api { status, .. } if *status >= 500 => {
                "The location store is experiencing issues. Please try again later."
            }
            BackendError::Api { .. } => "The request failed. Please try again.",
            BackendError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }

    /// The best available detail string, for surfacing alongside `user_message()`.
    pub fn detail(&self) -> &str {
        match self {
            BackendError::Transport(msg) => msg,
            BackendError::Api { message, .. } => message,
            BackendError::InvalidResponse(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => BackendError::Api {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None => BackendError::Transport(e.to_string()),
        }
    }
}

/// Errors from third-party lookups (geocoding, country data, UTC offset).
///
/// Every variant selects a fallback path at the call site; none of them is
/// surfaced to the user directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Transport failure or non-2xx from the upstream service.
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// The lookup succeeded but returned an empty result set.
    #[error("No matching result")]
    NotFound,

    /// The required API credential is not configured.
    #[error("API key not configured")]
    MissingApiKey,
}

impl LookupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::Upstream(_) => "Lookup service unavailable. Showing fallback data.",
            LookupError::NotFound => "No data found for this location.",
            LookupError::MissingApiKey => "Lookup disabled: API key not configured.",
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Upstream(e.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}
