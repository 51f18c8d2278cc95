//! Profile store client for SkyDeck
//!
//! Talks to the remote location-profile backend: CRUD over saved locations,
//! per-profile aggregated weather, and the export document.

pub mod client;
pub mod profile;
pub mod weather;

pub use client::ProfileClient;
pub use profile::{Profile, ProfileCreateRequest, ProfileUpdateRequest};
pub use weather::{CurrentConditions, ForecastEntry, Section, WeatherSnapshot};
