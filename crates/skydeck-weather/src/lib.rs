//! Location-time and country resolution for SkyDeck
//!
//! Resolves per-location local time from provider UTC offsets (with a
//! wall-clock fallback) and country records via coordinate-first geocoding.

pub mod clock;
pub mod country;
pub mod provider;
pub mod resolver;
pub mod types;

pub use clock::resolve_local_time;
pub use country::CountryClient;
pub use provider::OpenWeatherClient;
pub use resolver::GeoCountryResolver;
pub use types::*;
