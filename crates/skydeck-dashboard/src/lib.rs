//! Dashboard orchestration for SkyDeck
//!
//! Owns the per-location view models and merges the independently-arriving
//! time, weather, and country resolutions into them. Locations are watched
//! by per-profile clock tasks that are cancelled the moment a location
//! leaves the visible set.

pub mod clock;
pub mod dashboard;
pub mod export;
pub mod map;
pub mod view;

pub use clock::ClockRegistry;
pub use dashboard::{Dashboard, DashboardOptions};
pub use export::EXPORT_FILE_NAME;
pub use map::MapView;
pub use view::{DetailView, LoadState, LocationView, Slice};
