//! Per-location view models.

use skydeck_backend::{Profile, WeatherSnapshot};
use skydeck_weather::{ResolvedCountry, TimeSnapshot};

use crate::map::MapView;

/// A view-model field that has either resolved or is still waiting.
///
/// Unresolved data renders as an explicit loading state; there is no
/// "silently empty" value.
#[derive(Debug, Clone, PartialEq)]
pub enum Slice<T> {
    Loading,
    Ready(T),
}

impl<T> Slice<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Slice::Loading)
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Slice::Ready(value) => Some(value),
            Slice::Loading => None,
        }
    }
}

/// Per-location lifecycle, independent across locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    PartiallyFailed,
}

/// The list-view model for one location.
#[derive(Debug, Clone)]
pub struct LocationView {
    pub profile: Profile,
    pub state: LoadState,
    pub time: Slice<TimeSnapshot>,
    pub weather: Slice<WeatherSnapshot>,
}

impl LocationView {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            state: LoadState::Idle,
            time: Slice::Loading,
            weather: Slice::Loading,
        }
    }

    /// Re-enter Loading ahead of a full weather reload. The time slice is
    /// kept; the clock refreshes it on its own cadence.
    pub(crate) fn begin_loading(&mut self) {
        self.state = LoadState::Loading;
        self.weather = Slice::Loading;
    }

    pub(crate) fn apply_weather(&mut self, snapshot: WeatherSnapshot) {
        self.state = if snapshot.is_fully_ready() {
            LoadState::Ready
        } else {
            LoadState::PartiallyFailed
        };
        self.weather = Slice::Ready(snapshot);
    }

    /// Clock ticks replace only the time slice, never the load state.
    pub(crate) fn apply_time(&mut self, snapshot: TimeSnapshot) {
        self.time = Slice::Ready(snapshot);
    }
}

/// The detail-view model for the selected location.
///
/// Filled by concurrently racing resolvers; each slice degrades on its own,
/// so a partially filled detail view is expected and correct. Discarded on
/// deselect, never cached.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub profile_id: i64,
    pub weather: Slice<WeatherSnapshot>,
    /// `Ready(None)` means "no country section", not an error.
    pub country: Slice<Option<ResolvedCountry>>,
    pub map: Slice<MapView>,
}
