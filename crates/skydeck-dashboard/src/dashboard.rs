//! The location dashboard: list/detail state and resolver orchestration.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use skydeck_backend::{Profile, ProfileClient, ProfileCreateRequest, WeatherSnapshot};
use skydeck_core::{AppError, BackendError, Config, DeletePolicy, RefreshStrategy};
use skydeck_weather::{
    Coordinates, GeoCountryResolver, LocationQuery, LookupError, OpenWeatherClient, TimeSnapshot,
};

use crate::clock::ClockRegistry;
use crate::export;
use crate::map::MapView;
use crate::view::{DetailView, LocationView, Slice};

/// Tunable dashboard behavior, usually derived from the app config.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Cadence of per-location local-time refreshes
    pub clock_interval: Duration,
    /// What to do locally when a backend delete fails
    pub delete_policy: DeletePolicy,
    /// List-view refresh concurrency
    pub refresh: RefreshStrategy,
    /// Map widget credential; absent means the detail view shows a static
    /// message instead of a marker
    pub map_credential: Option<String>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            clock_interval: Duration::from_secs(60),
            delete_policy: DeletePolicy::default(),
            refresh: RefreshStrategy::default(),
            map_credential: None,
        }
    }
}

impl DashboardOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            clock_interval: Duration::from_secs(config.dashboard.clock_refresh_seconds.max(1)),
            delete_policy: config.dashboard.delete_policy,
            refresh: config.dashboard.refresh,
            map_credential: config.map.api_key.clone(),
        }
    }
}

/// Root orchestrator over the profile store and the lookup resolvers.
///
/// Owns every view model; clock ticks and resolver results only ever reach
/// the view state through methods on this type.
pub struct Dashboard {
    backend: ProfileClient,
    resolver: GeoCountryResolver,
    options: DashboardOptions,
    profiles: Vec<Profile>,
    views: HashMap<i64, LocationView>,
    detail: Option<DetailView>,
    add_form_open: bool,
    clocks: ClockRegistry,
    clock_rx: mpsc::UnboundedReceiver<TimeSnapshot>,
}

impl Dashboard {
    pub fn new(
        backend: ProfileClient,
        provider: OpenWeatherClient,
        resolver: GeoCountryResolver,
        options: DashboardOptions,
    ) -> Self {
        let (clocks, clock_rx) = ClockRegistry::new(provider, options.clock_interval);
        Self {
            backend,
            resolver,
            options,
            profiles: Vec::new(),
            views: HashMap::new(),
            detail: None,
            add_form_open: false,
            clocks,
            clock_rx,
        }
    }

    /// Load the profile list and build the view state.
    ///
    /// A failed list load is silent: the dashboard mounts empty with the
    /// add form open, same as a genuinely empty store.
    pub async fn mount(&mut self) {
        match self.backend.list_profiles().await {
            Ok(profiles) => self.apply_profiles(profiles),
            Err(e) => {
                tracing::warn!("Failed to load profile list: {}", e);
                self.apply_profiles(Vec::new());
            }
        }
    }

    /// Replace the visible set: views and clocks follow the new list, and
    /// clocks of locations that left the set are cancelled.
    fn apply_profiles(&mut self, profiles: Vec<Profile>) {
        let incoming: HashSet<i64> = profiles.iter().map(|p| p.id).collect();
        let stale: Vec<i64> = self
            .views
            .keys()
            .filter(|id| !incoming.contains(id))
            .copied()
            .collect();
        for id in stale {
            self.clocks.unwatch(id);
            self.views.remove(&id);
        }

        for profile in &profiles {
            let query = LocationQuery::new(profile.coordinates(), &profile.location_name);
            if !self.clocks.is_watching(profile.id) {
                self.clocks.watch(profile.id, query);
            }
            match self.views.get_mut(&profile.id) {
                Some(view) => view.profile = profile.clone(),
                None => {
                    self.views
                        .insert(profile.id, LocationView::new(profile.clone()));
                }
            }
        }

        if profiles.is_empty() {
            self.add_form_open = true;
        }
        self.profiles = profiles;
    }

    /// Refresh every visible location's weather under the configured
    /// strategy. Failures degrade that location's snapshot silently.
    pub async fn refresh_weather(&mut self) {
        for view in self.views.values_mut() {
            view.begin_loading();
        }

        match self.options.refresh {
            RefreshStrategy::Sequential => {
                let ids: Vec<i64> = self.profiles.iter().map(|p| p.id).collect();
                for id in ids {
                    let snapshot = self.fetch_snapshot(id).await;
                    if let Some(view) = self.views.get_mut(&id) {
                        view.apply_weather(snapshot);
                    }
                }
            }
            RefreshStrategy::Bounded { limit } => {
                let semaphore = Arc::new(Semaphore::new(limit.max(1)));
                let mut tasks = JoinSet::new();
                for id in self.profiles.iter().map(|p| p.id) {
                    let backend = self.backend.clone();
                    let semaphore = Arc::clone(&semaphore);
                    tasks.spawn(async move {
                        let _permit = semaphore.acquire_owned().await;
                        (id, backend.fetch_weather(id).await)
                    });
                }
                while let Some(joined) = tasks.join_next().await {
                    let Ok((id, result)) = joined else {
                        tracing::warn!("Weather refresh task failed to join");
                        continue;
                    };
                    let snapshot = result.unwrap_or_else(|e| {
                        tracing::warn!("Weather refresh failed for profile {}: {}", id, e);
                        WeatherSnapshot::unavailable(e.user_message())
                    });
                    if let Some(view) = self.views.get_mut(&id) {
                        view.apply_weather(snapshot);
                    }
                }
            }
        }
    }

    async fn fetch_snapshot(&self, id: i64) -> WeatherSnapshot {
        match self.backend.fetch_weather(id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Weather refresh failed for profile {}: {}", id, e);
                WeatherSnapshot::unavailable(e.user_message())
            }
        }
    }

    /// Apply any clock ticks that arrived since the last poll. Ticks for
    /// locations that already left the set are dropped. Returns how many
    /// snapshots were applied.
    pub fn poll_clock(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(snapshot) = self.clock_rx.try_recv() {
            if let Some(view) = self.views.get_mut(&snapshot.profile_id) {
                view.apply_time(snapshot);
                applied += 1;
            }
        }
        applied
    }

    /// Create a location, then reload the whole list from the backend; the
    /// backend owns list order, so there is no optimistic insert.
    ///
    /// The error, if any, carries a user-facing message; the caller is
    /// expected to surface it.
    pub async fn add_location(
        &mut self,
        request: &ProfileCreateRequest,
    ) -> Result<Profile, BackendError> {
        let profile = self.backend.create_profile(request).await?;
        self.add_form_open = false;

        match self.backend.list_profiles().await {
            Ok(profiles) => self.apply_profiles(profiles),
            Err(e) => tracing::warn!("Reload after create failed: {}", e),
        }

        Ok(profile)
    }

    /// Delete a location, removing it from view state before the backend
    /// answers. On backend failure the error is surfaced either way;
    /// whether the location is restored locally is the delete policy's call.
    pub async fn delete_location(&mut self, id: i64) -> Result<(), BackendError> {
        let position = self.profiles.iter().position(|p| p.id == id);
        let removed = position.map(|i| self.profiles.remove(i));

        self.views.remove(&id);
        self.clocks.unwatch(id);
        if self.detail.as_ref().is_some_and(|d| d.profile_id == id) {
            self.detail = None;
        }

        match self.backend.delete_profile(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                match (self.options.delete_policy, removed, position) {
                    (DeletePolicy::RestoreOnFailure, Some(profile), Some(index)) => {
                        tracing::warn!("Backend delete failed, restoring profile {}: {}", id, e);
                        let query =
                            LocationQuery::new(profile.coordinates(), &profile.location_name);
                        self.clocks.watch(id, query);
                        self.views.insert(id, LocationView::new(profile.clone()));
                        self.profiles.insert(index.min(self.profiles.len()), profile);
                    }
                    _ => {
                        tracing::warn!("Backend delete failed, keeping {} removed: {}", id, e);
                    }
                }
                Err(e)
            }
        }
    }

    /// Switch to detail mode for a location. Country, weather, and map
    /// center resolve concurrently; each failure degrades only its slice.
    pub async fn select_location(&mut self, id: i64) -> Option<&DetailView> {
        let profile = self.profiles.iter().find(|p| p.id == id)?.clone();
        let query = LocationQuery::new(profile.coordinates(), &profile.location_name);

        let (weather, country) = tokio::join!(
            self.backend.fetch_weather(id),
            self.resolver.resolve_country(&query),
        );

        let weather = match weather {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Detail weather failed for profile {}: {}", id, e);
                WeatherSnapshot::unavailable(e.user_message())
            }
        };

        // The fallback for every lookup failure is the same: no country
        // section. Only genuine upstream trouble is worth a warning.
        let country = match country {
            Ok(resolved) => Some(resolved),
            Err(LookupError::Upstream(msg)) => {
                tracing::warn!("Country lookup unavailable for profile {}: {}", id, msg);
                None
            }
            Err(e) => {
                tracing::debug!("No country section for profile {}: {}", id, e);
                None
            }
        };

        let map_center = profile
            .coordinates()
            .map(|(lat, lon)| Coordinates::new(lat, lon))
            .or_else(|| country.as_ref().and_then(|c| c.map_center));
        let map = MapView::resolve(
            self.options.map_credential.as_deref(),
            map_center,
            &profile.location_name,
        );

        self.detail = Some(DetailView {
            profile_id: id,
            weather: Slice::Ready(weather),
            country: Slice::Ready(country),
            map: Slice::Ready(map),
        });
        self.detail.as_ref()
    }

    /// Back to the list view; detail data is discarded, not cached.
    pub fn clear_selection(&mut self) {
        self.detail = None;
    }

    /// Export every saved location to `<dir>/weather_locations.json`.
    pub async fn export_locations(&self, dir: &Path) -> Result<PathBuf, AppError> {
        export::export_locations(&self.backend, dir).await
    }

    /// Cancel every recurring task. Called when the list view goes away;
    /// dropping the dashboard does the same.
    pub fn unmount(&mut self) {
        self.clocks.clear();
        self.views.clear();
        self.profiles.clear();
        self.detail = None;
    }

    // --- accessors ---

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn view(&self, id: i64) -> Option<&LocationView> {
        self.views.get(&id)
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn is_add_form_open(&self) -> bool {
        self.add_form_open
    }

    pub fn open_add_form(&mut self) {
        self.add_form_open = true;
    }

    pub fn close_add_form(&mut self) {
        self.add_form_open = false;
    }

    pub fn has_clock(&self, id: i64) -> bool {
        self.clocks.is_watching(id)
    }
}
