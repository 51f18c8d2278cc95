//! Per-location clock tasks.
//!
//! Each visible location owns one recurring task keyed by its profile id,
//! holding its own cancellation token. Removing a location cancels its task;
//! there is never a single shared timer iterating a captured list, so a
//! removed location cannot keep ticking against stale state.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use skydeck_weather::{
    resolve_local_time, LocationQuery, LookupError, OpenWeatherClient, TimeSnapshot,
};

struct ClockHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Registry of per-location recurring time resolutions.
///
/// Ticks are delivered over the channel handed out by [`ClockRegistry::new`];
/// only the receiving dashboard mutates view state.
pub struct ClockRegistry {
    provider: OpenWeatherClient,
    interval: Duration,
    tx: mpsc::UnboundedSender<TimeSnapshot>,
    clocks: HashMap<i64, ClockHandle>,
}

impl ClockRegistry {
    pub fn new(
        provider: OpenWeatherClient,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<TimeSnapshot>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                provider,
                interval,
                tx,
                clocks: HashMap::new(),
            },
            rx,
        )
    }

    /// Start (or restart) the clock for a location. The first tick fires
    /// immediately, then on the configured cadence.
    pub fn watch(&mut self, profile_id: i64, query: LocationQuery) {
        self.unwatch(profile_id);

        let token = CancellationToken::new();
        let child = token.clone();
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        // Offset lookup failures are swallowed here: the
                        // snapshot falls back to the system wall clock.
                        let offset = match provider.utc_offset(&query).await {
                            Ok(offset) => Some(offset),
                            Err(LookupError::MissingApiKey) => None,
                            Err(e) => {
                                tracing::warn!(
                                    "UTC offset lookup failed for profile {}: {}",
                                    profile_id,
                                    e
                                );
                                None
                            }
                        };
                        if tx.send(resolve_local_time(profile_id, offset)).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        self.clocks.insert(profile_id, ClockHandle { token, task });
    }

    /// Cancel and drop the clock for a location, if any.
    pub fn unwatch(&mut self, profile_id: i64) {
        if let Some(handle) = self.clocks.remove(&profile_id) {
            tracing::debug!("Cancelling clock for profile {}", profile_id);
            handle.token.cancel();
            handle.task.abort();
        }
    }

    /// Cancel every clock (list view unmounting or emptied).
    pub fn clear(&mut self) {
        let ids: Vec<i64> = self.clocks.keys().copied().collect();
        for id in ids {
            self.unwatch(id);
        }
    }

    pub fn is_watching(&self, profile_id: i64) -> bool {
        self.clocks.contains_key(&profile_id)
    }

    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}

impl Drop for ClockRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A keyless provider never touches the network: the offset lookup
    // short-circuits to MissingApiKey and the snapshot uses the wall clock.
    fn test_provider() -> OpenWeatherClient {
        OpenWeatherClient::with_base_url("http://127.0.0.1:9", None).unwrap()
    }

    #[tokio::test]
    async fn test_watch_delivers_immediate_snapshot() {
        let (mut registry, mut rx) =
            ClockRegistry::new(test_provider(), Duration::from_millis(10));
        registry.watch(1, LocationQuery::Name("London".into()));

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.profile_id, 1);
        assert!(!snapshot.clock.is_empty());
    }

    #[tokio::test]
    async fn test_watch_keeps_ticking() {
        let (mut registry, mut rx) =
            ClockRegistry::new(test_provider(), Duration::from_millis(10));
        registry.watch(1, LocationQuery::Name("London".into()));

        // First tick is immediate, the rest follow the cadence
        for _ in 0..3 {
            assert!(rx.recv().await.is_some());
        }
    }

    #[tokio::test]
    async fn test_unwatch_stops_ticks() {
        let (mut registry, mut rx) =
            ClockRegistry::new(test_provider(), Duration::from_millis(10));
        registry.watch(1, LocationQuery::Name("London".into()));

        assert!(rx.recv().await.is_some());
        registry.unwatch(1);
        assert!(!registry.is_watching(1));

        // Drain anything sent before the cancel landed, then verify silence
        tokio::time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_watch_same_id_replaces_task() {
        let (mut registry, _rx) =
            ClockRegistry::new(test_provider(), Duration::from_millis(10));
        registry.watch(1, LocationQuery::Name("London".into()));
        registry.watch(1, LocationQuery::Name("Paris".into()));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_cancels_everything() {
        let (mut registry, mut rx) =
            ClockRegistry::new(test_provider(), Duration::from_millis(10));
        registry.watch(1, LocationQuery::Name("London".into()));
        registry.watch(2, LocationQuery::Name("Tokyo".into()));
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());

        tokio::time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
