//! The one-shot search workflow: resolve, fetch, persist, expose state.

use crate::{
    error::SearchError,
    history::HistoryStore,
    model::{HistoryRecord, SearchQuery, Snapshot},
    provider::WeatherProvider,
};

/// Where the workflow currently is. Success and failure are not long-lived
/// states: every search returns to `Idle` before its result is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
}

/// UI-facing state owned by the controller; mutated only by its explicit
/// transitions, never from the outside.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub phase: SearchPhase,
    /// User-visible message of the most recent failed search, cleared by the
    /// next successful one.
    pub last_error: Option<String>,
}

/// Result of submitting one search request.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Ignored,
    /// Both fetches succeeded and the history was updated.
    Completed(Snapshot),
}

/// Controller owning the provider, the persisted history and the UI state.
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    store: HistoryStore,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(provider: Box<dyn WeatherProvider>, store: HistoryStore) -> Self {
        Self { provider, store, state: DashboardState::default() }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn history(&self) -> &HistoryRecord {
        self.store.record()
    }

    /// Run one search to completion and return to idle.
    ///
    /// Overlapping submissions are rejected rather than raced. A failure at
    /// any step leaves the history and the previous snapshot untouched: the
    /// snapshot is assembled only once every call has succeeded, so there is
    /// no partial update to roll back.
    pub async fn search(&mut self, raw_query: &str) -> Result<SearchOutcome, SearchError> {
        let Some(query) = SearchQuery::parse(raw_query) else {
            return Ok(SearchOutcome::Ignored);
        };

        if self.state.phase == SearchPhase::Searching {
            return Err(SearchError::SearchInProgress);
        }

        self.state.phase = SearchPhase::Searching;
        let result = self.run(&query).await;
        self.state.phase = SearchPhase::Idle;

        match result {
            Ok(snapshot) => {
                self.state.last_error = None;
                Ok(SearchOutcome::Completed(snapshot))
            }
            Err(err) => {
                tracing::debug!(city = query.as_str(), error = %err, "search failed");
                self.state.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    async fn run(&mut self, query: &SearchQuery) -> Result<Snapshot, SearchError> {
        let coords = self.provider.resolve_city(query).await?;
        let weather = self.provider.current_conditions(&coords).await?;
        let forecast = self.provider.forecast(&coords).await?;

        let snapshot = Snapshot { weather, forecast };
        self.store.record_search(query.as_str(), &snapshot)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::model::{Coordinates, CurrentConditions, ForecastEntry, ForecastSet};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FakeProvider {
        fail_resolve: bool,
        fail_forecast: bool,
        resolve_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn resolve_city(&self, query: &SearchQuery) -> Result<Coordinates, SearchError> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_resolve {
                return Err(SearchError::CityNotFound(query.as_str().to_owned()));
            }
            Ok(Coordinates { latitude: 51.5, longitude: -0.12 })
        }

        async fn current_conditions(
            &self,
            _coords: &Coordinates,
        ) -> Result<CurrentConditions, SearchError> {
            Ok(CurrentConditions {
                location_name: "London".to_owned(),
                temperature_c: 17.3,
                humidity_pct: 62,
                wind_speed_mps: 4.6,
                condition: "broken clouds".to_owned(),
                icon: "04d".to_owned(),
                observation_time: Utc::now(),
            })
        }

        async fn forecast(&self, _coords: &Coordinates) -> Result<ForecastSet, SearchError> {
            if self.fail_forecast {
                return Err(SearchError::ForecastFetch("status 502".to_owned()));
            }
            Ok(ForecastSet::from_timeline(vec![ForecastEntry {
                timestamp: Utc::now(),
                temperature_c: 15.0,
                condition: "light rain".to_owned(),
                icon: "10d".to_owned(),
            }]))
        }
    }

    fn dashboard(provider: FakeProvider, dir: &std::path::Path) -> Dashboard {
        let store = HistoryStore::open(dir).expect("open store");
        Dashboard::new(Box::new(provider), store)
    }

    #[tokio::test]
    async fn empty_input_is_silently_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut dash = dashboard(FakeProvider::default(), dir.path());

        let outcome = dash.search("   ").await.expect("must not error");

        assert!(matches!(outcome, SearchOutcome::Ignored));
        assert_eq!(dash.state().phase, SearchPhase::Idle);
        assert!(dash.history().cities.is_empty());
    }

    #[tokio::test]
    async fn successful_search_records_city_once() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut dash = dashboard(FakeProvider::default(), dir.path());

        dash.search("London").await.expect("first search");
        dash.search("London").await.expect("second search");

        assert_eq!(dash.history().cities, vec!["London"]);
        assert!(dash.history().last_snapshot.is_some());
        assert!(dash.state().last_error.is_none());
    }

    #[tokio::test]
    async fn query_is_trimmed_before_resolving() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut dash = dashboard(FakeProvider::default(), dir.path());

        dash.search("  London  ").await.expect("search");

        assert_eq!(dash.history().cities, vec!["London"]);
    }

    #[tokio::test]
    async fn distinct_casing_is_a_distinct_city() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut dash = dashboard(FakeProvider::default(), dir.path());

        dash.search("London").await.expect("search");
        dash.search("london").await.expect("search");

        assert_eq!(dash.history().cities, vec!["London", "london"]);
    }

    #[tokio::test]
    async fn resolver_failure_leaves_history_untouched() {
        let dir = tempfile::tempdir().expect("temp dir");
        let provider = FakeProvider { fail_resolve: true, ..FakeProvider::default() };
        let mut dash = dashboard(provider, dir.path());

        let err = dash.search("Zzqx").await.unwrap_err();

        assert!(matches!(err, SearchError::CityNotFound(_)));
        assert_eq!(dash.state().phase, SearchPhase::Idle);
        assert_eq!(dash.state().last_error.as_deref(), Some("City not found"));
        assert!(dash.history().cities.is_empty());
        assert!(dash.history().last_snapshot.is_none());
    }

    #[tokio::test]
    async fn forecast_failure_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().expect("temp dir");

        let mut dash = dashboard(FakeProvider::default(), dir.path());
        dash.search("London").await.expect("first search");

        let provider = FakeProvider { fail_forecast: true, ..FakeProvider::default() };
        let store = HistoryStore::open(dir.path()).expect("reopen store");
        let mut dash = Dashboard::new(Box::new(provider), store);

        let err = dash.search("Paris").await.unwrap_err();

        assert!(matches!(err, SearchError::ForecastFetch(_)));
        // Prior snapshot and history stay as they were before the failure.
        assert_eq!(dash.history().cities, vec!["London"]);
        let last = dash.history().last_snapshot.as_ref().expect("previous snapshot kept");
        assert_eq!(last.weather.location_name, "London");
    }

    #[tokio::test]
    async fn repeat_search_refetches_live_data() {
        let dir = tempfile::tempdir().expect("temp dir");
        let calls = Arc::new(AtomicUsize::new(0));
        let provider =
            FakeProvider { resolve_calls: Arc::clone(&calls), ..FakeProvider::default() };
        let mut dash = dashboard(provider, dir.path());

        dash.search("London").await.expect("search");
        dash.search("London").await.expect("search");

        // Never served from a cache: every submission resolves again.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn overlapping_search_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut dash = dashboard(FakeProvider::default(), dir.path());

        dash.state.phase = SearchPhase::Searching;
        let err = dash.search("London").await.unwrap_err();

        assert!(matches!(err, SearchError::SearchInProgress));
    }
}
