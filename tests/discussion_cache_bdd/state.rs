//! Scenario state for the discussion cache BDD tests.

use std::sync::Arc;

use pagethread::discussion::models::test_support::page_with_comments;
use pagethread::telemetry::test_support::RecordingTelemetrySink;
use pagethread::{DiscussionCache, DiscussionError, HttpPageFetcher, Snapshot};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::{Mock, MockServer};

use super::runtime::{ScenarioRuntime, scenario_runtime};

/// Cache under test, backed by the mock server.
pub(crate) type HttpCache = DiscussionCache<HttpPageFetcher>;

#[derive(ScenarioState, Default)]
pub(crate) struct CacheState {
    pub(crate) runtime: Slot<ScenarioRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) cache: Slot<Arc<HttpCache>>,
    pub(crate) telemetry: Slot<Arc<RecordingTelemetrySink>>,
    pub(crate) optimistic: Slot<Snapshot>,
    pub(crate) confirmed: Slot<Snapshot>,
    pub(crate) error: Slot<DiscussionError>,
}

impl CacheState {
    pub(crate) fn runtime(&self) -> ScenarioRuntime {
        scenario_runtime(&self.runtime, &self.server)
    }

    pub(crate) fn server_uri(&self) -> String {
        self.server
            .with_ref(MockServer::uri)
            .unwrap_or_else(|| panic!("mock server not initialised"))
    }

    pub(crate) fn cache(&self) -> Arc<HttpCache> {
        self.cache
            .get()
            .unwrap_or_else(|| panic!("cache not initialised"))
    }
}

/// Mounts `mock` on the scenario's server.
pub(crate) fn seed(state: &CacheState, mock: Mock) {
    let runtime = state.runtime();
    state
        .server
        .with_ref(|server| {
            runtime.block_on(mock.mount(server));
        })
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// JSON body of a page holding `ids`, continuing at `end_cursor`.
pub(crate) fn page_json(ids: &[&str], end_cursor: Option<&str>) -> serde_json::Value {
    serde_json::to_value(page_with_comments(ids, end_cursor))
        .unwrap_or_else(|error| panic!("page should serialise: {error}"))
}
