//! Scenario state for the discussion creation BDD tests.

use pagethread::{
    CreateDiscussionInput, CreateDiscussionResponse, DiscussionError, DiscussionGateway,
    OctocrabDiscussionGateway, PersonalAccessToken, RepositorySlug,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::{Mock, MockServer};

use super::runtime::{ScenarioRuntime, scenario_runtime};

#[derive(ScenarioState, Default)]
pub(crate) struct CreationState {
    pub(crate) runtime: Slot<ScenarioRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) token: Slot<String>,
    pub(crate) response: Slot<CreateDiscussionResponse>,
    pub(crate) error: Slot<DiscussionError>,
}

/// Mounts `mock` on the scenario's server.
pub(crate) fn seed(state: &CreationState, mock: Mock) {
    let runtime = scenario_runtime(&state.runtime, &state.server);
    state
        .server
        .with_ref(|server| {
            runtime.block_on(mock.mount(server));
        })
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// Runs the `createDiscussion` mutation against the mock server.
pub(crate) fn run_create_discussion(
    state: &CreationState,
    repository: &str,
    title: &str,
) -> Result<CreateDiscussionResponse, DiscussionError> {
    let server_url = state
        .server
        .with_ref(MockServer::uri)
        .ok_or_else(|| DiscussionError::Api {
            message: "mock server URL missing".to_owned(),
        })?;
    let runtime = state.runtime.get().ok_or_else(|| DiscussionError::Api {
        message: "runtime not initialised".to_owned(),
    })?;
    let slug = RepositorySlug::parse(repository)?;
    let input = CreateDiscussionInput {
        repository_id: "R_kgDOAAAAAA".to_owned(),
        category_id: "DIC_kwDOAAAAAA".to_owned(),
        title: title.to_owned(),
        body: String::new(),
    };

    runtime.block_on(async {
        let token_value = state.token.get().ok_or(DiscussionError::MissingToken)?;
        let token = PersonalAccessToken::new(token_value)?;
        let gateway = OctocrabDiscussionGateway::for_token(&token, &server_url)?;
        gateway.create_discussion(&slug, &input).await
    })
}
