//! Behavioural tests for discussion creation through the GraphQL API.

#[path = "create_discussion_bdd/mod.rs"]
mod create_discussion_bdd_support;

use create_discussion_bdd_support::{CreationState, run_create_discussion, seed};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[fixture]
fn creation_state() -> CreationState {
    CreationState::default()
}

fn graphql_mock(response: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("graphql-features", "discussions_api"))
        .respond_with(response)
}

#[given("a GraphQL server that creates discussion {id}")]
fn seed_created_discussion(creation_state: &CreationState, id: String) {
    let body = json!({
        "data": { "createDiscussion": { "discussion": { "id": id.trim_matches('"') } } }
    });
    seed(
        creation_state,
        graphql_mock(ResponseTemplate::new(200).set_body_json(body)),
    );
}

#[given("a GraphQL server that rejects the category")]
fn seed_rejected_category(creation_state: &CreationState) {
    let body = json!({
        "data": { "createDiscussion": null },
        "errors": [{
            "type": "NOT_FOUND",
            "path": ["createDiscussion"],
            "message": "Could not resolve to a node with the global id of 'DIC_kwDOAAAAAA'"
        }]
    });
    seed(
        creation_state,
        graphql_mock(ResponseTemplate::new(200).set_body_json(body)),
    );
}

#[given("a GraphQL server answering {status:u16}")]
fn seed_http_failure(creation_state: &CreationState, status: u16) {
    let body = json!({
        "message": "Bad credentials",
        "documentation_url": "https://docs.github.com/graphql"
    });
    seed(
        creation_state,
        graphql_mock(ResponseTemplate::new(status).set_body_json(body)),
    );
}

#[given("a personal access token {token}")]
fn remember_token(creation_state: &CreationState, token: String) {
    creation_state
        .token
        .set(token.trim_matches('"').to_owned());
}

#[when("the client creates a discussion titled {title} in {repository}")]
fn create_discussion(creation_state: &CreationState, title: String, repository: String) {
    match run_create_discussion(
        creation_state,
        repository.trim_matches('"'),
        title.trim_matches('"'),
    ) {
        Ok(response) => creation_state.response.set(response),
        Err(error) => creation_state.error.set(error),
    }
}

#[then("the created discussion id is {id}")]
fn assert_created_id(creation_state: &CreationState, id: String) {
    let created = creation_state
        .response
        .with_ref(|response| response.discussion_id().map(ToOwned::to_owned))
        .unwrap_or_else(|| panic!("expected a GraphQL response"));
    assert_eq!(created.as_deref(), Some(id.trim_matches('"')));
}

#[then("no discussion id is returned")]
fn assert_no_id(creation_state: &CreationState) {
    let created = creation_state
        .response
        .with_ref(|response| response.discussion_id().map(ToOwned::to_owned))
        .unwrap_or_else(|| panic!("expected a GraphQL response"));
    assert!(created.is_none(), "unexpected id {created:?}");
}

#[then("the GraphQL error mentions {fragment}")]
fn assert_graphql_error(creation_state: &CreationState, fragment: String) {
    let messages = creation_state
        .response
        .with_ref(|response| {
            response
                .errors
                .iter()
                .map(|error| error.message.clone())
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|| panic!("expected a GraphQL response"));
    let expected = fragment.trim_matches('"');
    assert!(
        messages.iter().any(|message| message.contains(expected)),
        "expected an error containing `{expected}`, got {messages:?}"
    );
}

#[then("the error status is {status:u16}")]
fn assert_error_status(creation_state: &CreationState, status: u16) {
    let actual = creation_state
        .error
        .with_ref(pagethread::DiscussionError::status)
        .unwrap_or_else(|| panic!("expected an error"));
    assert_eq!(actual, Some(status));
}

#[scenario(path = "tests/features/create_discussion.feature", index = 0)]
fn create_discussion_success(creation_state: CreationState) {
    let _ = creation_state;
}

#[scenario(path = "tests/features/create_discussion.feature", index = 1)]
fn create_discussion_graphql_errors(creation_state: CreationState) {
    let _ = creation_state;
}

#[scenario(path = "tests/features/create_discussion.feature", index = 2)]
fn create_discussion_http_failure(creation_state: CreationState) {
    let _ = creation_state;
}
