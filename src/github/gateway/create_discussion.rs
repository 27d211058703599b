//! Octocrab implementation of the `createDiscussion` mutation.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::discussion::error::DiscussionError;
use crate::github::graphql::{GraphQlRequest, GraphQlResponse};
use crate::github::locator::{PersonalAccessToken, RepositorySlug};

use super::DiscussionGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

/// Default base URL of the GitHub API.
pub const DEFAULT_GRAPHQL_API_URL: &str = "https://api.github.com";

/// GraphQL document creating a discussion and selecting its id.
pub const CREATE_DISCUSSION_MUTATION: &str = "mutation($input: CreateDiscussionInput!) {
  createDiscussion(input: $input) {
    discussion {
      id
    }
  }
}";

/// Input object of the `createDiscussion` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionInput {
    /// Node id of the repository.
    pub repository_id: String,
    /// Node id of the discussion category.
    pub category_id: String,
    /// Discussion title.
    pub title: String,
    /// Discussion body in Markdown.
    pub body: String,
}

#[derive(Debug, Serialize)]
struct CreateDiscussionVariables<'a> {
    input: &'a CreateDiscussionInput,
}

/// `data` of a `createDiscussion` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionData {
    /// Mutation payload, null when the mutation failed.
    pub create_discussion: Option<CreateDiscussionPayload>,
}

/// Payload of the `createDiscussion` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateDiscussionPayload {
    /// The created discussion.
    pub discussion: CreatedDiscussion,
}

/// Identity of a newly created discussion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedDiscussion {
    /// Node id of the discussion.
    pub id: String,
}

/// Full response of the `createDiscussion` mutation.
pub type CreateDiscussionResponse = GraphQlResponse<CreateDiscussionData>;

impl GraphQlResponse<CreateDiscussionData> {
    /// Returns the id of the created discussion, if the mutation produced one.
    #[must_use]
    pub fn discussion_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.create_discussion.as_ref())
            .map(|payload| payload.discussion.id.as_str())
    }
}

/// Octocrab-backed discussion gateway.
pub struct OctocrabDiscussionGateway {
    client: Octocrab,
}

impl OctocrabDiscussionGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a gateway authenticated with `token` against `api_base`.
    ///
    /// # Errors
    ///
    /// Returns `DiscussionError::InvalidUrl` when the base URI cannot be
    /// parsed or `DiscussionError::Api` when Octocrab fails to construct a
    /// client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, DiscussionError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl DiscussionGateway for OctocrabDiscussionGateway {
    async fn create_discussion(
        &self,
        repository: &RepositorySlug,
        input: &CreateDiscussionInput,
    ) -> Result<CreateDiscussionResponse, DiscussionError> {
        tracing::debug!(%repository, title = %input.title, "creating discussion");
        let request = GraphQlRequest {
            query: CREATE_DISCUSSION_MUTATION,
            variables: CreateDiscussionVariables { input },
        };
        let response: CreateDiscussionResponse = self
            .client
            .graphql(&request)
            .await
            .map_err(|error| map_octocrab_error("create discussion", &error))?;
        if response.has_errors() {
            tracing::debug!(
                %repository,
                errors = response.errors.len(),
                "createDiscussion returned GraphQL errors"
            );
        }
        Ok(response)
    }
}
