//! Gateway for creating discussions through the GitHub GraphQL API.
//!
//! The trait seam lets the CLI run against a mock in tests while the
//! Octocrab implementation issues the real mutation. Exactly one request is
//! sent per call; transport and HTTP failures become errors, GraphQL errors
//! come back inside the response.

mod client;
mod create_discussion;
mod error_mapping;

pub use create_discussion::{
    CREATE_DISCUSSION_MUTATION, CreateDiscussionData, CreateDiscussionInput,
    CreateDiscussionPayload, CreateDiscussionResponse, CreatedDiscussion, DEFAULT_GRAPHQL_API_URL,
    OctocrabDiscussionGateway,
};

use async_trait::async_trait;

use crate::discussion::error::DiscussionError;
use crate::github::locator::RepositorySlug;

/// Gateway that can create discussions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscussionGateway: Send + Sync {
    /// Create a discussion in `repository`.
    ///
    /// GraphQL-level errors are returned inside the response, not as `Err`.
    async fn create_discussion(
        &self,
        repository: &RepositorySlug,
        input: &CreateDiscussionInput,
    ) -> Result<CreateDiscussionResponse, DiscussionError>;
}
