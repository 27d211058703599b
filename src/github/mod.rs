//! GitHub access for discussion creation.
//!
//! Reading discussions goes through the discussions endpoint (see
//! [`crate::discussion`]); creating one talks to the GitHub GraphQL API
//! directly through Octocrab.

pub mod gateway;
pub mod graphql;
pub mod locator;

pub use gateway::{
    CreateDiscussionInput, CreateDiscussionResponse, DEFAULT_GRAPHQL_API_URL, DiscussionGateway,
    OctocrabDiscussionGateway,
};
pub use graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use locator::{PersonalAccessToken, RepositorySlug};

#[cfg(test)]
pub use gateway::MockDiscussionGateway;
