//! Pagethread library crate providing a GitHub Discussions comments client.
//!
//! The library keeps the comment pages of one discussion in a revalidating
//! cache, applies optimistic edits while confirming them against the
//! server, suppresses automatic refetches after permanent errors, and
//! creates discussions through the GitHub GraphQL API.

#![recursion_limit = "256"]

pub mod config;
pub mod discussion;
pub mod embed;
pub mod github;
pub mod telemetry;

pub use config::{OperationMode, PagethreadConfig};
pub use discussion::{
    Author, Comment, Confirmation, DEFAULT_API_URL, Discussion, DiscussionCache, DiscussionError,
    DiscussionPage, DiscussionQuery, ErrorStatus, HttpPageFetcher, NO_ERROR, PageFetcher,
    PageInfo, PaginationParams, PermanentErrorGate, QueryKey, Reaction, ReactionGroup,
    ReactionGroups, Reply, Revalidation, RevalidationOptions, RevalidationPolicy,
    RevalidationTrigger, Snapshot, page_key, should_revalidate,
};
pub use embed::{EmbedScript, Mapping};
pub use github::{
    CreateDiscussionInput, CreateDiscussionResponse, DiscussionGateway, GraphQlError,
    OctocrabDiscussionGateway, PersonalAccessToken, RepositorySlug,
};
