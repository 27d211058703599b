//! Discussion data synchronisation.
//!
//! This module holds the client-side view of one discussion: the page
//! models, the keys used to request them, the fetcher that loads them, and
//! the [`DiscussionCache`] that keeps the page sequence consistent across
//! optimistic mutations and background revalidation.

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod gate;
pub mod models;
pub mod pagination;
pub mod query;

pub use cache::{Confirmation, DiscussionCache, Revalidation, Snapshot, page_key};
pub use error::DiscussionError;
pub use fetcher::{DEFAULT_API_URL, HttpPageFetcher, PageFetcher};
pub use gate::{
    ErrorStatus, NO_ERROR, PermanentErrorGate, RevalidationOptions, RevalidationPolicy,
    RevalidationTrigger, should_revalidate,
};
pub use models::{
    Author, Comment, Discussion, DiscussionPage, Reaction, ReactionGroup, ReactionGroups, Reply,
};
pub use pagination::{PageInfo, PaginationParams};
pub use query::{DiscussionQuery, QueryKey};
