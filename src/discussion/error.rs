//! Error types exposed by the discussion client.

use thiserror::Error;

/// Errors surfaced while building queries, fetching pages, or talking to
/// GitHub.
///
/// The variants follow three transport classes: [`Self::Network`] has no
/// status, [`Self::Http`] carries the HTTP status that drives the revalidation
/// gate, and GraphQL-level failures are never errors at all (they arrive as
/// data inside [`crate::github::GraphQlResponse`]).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscussionError {
    /// The query did not name a repository.
    #[error("repository is required (use --repo)")]
    MissingRepository,

    /// The repository was not in `owner/name` form.
    #[error("repository must be in owner/name form: {0}")]
    InvalidRepository(String),

    /// The supplied URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The discussion query is inconsistent.
    #[error("invalid discussion query: {message}")]
    InvalidQuery {
        /// Description of the offending field.
        message: String,
    },

    /// The authentication token was missing.
    #[error("access token is required")]
    MissingToken,

    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Http {
        /// HTTP status code of the response.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// Networking failed before a response arrived.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A successful response could not be decoded.
    #[error("response decoding failed: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },

    /// The GitHub client failed for a reason other than transport or status.
    #[error("GitHub API error: {message}")]
    Api {
        /// Error detail from the client.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl DiscussionError {
    /// Returns the HTTP status carried by the error, if any.
    ///
    /// Transport failures and local errors have no status.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
