//! Error mapping from Octocrab into discussion errors.

use crate::discussion::error::DiscussionError;

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Maps an Octocrab failure onto the shared error type.
///
/// GitHub error responses keep their status so callers can tell permanent
/// failures from transient ones.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> DiscussionError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return DiscussionError::Http {
            status: source.status_code.as_u16(),
            message: format!("{operation} failed: {message}", message = source.message),
        };
    }

    if is_network_error(error) {
        return DiscussionError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    if let octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } = error {
        return DiscussionError::Decode {
            message: format!("{operation} failed: {error}"),
        };
    }

    DiscussionError::Api {
        message: format!("{operation} failed: {error}"),
    }
}
