//! Octocrab client construction for the GraphQL gateway.

use http::Uri;
use http::header::HeaderName;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use url::Url;

use crate::discussion::error::DiscussionError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Opts GraphQL requests into the discussions schema.
const GRAPHQL_FEATURES: HeaderName = HeaderName::from_static("graphql-features");
const DISCUSSIONS_API_FEATURE: &str = "discussions_api";

/// Validates `api_base` as an absolute HTTP(S) URL and converts it for
/// Octocrab.
fn graphql_base(api_base: &str) -> Result<Uri, DiscussionError> {
    let parsed =
        Url::parse(api_base).map_err(|error| DiscussionError::InvalidUrl(error.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DiscussionError::InvalidUrl(format!(
            "unsupported scheme `{}` in {api_base}",
            parsed.scheme()
        )));
    }
    parsed
        .as_str()
        .parse::<Uri>()
        .map_err(|error| DiscussionError::InvalidUrl(error.to_string()))
}

/// Builds an Octocrab client that authenticates with `token` and sends the
/// discussions feature header on every request.
///
/// Retries are disabled: each mutation is sent exactly once.
///
/// # Errors
///
/// Returns `DiscussionError::InvalidUrl` for a malformed or non-HTTP base and
/// `DiscussionError::Api` when Octocrab rejects the configuration.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, DiscussionError> {
    let base_uri = graphql_base(api_base)?;

    Octocrab::builder()
        .add_retry_config(RetryConfig::None)
        .personal_token(token.value())
        .add_header(GRAPHQL_FEATURES, DISCUSSIONS_API_FEATURE.to_owned())
        .base_uri(base_uri)
        .map_err(|error| DiscussionError::Api {
            message: format!("invalid GraphQL base: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
