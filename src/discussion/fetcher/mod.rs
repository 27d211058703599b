//! Page fetching against the discussions endpoint.
//!
//! The trait seam lets the cache run against a mock in tests while
//! [`HttpPageFetcher`] issues the real requests. Every failure is normalised
//! into a [`DiscussionError`]; non-success responses keep their status so
//! the revalidation gate can inspect it.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::github::PersonalAccessToken;

use super::error::DiscussionError;
use super::models::DiscussionPage;
use super::query::QueryKey;

/// Default origin of the discussions endpoint.
pub const DEFAULT_API_URL: &str = "https://giscus.app";

/// Loads one page of discussion data for a key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page addressed by `key`.
    async fn fetch(&self, key: &QueryKey) -> Result<DiscussionPage, DiscussionError>;
}

/// `reqwest`-backed fetcher for the discussions endpoint.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    api_url: Url,
    token: Option<PersonalAccessToken>,
}

impl HttpPageFetcher {
    /// Creates a fetcher for the endpoint at `api_url`.
    ///
    /// A path on `api_url` is kept as a prefix, so `https://host/comments`
    /// serves pages from `https://host/comments/api/discussions`.
    ///
    /// Requests carry `Authorization: Bearer <token>` when a token is given.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::InvalidUrl`] when `api_url` cannot be parsed
    /// and [`DiscussionError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn new(api_url: &str, token: Option<PersonalAccessToken>) -> Result<Self, DiscussionError> {
        let mut parsed =
            Url::parse(api_url).map_err(|error| DiscussionError::InvalidUrl(error.to_string()))?;
        if !parsed.path().ends_with('/') {
            let directory = format!("{}/", parsed.path());
            parsed.set_path(&directory);
        }
        let client = Client::builder()
            .build()
            .map_err(|error| DiscussionError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;
        Ok(Self {
            client,
            api_url: parsed,
            token,
        })
    }

    fn endpoint(&self, key: &QueryKey) -> Result<Url, DiscussionError> {
        self.api_url
            .join(key.as_str().trim_start_matches('/'))
            .map_err(|error| DiscussionError::InvalidUrl(error.to_string()))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, key: &QueryKey) -> Result<DiscussionPage, DiscussionError> {
        let endpoint = self.endpoint(key)?;
        tracing::debug!(%key, "fetching discussion page");

        let mut request = self
            .client
            .get(endpoint)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.value());
        }

        let response = request
            .send()
            .await
            .map_err(|error| DiscussionError::Network {
                message: format!("discussion request transport failed: {error}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .or_else(|| status.canonical_reason().map(ToOwned::to_owned))
                .unwrap_or_else(|| "unknown error".to_owned());
            tracing::debug!(%key, status = status.as_u16(), "discussion request failed");
            return Err(DiscussionError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<DiscussionPage>()
            .await
            .map_err(|error| DiscussionError::Decode {
                message: format!("discussion page deserialisation failed: {error}"),
            })
    }
}

/// Pulls the `error` (or GitHub-style `message`) field out of a JSON error
/// body.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
