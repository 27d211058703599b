//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pagethread.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PAGETHREAD_REPO`, `PAGETHREAD_TOKEN`, or
//!    `GITHUB_TOKEN` for the token
//! 4. **Command-line arguments** – `--repo`/`-r`, `--term`, `--token`/`-k`
//!    and friends
//!
//! # Configuration File
//!
//! ```toml
//! repo = "octo/blog"
//! term = "posts/hello-world"
//! category = "Announcements"
//! pages = 2
//! error_retry_count = 3
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::discussion::error::DiscussionError;
use crate::discussion::fetcher::DEFAULT_API_URL;
use crate::discussion::gate::RevalidationOptions;
use crate::discussion::pagination::PaginationParams;
use crate::discussion::query::DiscussionQuery;
use crate::embed::{DEFAULT_CLIENT_URL, EmbedScript, Mapping};
use crate::github::gateway::{CreateDiscussionInput, DEFAULT_GRAPHQL_API_URL};
use crate::github::locator::{PersonalAccessToken, RepositorySlug};

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Load a discussion and print its comment tree.
    ShowDiscussion,
    /// Create a discussion through the GraphQL API.
    CreateDiscussion,
    /// Print the embed `<script>` tag.
    EmbedSnippet,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pagethread::PagethreadConfig;
///
/// let config = PagethreadConfig::load().expect("failed to load configuration");
/// let query = config.discussion_query().expect("repository and term required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PAGETHREAD",
    discovery(
        dotfile_name = ".pagethread.toml",
        config_file_name = "pagethread.toml",
        app_name = "pagethread"
    )
)]
pub struct PagethreadConfig {
    /// Origin of the discussions endpoint.
    ///
    /// Defaults to `https://giscus.app`.
    #[ortho_config()]
    pub api_url: Option<String>,

    /// Repository in `owner/name` form.
    ///
    /// Can be provided via:
    /// - CLI: `--repo <OWNER/NAME>` or `-r <OWNER/NAME>`
    /// - Environment: `PAGETHREAD_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Search term identifying the discussion, interpreted through `mapping`.
    #[ortho_config()]
    pub term: Option<String>,

    /// Discussion number; takes priority over `term`.
    #[ortho_config(cli_short = 'n')]
    pub number: Option<u64>,

    /// Discussion category used to narrow the term search.
    #[ortho_config()]
    pub category: Option<String>,

    /// Access token for the discussions endpoint and the GraphQL API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-k <TOKEN>`
    /// - Environment: `PAGETHREAD_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 'k')]
    pub token: Option<String>,

    /// Comments per page, counted from the start.
    #[ortho_config()]
    pub first: Option<u32>,

    /// Comments per page, counted from the end.
    #[ortho_config()]
    pub last: Option<u32>,

    /// Cursor before which pagination stops.
    #[ortho_config()]
    pub before: Option<String>,

    /// Number of pages to load. Defaults to 1.
    #[ortho_config(cli_short = 'p')]
    pub pages: usize,

    /// Maximum retries of a failed page fetch. Defaults to 3.
    #[ortho_config()]
    pub error_retry_count: u32,

    /// Base delay between retries in milliseconds. Defaults to 5000.
    #[ortho_config()]
    pub error_retry_interval_ms: u64,

    /// Base URL of the GitHub API used for mutations.
    #[ortho_config()]
    pub graphql_api_url: Option<String>,

    /// Node id of the repository, required to create or embed.
    #[ortho_config()]
    pub repo_id: Option<String>,

    /// Node id of the discussion category, required to create or embed.
    #[ortho_config()]
    pub category_id: Option<String>,

    /// Title of the discussion to create.
    #[ortho_config()]
    pub title: Option<String>,

    /// Markdown body of the discussion to create.
    #[ortho_config()]
    pub body: Option<String>,

    /// Creates a discussion instead of showing one.
    ///
    /// Can be provided via:
    /// - CLI: `--create-discussion`
    /// - Config file: `create_discussion = true`
    #[ortho_config()]
    pub create_discussion: bool,

    /// Prints the embed `<script>` tag instead of showing a discussion.
    #[ortho_config()]
    pub embed: bool,

    /// Page-to-discussion mapping: `pathname`, `url`, `title`, `og:title`,
    /// `specific` or `number`.
    #[ortho_config()]
    pub mapping: Option<String>,

    /// Theme written into the embed tag.
    #[ortho_config()]
    pub theme: Option<String>,

    /// Writes cache telemetry to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,
}

const DEFAULT_PAGES: usize = 1;
const DEFAULT_ERROR_RETRY_COUNT: u32 = 3;
const DEFAULT_ERROR_RETRY_INTERVAL_MS: u64 = 5_000;
const DEFAULT_THEME: &str = "preferred_color_scheme";

impl Default for PagethreadConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            repo: None,
            term: None,
            number: None,
            category: None,
            token: None,
            first: None,
            last: None,
            before: None,
            pages: DEFAULT_PAGES,
            error_retry_count: DEFAULT_ERROR_RETRY_COUNT,
            error_retry_interval_ms: DEFAULT_ERROR_RETRY_INTERVAL_MS,
            graphql_api_url: None,
            repo_id: None,
            category_id: None,
            title: None,
            body: None,
            create_discussion: false,
            embed: false,
            mapping: None,
            theme: None,
            telemetry: false,
        }
    }
}

impl PagethreadConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, DiscussionError> {
        let raw = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(DiscussionError::MissingToken)?;
        PersonalAccessToken::new(raw)
    }

    /// Returns the configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::MissingRepository`] when unset and
    /// [`DiscussionError::InvalidRepository`] when malformed.
    pub fn require_repository(&self) -> Result<RepositorySlug, DiscussionError> {
        RepositorySlug::parse(self.repo.as_deref().unwrap_or_default())
    }

    /// Returns the configured mapping, `pathname` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::Configuration`] for an unknown mapping name.
    pub fn mapping(&self) -> Result<Mapping, DiscussionError> {
        self.mapping
            .as_deref()
            .map_or_else(|| Ok(Mapping::default()), str::parse)
    }

    /// Builds the discussion query from `repo`, `number`, `term` and
    /// `category`.
    ///
    /// An explicit `number` wins; otherwise `term` is interpreted through the
    /// configured mapping.
    ///
    /// # Errors
    ///
    /// Returns a repository error when `repo` is missing or malformed, and
    /// [`DiscussionError::InvalidQuery`] when the discussion cannot be
    /// identified.
    pub fn discussion_query(&self) -> Result<DiscussionQuery, DiscussionError> {
        let repository = self.require_repository()?.name_with_owner();
        let mut query = match (self.number, self.term.as_deref()) {
            (Some(number), _) => DiscussionQuery::for_number(repository, number),
            (None, Some(term)) => self.mapping()?.query_for(&repository, term)?,
            (None, None) => DiscussionQuery {
                repo: repository,
                ..DiscussionQuery::default()
            },
        };
        if let Some(category) = self.category.as_deref().filter(|name| !name.is_empty()) {
            query = query.with_category(category);
        }
        query.validate()?;
        Ok(query)
    }

    /// Returns the pagination bounds for the first page.
    #[must_use]
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            first: self.first,
            last: self.last,
            after: None,
            before: self.before.clone(),
        }
    }

    /// Returns the revalidation options with the configured retry budget.
    #[must_use]
    pub fn revalidation_options(&self) -> RevalidationOptions {
        RevalidationOptions {
            error_retry_count: self.error_retry_count,
            error_retry_interval: Duration::from_millis(self.error_retry_interval_ms),
            ..RevalidationOptions::default()
        }
    }

    /// Origin of the discussions endpoint.
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Base URL of the GitHub API.
    #[must_use]
    pub fn graphql_api_url(&self) -> &str {
        self.graphql_api_url
            .as_deref()
            .unwrap_or(DEFAULT_GRAPHQL_API_URL)
    }

    /// Builds the input of the `createDiscussion` mutation.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::Configuration`] when `repo_id`,
    /// `category_id` or `title` is missing.
    pub fn create_discussion_input(&self) -> Result<CreateDiscussionInput, DiscussionError> {
        Ok(CreateDiscussionInput {
            repository_id: required(self.repo_id.as_deref(), "--repo-id")?,
            category_id: required(self.category_id.as_deref(), "--category-id")?,
            title: required(self.title.as_deref(), "--title")?,
            body: self.body.clone().unwrap_or_default(),
        })
    }

    /// Builds the embed tag description.
    ///
    /// # Errors
    ///
    /// Returns repository or [`DiscussionError::Configuration`] errors when
    /// a required value is missing.
    pub fn embed_script(&self) -> Result<EmbedScript, DiscussionError> {
        Ok(EmbedScript {
            client_url: DEFAULT_CLIENT_URL.to_owned(),
            repo: self.require_repository()?.name_with_owner(),
            repo_id: required(self.repo_id.as_deref(), "--repo-id")?,
            category: self.category.clone(),
            category_id: required(self.category_id.as_deref(), "--category-id")?,
            mapping: self.mapping()?,
            term: self
                .term
                .clone()
                .or_else(|| self.number.map(|number| number.to_string())),
            theme: self
                .theme
                .clone()
                .unwrap_or_else(|| DEFAULT_THEME.to_owned()),
        })
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// Returns `CreateDiscussion` when discussion creation is requested,
    /// `EmbedSnippet` when the embed tag is requested, and
    /// `ShowDiscussion` otherwise.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.create_discussion {
            OperationMode::CreateDiscussion
        } else if self.embed {
            OperationMode::EmbedSnippet
        } else {
            OperationMode::ShowDiscussion
        }
    }
}

fn required(value: Option<&str>, flag: &str) -> Result<String, DiscussionError> {
    value
        .map(str::trim)
        .filter(|present| !present.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| DiscussionError::Configuration {
            message: format!("{flag} is required"),
        })
}

#[cfg(test)]
mod tests;
