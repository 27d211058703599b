//! Discussion queries and the cache keys derived from them.
//!
//! A [`QueryKey`] is the request path of one page. Keys are built from an
//! ordered list of parameters with empty values stripped, so two logically
//! identical queries always produce byte-identical keys.

use std::fmt;

use url::form_urlencoded;

use super::error::DiscussionError;
use super::pagination::PaginationParams;

/// Path of the discussions endpoint that every key targets.
pub const DISCUSSIONS_PATH: &str = "/api/discussions";

/// Identifies which discussion a page belongs to.
///
/// A query resolves to a discussion either by search term or by number;
/// `category` narrows the term search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscussionQuery {
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Search term matched against discussion titles.
    pub term: Option<String>,
    /// Discussion number.
    pub number: Option<u64>,
    /// Discussion category name.
    pub category: Option<String>,
}

impl DiscussionQuery {
    /// Creates a term-based query.
    #[must_use]
    pub fn for_term(repo: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            term: Some(term.into()),
            ..Self::default()
        }
    }

    /// Creates a number-based query.
    #[must_use]
    pub fn for_number(repo: impl Into<String>, number: u64) -> Self {
        Self {
            repo: repo.into(),
            number: Some(number),
            ..Self::default()
        }
    }

    /// Sets the category filter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Checks that the query names a repository and a way to find the
    /// discussion.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::MissingRepository`] when `repo` is blank and
    /// [`DiscussionError::InvalidQuery`] when neither term nor number is set.
    pub fn validate(&self) -> Result<(), DiscussionError> {
        if self.repo.trim().is_empty() {
            return Err(DiscussionError::MissingRepository);
        }
        let has_term = self.term.as_deref().is_some_and(|term| !term.is_empty());
        if !has_term && self.number.is_none() {
            return Err(DiscussionError::InvalidQuery {
                message: "either a term or a discussion number is required".to_owned(),
            });
        }
        Ok(())
    }

    fn params(&self) -> [(&'static str, Option<String>); 4] {
        [
            ("repo", Some(self.repo.clone())),
            ("term", self.term.clone()),
            ("number", self.number.map(|number| number.to_string())),
            ("category", self.category.clone()),
        ]
    }
}

/// Deterministic key of one page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    /// Builds a key from ordered parameters, dropping absent and empty values.
    #[must_use]
    pub fn from_params<I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Option<String>)>,
    {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in params {
            if let Some(present) = value.filter(|candidate| !candidate.is_empty()) {
                serializer.append_pair(name, &present);
            }
        }
        let encoded = serializer.finish();
        if encoded.is_empty() {
            Self(DISCUSSIONS_PATH.to_owned())
        } else {
            Self(format!("{DISCUSSIONS_PATH}?{encoded}"))
        }
    }

    /// Key of the first page: the query followed by the caller's bounds.
    #[must_use]
    pub fn first_page(query: &DiscussionQuery, pagination: &PaginationParams) -> Self {
        let bounds = [
            ("first", pagination.first.map(|first| first.to_string())),
            ("last", pagination.last.map(|last| last.to_string())),
            ("after", pagination.after.clone()),
            ("before", pagination.before.clone()),
        ];
        Self::from_params(query.params().into_iter().chain(bounds))
    }

    /// Key of a later page: the query bound after `end_cursor`, keeping any
    /// explicit `before` bound.
    #[must_use]
    pub fn next_page(
        query: &DiscussionQuery,
        pagination: &PaginationParams,
        end_cursor: Option<&str>,
    ) -> Self {
        let bounds = [
            ("after", end_cursor.map(ToOwned::to_owned)),
            ("before", pagination.before.clone()),
        ];
        Self::from_params(query.params().into_iter().chain(bounds))
    }

    /// Borrow the key as a path with query string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
