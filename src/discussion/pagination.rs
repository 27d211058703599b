//! Cursor pagination state for discussion comment pages.
//!
//! GitHub Discussions paginate comments with opaque cursors rather than page
//! numbers. [`PageInfo`] mirrors the `pageInfo` object returned with every
//! page, and [`PaginationParams`] carries the caller's explicit bounds.

use serde::{Deserialize, Serialize};

/// Cursor state reported alongside one page of comments.
///
/// # Example
///
/// ```
/// use pagethread::discussion::pagination::PageInfo;
///
/// let info = PageInfo::default()
///     .with_end_cursor(Some("Y3Vyc29yOjE=".to_owned()))
///     .with_has_next_page(true);
/// assert!(info.has_next_page());
/// assert_eq!(info.end_cursor(), Some("Y3Vyc29yOjE="));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    has_next_page: bool,
    has_previous_page: bool,
    start_cursor: Option<String>,
    end_cursor: Option<String>,
}

impl PageInfo {
    /// Sets whether more comments exist after this page.
    #[must_use]
    pub const fn with_has_next_page(mut self, has_next_page: bool) -> Self {
        self.has_next_page = has_next_page;
        self
    }

    /// Sets whether comments exist before this page.
    #[must_use]
    pub const fn with_has_previous_page(mut self, has_previous_page: bool) -> Self {
        self.has_previous_page = has_previous_page;
        self
    }

    /// Sets the cursor of the first comment on this page.
    #[must_use]
    pub fn with_start_cursor(mut self, start_cursor: Option<String>) -> Self {
        self.start_cursor = start_cursor;
        self
    }

    /// Sets the cursor of the last comment on this page.
    #[must_use]
    pub fn with_end_cursor(mut self, end_cursor: Option<String>) -> Self {
        self.end_cursor = end_cursor;
        self
    }

    /// Returns true if more comments exist after this page.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Returns true if comments exist before this page.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    /// Returns the cursor of the first comment on this page.
    #[must_use]
    pub fn start_cursor(&self) -> Option<&str> {
        self.start_cursor.as_deref()
    }

    /// Returns the cursor of the last comment on this page.
    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }
}

/// Explicit pagination bounds supplied by the caller.
///
/// `first` and `last` bound the number of comments per page. An explicit
/// zero for either disables fetching entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// Number of comments to take from the start.
    pub first: Option<u32>,
    /// Number of comments to take from the end.
    pub last: Option<u32>,
    /// Cursor after which to start.
    pub after: Option<String>,
    /// Cursor before which to stop.
    pub before: Option<String>,
}

impl PaginationParams {
    /// Returns true when an explicit zero page size turns pagination off.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self.first, Some(0)) || matches!(self.last, Some(0))
    }
}
