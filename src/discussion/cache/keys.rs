//! Per-page key derivation.

use crate::discussion::models::DiscussionPage;
use crate::discussion::pagination::PaginationParams;
use crate::discussion::query::{DiscussionQuery, QueryKey};

/// Returns the key of page `page_index`, or `None` when pagination stops.
///
/// Pagination stops when an explicit zero page size is configured, or when
/// the previous page is missing or reports no next page. Later pages bind
/// `after` to the previous page's end cursor.
///
/// # Example
///
/// ```
/// use pagethread::discussion::cache::page_key;
/// use pagethread::discussion::{DiscussionQuery, PaginationParams};
///
/// let query = DiscussionQuery::for_term("octo/blog", "hello");
/// let key = page_key(&query, &PaginationParams::default(), 0, None);
/// assert_eq!(
///     key.map(|k| k.to_string()).as_deref(),
///     Some("/api/discussions?repo=octo%2Fblog&term=hello")
/// );
/// ```
#[must_use]
pub fn page_key(
    query: &DiscussionQuery,
    pagination: &PaginationParams,
    page_index: usize,
    previous: Option<&DiscussionPage>,
) -> Option<QueryKey> {
    if pagination.is_disabled() {
        return None;
    }
    if page_index == 0 {
        return Some(QueryKey::first_page(query, pagination));
    }
    let page_info = previous?.page_info();
    if !page_info.has_next_page() {
        return None;
    }
    Some(QueryKey::next_page(
        query,
        pagination,
        page_info.end_cursor(),
    ))
}
