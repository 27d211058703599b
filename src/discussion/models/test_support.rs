//! Test helpers for constructing discussion fixtures.
//!
//! # Examples
//!
//! ```
//! use pagethread::discussion::models::test_support::{comment_with_id, page_with_comments};
//!
//! let page = page_with_comments(&["C_1", "C_2"], None);
//! assert_eq!(page.discussion.comments.len(), 2);
//! assert_eq!(comment_with_id("C_9").id, "C_9");
//! ```

use chrono::{DateTime, Utc};

use super::{Author, Comment, Discussion, DiscussionPage, ReactionGroups, Reply};
use crate::discussion::pagination::PageInfo;

fn fixture_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_621_084_874, 0).unwrap_or_default()
}

fn fixture_author(login: &str) -> Author {
    Author {
        login: login.to_owned(),
        avatar_url: format!("https://avatars.githubusercontent.com/{login}"),
        url: format!("https://github.com/{login}"),
    }
}

/// Creates a comment with the given id, no replies, and a body of
/// `<p>Comment {id}</p>`.
#[must_use]
pub fn comment_with_id(id: &str) -> Comment {
    Comment {
        id: id.to_owned(),
        author: fixture_author("alice"),
        author_association: "NONE".to_owned(),
        body_html: format!("<p>Comment {id}</p>"),
        created_at: fixture_timestamp(),
        reactions: ReactionGroups::empty(),
        viewer_can_upvote: true,
        ..Default::default()
    }
}

/// Creates a reply with the given id under the given parent comment.
#[must_use]
pub fn reply_with_id(id: &str, reply_to_id: &str) -> Reply {
    Reply {
        id: id.to_owned(),
        reply_to_id: reply_to_id.to_owned(),
        author: fixture_author("bob"),
        author_association: "NONE".to_owned(),
        body_html: format!("<p>Reply {id}</p>"),
        created_at: fixture_timestamp(),
        reactions: ReactionGroups::empty(),
        ..Default::default()
    }
}

/// Creates a page holding comments with the given ids.
///
/// When `end_cursor` is `Some`, the page reports a next page at that cursor;
/// otherwise it is the last page.
#[must_use]
pub fn page_with_comments(ids: &[&str], end_cursor: Option<&str>) -> DiscussionPage {
    let page_info = PageInfo::default()
        .with_has_next_page(end_cursor.is_some())
        .with_end_cursor(end_cursor.map(ToOwned::to_owned));
    let comments: Vec<Comment> = ids.iter().map(|id| comment_with_id(id)).collect();
    DiscussionPage {
        viewer: None,
        discussion: Discussion {
            id: Some("D_1".to_owned()),
            url: Some("https://github.com/octo/blog/discussions/1".to_owned()),
            total_comment_count: u32::try_from(comments.len()).unwrap_or(u32::MAX),
            reactions: ReactionGroups::empty(),
            page_info,
            comments,
            ..Default::default()
        },
    }
}
