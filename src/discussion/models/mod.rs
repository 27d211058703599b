//! Data models representing a discussion and its comment tree.
//!
//! The shapes mirror the JSON served by the discussions endpoint: one
//! [`DiscussionPage`] per fetch, each holding a slice of the discussion's
//! comments with their nested replies. Page snapshots are treated as
//! immutable values; reducers build new pages rather than editing these.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::PageInfo;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Reaction kinds supported by GitHub Discussions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reaction {
    /// 👍
    ThumbsUp,
    /// 👎
    ThumbsDown,
    /// 😄
    Laugh,
    /// 🎉
    Hooray,
    /// 😕
    Confused,
    /// ❤️
    Heart,
    /// 🚀
    Rocket,
    /// 👀
    Eyes,
}

impl Reaction {
    /// Every reaction kind, in GitHub's display order.
    pub const ALL: [Self; 8] = [
        Self::ThumbsUp,
        Self::ThumbsDown,
        Self::Laugh,
        Self::Hooray,
        Self::Confused,
        Self::Heart,
        Self::Rocket,
        Self::Eyes,
    ];

    /// Returns the emoji rendered for this reaction.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::ThumbsUp => "👍",
            Self::ThumbsDown => "👎",
            Self::Laugh => "😄",
            Self::Hooray => "🎉",
            Self::Confused => "😕",
            Self::Heart => "❤️",
            Self::Rocket => "🚀",
            Self::Eyes => "👀",
        }
    }
}

/// Count of one reaction kind on a comment or discussion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionGroup {
    /// Number of users who reacted.
    pub count: u32,
    /// Whether the signed-in viewer is one of them.
    #[serde(default)]
    pub viewer_has_reacted: bool,
}

/// Reaction counts keyed by reaction kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionGroups(BTreeMap<Reaction, ReactionGroup>);

impl ReactionGroups {
    /// Builds a set with every reaction kind at zero.
    #[must_use]
    pub fn empty() -> Self {
        Self(
            Reaction::ALL
                .into_iter()
                .map(|reaction| (reaction, ReactionGroup::default()))
                .collect(),
        )
    }

    /// Returns the group for one reaction kind.
    #[must_use]
    pub fn get(&self, reaction: Reaction) -> ReactionGroup {
        self.0.get(&reaction).copied().unwrap_or_default()
    }

    /// Returns a copy with one reaction group replaced.
    #[must_use]
    pub fn with(mut self, reaction: Reaction, group: ReactionGroup) -> Self {
        self.0.insert(reaction, group);
        self
    }

    /// Total reactions across all kinds.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.values().map(|group| group.count).sum()
    }

    /// Iterates over reaction kinds with a non-zero count.
    pub fn non_zero(&self) -> impl Iterator<Item = (Reaction, ReactionGroup)> + '_ {
        self.0
            .iter()
            .filter(|(_, group)| group.count > 0)
            .map(|(reaction, group)| (*reaction, *group))
    }
}

/// Author or viewer identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Author {
    /// GitHub login.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile URL.
    pub url: String,
}

/// A top-level comment on a discussion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// GraphQL node identifier.
    pub id: String,
    /// Comment author.
    #[serde(default)]
    pub author: Author,
    /// Association of the author with the repository (e.g. `OWNER`).
    #[serde(default)]
    pub author_association: String,
    /// Rendered HTML body.
    #[serde(rename = "bodyHTML", default)]
    pub body_html: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp, if edited.
    #[serde(default)]
    pub last_edited_at: Option<DateTime<Utc>>,
    /// Deletion timestamp, if deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Whether the comment is hidden by a moderator.
    #[serde(default)]
    pub is_minimized: bool,
    /// Reaction counts.
    #[serde(default)]
    pub reactions: ReactionGroups,
    /// Replies in server order.
    #[serde(default)]
    pub replies: Vec<Reply>,
    /// Total number of replies on the server.
    #[serde(default)]
    pub reply_count: u32,
    /// Number of upvotes.
    #[serde(default)]
    pub upvote_count: u32,
    /// Permalink URL.
    #[serde(default)]
    pub url: String,
    /// Whether the viewer wrote this comment.
    #[serde(default)]
    pub viewer_did_author: bool,
    /// Whether the viewer upvoted this comment.
    #[serde(default)]
    pub viewer_has_upvoted: bool,
    /// Whether the viewer may upvote this comment.
    #[serde(default)]
    pub viewer_can_upvote: bool,
}

/// A reply nested under a [`Comment`].
///
/// `reply_to_id` names the parent comment. It is a relation only; the reply
/// is owned by the parent's `replies` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// GraphQL node identifier.
    pub id: String,
    /// Identifier of the parent comment.
    pub reply_to_id: String,
    /// Reply author.
    #[serde(default)]
    pub author: Author,
    /// Association of the author with the repository.
    #[serde(default)]
    pub author_association: String,
    /// Rendered HTML body.
    #[serde(rename = "bodyHTML", default)]
    pub body_html: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp, if edited.
    #[serde(default)]
    pub last_edited_at: Option<DateTime<Utc>>,
    /// Deletion timestamp, if deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Whether the reply is hidden by a moderator.
    #[serde(default)]
    pub is_minimized: bool,
    /// Reaction counts.
    #[serde(default)]
    pub reactions: ReactionGroups,
    /// Number of upvotes.
    #[serde(default)]
    pub upvote_count: u32,
    /// Permalink URL.
    #[serde(default)]
    pub url: String,
    /// Whether the viewer wrote this reply.
    #[serde(default)]
    pub viewer_did_author: bool,
    /// Whether the viewer upvoted this reply.
    #[serde(default)]
    pub viewer_has_upvoted: bool,
    /// Whether the viewer may upvote this reply.
    #[serde(default)]
    pub viewer_can_upvote: bool,
}

/// Repository that hosts a discussion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRef {
    /// Repository in `owner/name` form.
    pub name_with_owner: String,
}

/// The slice of a discussion carried by one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Discussion {
    /// GraphQL node identifier; absent when no discussion exists yet.
    pub id: Option<String>,
    /// Discussion URL.
    pub url: Option<String>,
    /// Whether new comments are disallowed.
    pub locked: bool,
    /// Hosting repository.
    pub repository: Option<RepositoryRef>,
    /// Reactions on the discussion itself.
    pub reactions: ReactionGroups,
    /// Sum of reactions on the discussion itself.
    pub reaction_count: u32,
    /// Total top-level comments on the server.
    pub total_comment_count: u32,
    /// Total replies on the server.
    pub total_reply_count: u32,
    /// Cursor state for the comments on this page.
    pub page_info: PageInfo,
    /// Comments on this page in server order.
    pub comments: Vec<Comment>,
}

/// One fetched unit of discussion data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionPage {
    /// Signed-in viewer, when the request was authenticated.
    #[serde(default)]
    pub viewer: Option<Author>,
    /// The discussion slice.
    pub discussion: Discussion,
}

impl DiscussionPage {
    /// Returns a copy of this page with its comment list replaced.
    #[must_use]
    pub fn with_comments(&self, comments: Vec<Comment>) -> Self {
        Self {
            viewer: self.viewer.clone(),
            discussion: Discussion {
                comments,
                ..self.discussion.clone()
            },
        }
    }

    /// Returns the cursor state of this page.
    #[must_use]
    pub const fn page_info(&self) -> &PageInfo {
        &self.discussion.page_info
    }
}

/// Concatenates pages into one discussion.
///
/// Metadata comes from the first page, cursor state from the last, and the
/// comments are every page's comments in fetch order. Returns `None` for an
/// empty sequence.
#[must_use]
pub fn flatten_pages(pages: &[DiscussionPage]) -> Option<Discussion> {
    let first = pages.first()?;
    let last = pages.last()?;
    Some(Discussion {
        page_info: last.discussion.page_info.clone(),
        comments: pages
            .iter()
            .flat_map(|page| page.discussion.comments.iter().cloned())
            .collect(),
        ..first.discussion.clone()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DiscussionPage, Reaction, ReactionGroup, ReactionGroups, flatten_pages};
    use crate::discussion::pagination::PageInfo;

    fn page_json() -> serde_json::Value {
        json!({
            "viewer": { "login": "octocat", "avatarUrl": "https://a", "url": "https://github.com/octocat" },
            "discussion": {
                "id": "D_1",
                "url": "https://github.com/octo/blog/discussions/1",
                "locked": false,
                "repository": { "nameWithOwner": "octo/blog" },
                "reactionCount": 1,
                "totalCommentCount": 1,
                "totalReplyCount": 1,
                "reactions": { "HEART": { "count": 1, "viewerHasReacted": true } },
                "pageInfo": { "hasNextPage": true, "endCursor": "abc" },
                "comments": [{
                    "id": "C_1",
                    "author": { "login": "alice", "avatarUrl": "https://a", "url": "https://github.com/alice" },
                    "authorAssociation": "OWNER",
                    "bodyHTML": "<p>Hello</p>",
                    "createdAt": "2021-05-15T13:21:14Z",
                    "lastEditedAt": null,
                    "deletedAt": null,
                    "isMinimized": false,
                    "reactions": {
                        "THUMBS_UP": { "count": 2, "viewerHasReacted": false },
                        "EYES": { "count": 0, "viewerHasReacted": false }
                    },
                    "replyCount": 1,
                    "upvoteCount": 3,
                    "url": "https://github.com/octo/blog/discussions/1#discussioncomment-1",
                    "viewerDidAuthor": false,
                    "viewerHasUpvoted": true,
                    "viewerCanUpvote": true,
                    "replies": [{
                        "id": "R_1",
                        "replyToId": "C_1",
                        "author": { "login": "bob", "avatarUrl": "https://b", "url": "https://github.com/bob" },
                        "authorAssociation": "NONE",
                        "bodyHTML": "<p>Hi</p>",
                        "createdAt": "2021-05-16T08:00:00Z",
                        "lastEditedAt": "2021-05-16T09:00:00Z",
                        "deletedAt": null,
                        "isMinimized": false,
                        "reactions": {},
                        "upvoteCount": 0,
                        "url": "https://github.com/octo/blog/discussions/1#discussioncomment-2",
                        "viewerDidAuthor": true
                    }]
                }]
            }
        })
    }

    #[test]
    fn page_deserialises_nested_comment_tree() {
        let page: DiscussionPage =
            serde_json::from_value(page_json()).expect("page should deserialise");

        assert_eq!(page.viewer.as_ref().map(|v| v.login.as_str()), Some("octocat"));
        assert!(page.page_info().has_next_page());
        assert_eq!(page.page_info().end_cursor(), Some("abc"));

        let comment = page.discussion.comments.first().expect("one comment");
        assert_eq!(comment.id, "C_1");
        assert_eq!(comment.body_html, "<p>Hello</p>");
        assert_eq!(comment.reactions.get(Reaction::ThumbsUp).count, 2);
        assert_eq!(comment.reactions.total(), 2);
        assert!(comment.viewer_has_upvoted);

        let reply = comment.replies.first().expect("one reply");
        assert_eq!(reply.reply_to_id, "C_1");
        assert!(reply.last_edited_at.is_some());
        assert!(reply.viewer_did_author);
    }

    #[test]
    fn discussion_reactions_use_screaming_snake_case_keys() {
        let page: DiscussionPage =
            serde_json::from_value(page_json()).expect("page should deserialise");

        assert_eq!(
            page.discussion.reactions.get(Reaction::Heart),
            ReactionGroup {
                count: 1,
                viewer_has_reacted: true
            }
        );
    }

    #[test]
    fn empty_reaction_groups_cover_every_kind() {
        let groups = ReactionGroups::empty();

        assert_eq!(groups.total(), 0);
        assert_eq!(groups.non_zero().count(), 0);
        let encoded = serde_json::to_value(&groups).expect("groups should serialise");
        assert_eq!(encoded.as_object().map(serde_json::Map::len), Some(8));
    }

    #[test]
    fn flatten_concatenates_comments_and_keeps_last_cursor() {
        let first: DiscussionPage =
            serde_json::from_value(page_json()).expect("page should deserialise");
        let mut second = first.clone();
        second.discussion.page_info = PageInfo::default().with_has_next_page(false);
        if let Some(comment) = second.discussion.comments.first_mut() {
            comment.id = "C_2".to_owned();
        }

        let flattened = flatten_pages(&[first, second]).expect("pages should flatten");

        let ids: Vec<&str> = flattened.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C_1", "C_2"]);
        assert!(!flattened.page_info.has_next_page());
        assert_eq!(flattened.id.as_deref(), Some("D_1"));
    }

    #[test]
    fn flatten_of_no_pages_is_none() {
        assert!(flatten_pages(&[]).is_none());
    }
}
