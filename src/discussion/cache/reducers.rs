//! Pure reducers that apply local mutations to a page sequence.
//!
//! Each reducer leaves its input untouched and returns a new sequence, or
//! `None` when it has nothing to apply. Callers are responsible for not
//! applying the same insert twice; replacements are idempotent.

use crate::discussion::models::{Comment, DiscussionPage, Reply};

/// Appends a new comment to the last page.
///
/// Earlier pages are carried over unchanged. Returns `None` when no pages
/// are held, in which case the caller should reload instead.
#[must_use]
pub fn add_new_comment(pages: &[DiscussionPage], comment: &Comment) -> Option<Vec<DiscussionPage>> {
    let (last, earlier) = pages.split_last()?;
    let mut comments = last.discussion.comments.clone();
    comments.push(comment.clone());

    let mut next = earlier.to_vec();
    next.push(last.with_comments(comments));
    Some(next)
}

/// Appends a reply under every comment whose id equals `reply.reply_to_id`.
///
/// Returns `None` when no page holds the parent comment.
#[must_use]
pub fn add_new_reply(pages: &[DiscussionPage], reply: &Reply) -> Option<Vec<DiscussionPage>> {
    map_comments(pages, |comment| {
        (comment.id == reply.reply_to_id).then(|| {
            let mut replies = comment.replies.clone();
            replies.push(reply.clone());
            Comment {
                replies,
                ..comment.clone()
            }
        })
    })
}

/// Replaces the comment with the same id, wherever it appears.
///
/// Returns `None` when no page holds the comment.
#[must_use]
pub fn update_comment(pages: &[DiscussionPage], updated: &Comment) -> Option<Vec<DiscussionPage>> {
    map_comments(pages, |comment| {
        (comment.id == updated.id).then(|| updated.clone())
    })
}

/// Replaces the reply with the same id under whichever comment holds it.
///
/// Returns `None` when no comment holds the reply.
#[must_use]
pub fn update_reply(pages: &[DiscussionPage], updated: &Reply) -> Option<Vec<DiscussionPage>> {
    map_comments(pages, |comment| {
        if !comment.replies.iter().any(|reply| reply.id == updated.id) {
            return None;
        }
        let replies = comment
            .replies
            .iter()
            .map(|reply| {
                if reply.id == updated.id {
                    updated.clone()
                } else {
                    reply.clone()
                }
            })
            .collect();
        Some(Comment {
            replies,
            ..comment.clone()
        })
    })
}

/// Rebuilds every page, substituting the comments for which `rewrite`
/// returns `Some`.
fn map_comments<F>(pages: &[DiscussionPage], mut rewrite: F) -> Option<Vec<DiscussionPage>>
where
    F: FnMut(&Comment) -> Option<Comment>,
{
    let mut touched = false;
    let next = pages
        .iter()
        .map(|page| {
            let mut page_touched = false;
            let comments: Vec<Comment> = page
                .discussion
                .comments
                .iter()
                .map(|comment| {
                    rewrite(comment).map_or_else(
                        || comment.clone(),
                        |rewritten| {
                            page_touched = true;
                            rewritten
                        },
                    )
                })
                .collect();
            if page_touched {
                touched = true;
                page.with_comments(comments)
            } else {
                page.clone()
            }
        })
        .collect();
    touched.then_some(next)
}
