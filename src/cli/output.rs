//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use pagethread::discussion::models::flatten_pages;
use pagethread::{Author, Comment, DiscussionError, DiscussionPage, ReactionGroups, Reply};

/// Writes the comment tree held by `pages` to the given writer.
///
/// # Errors
///
/// Returns [`DiscussionError::Io`] when writing fails.
pub fn write_discussion_to<W: Write>(
    writer: &mut W,
    pages: &[DiscussionPage],
) -> Result<(), DiscussionError> {
    let Some(discussion) = flatten_pages(pages).filter(|found| found.id.is_some()) else {
        return write_missing_discussion_to(writer);
    };

    let url = discussion.url.as_deref().unwrap_or("no URL provided");
    let locked = if discussion.locked { " [locked]" } else { "" };
    writeln!(writer, "Discussion {url}{locked}").map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "{} comments, {} replies, {} reactions",
        discussion.total_comment_count, discussion.total_reply_count, discussion.reaction_count
    )
    .map_err(|e| io_error(&e))?;

    for comment in &discussion.comments {
        writeln!(writer).map_err(|e| io_error(&e))?;
        write_comment_to(writer, comment)?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "{} of {} comments shown across {} page(s).",
        discussion.comments.len(),
        discussion.total_comment_count,
        pages.len()
    )
    .map_err(|e| io_error(&e))?;
    if discussion.page_info.has_next_page() {
        writeln!(
            writer,
            "More comments available; rerun with --pages {}.",
            pages.len().saturating_add(1)
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the notice shown when no discussion matches the query.
///
/// # Errors
///
/// Returns [`DiscussionError::Io`] when writing fails.
pub fn write_missing_discussion_to<W: Write>(writer: &mut W) -> Result<(), DiscussionError> {
    writeln!(
        writer,
        "No discussion found yet. It is created with the first comment."
    )
    .map_err(|e| io_error(&e))
}

fn write_comment_to<W: Write>(writer: &mut W, comment: &Comment) -> Result<(), DiscussionError> {
    let heading = heading(
        &comment.author,
        &comment.author_association,
        comment.created_at,
        comment.last_edited_at,
    );
    writeln!(writer, "* {heading}").map_err(|e| io_error(&e))?;
    write_body_to(
        writer,
        "  ",
        &comment.body_html,
        comment.is_minimized,
        comment.deleted_at.is_some(),
    )?;
    write_reactions_to(writer, "  ", &comment.reactions, comment.upvote_count)?;

    for reply in &comment.replies {
        write_reply_to(writer, reply)?;
    }
    let hidden = usize::try_from(comment.reply_count)
        .unwrap_or(usize::MAX)
        .saturating_sub(comment.replies.len());
    if hidden > 0 {
        writeln!(writer, "    ({hidden} more replies)").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn write_reply_to<W: Write>(writer: &mut W, reply: &Reply) -> Result<(), DiscussionError> {
    let heading = heading(
        &reply.author,
        &reply.author_association,
        reply.created_at,
        reply.last_edited_at,
    );
    writeln!(writer, "    > {heading}").map_err(|e| io_error(&e))?;
    write_body_to(
        writer,
        "      ",
        &reply.body_html,
        reply.is_minimized,
        reply.deleted_at.is_some(),
    )?;
    write_reactions_to(writer, "      ", &reply.reactions, reply.upvote_count)
}

fn heading(
    author: &Author,
    association: &str,
    created_at: DateTime<Utc>,
    last_edited_at: Option<DateTime<Utc>>,
) -> String {
    let login = if author.login.is_empty() {
        "ghost"
    } else {
        author.login.as_str()
    };
    let badge = match association {
        "" | "NONE" => String::new(),
        other => format!(" [{}]", other.to_lowercase()),
    };
    let edited = if last_edited_at.is_some() {
        " (edited)"
    } else {
        ""
    };
    format!(
        "@{login}{badge} on {}{edited}",
        created_at.format("%Y-%m-%d %H:%M UTC")
    )
}

fn write_body_to<W: Write>(
    writer: &mut W,
    indent: &str,
    body_html: &str,
    is_minimized: bool,
    is_deleted: bool,
) -> Result<(), DiscussionError> {
    if is_deleted {
        return writeln!(writer, "{indent}(deleted)").map_err(|e| io_error(&e));
    }
    if is_minimized {
        return writeln!(writer, "{indent}(hidden by a moderator)").map_err(|e| io_error(&e));
    }
    for line in body_html.lines().filter(|line| !line.trim().is_empty()) {
        writeln!(writer, "{indent}{}", line.trim()).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn write_reactions_to<W: Write>(
    writer: &mut W,
    indent: &str,
    reactions: &ReactionGroups,
    upvotes: u32,
) -> Result<(), DiscussionError> {
    let mut parts: Vec<String> = reactions
        .non_zero()
        .map(|(reaction, group)| format!("{} {}", reaction.emoji(), group.count))
        .collect();
    if upvotes > 0 {
        parts.push(format!("{upvotes} upvotes"));
    }
    if parts.is_empty() {
        return Ok(());
    }
    writeln!(writer, "{indent}{}", parts.join("  ")).map_err(|e| io_error(&e))
}

/// Converts an I/O error to a [`DiscussionError::Io`].
pub(crate) fn io_error(error: &io::Error) -> DiscussionError {
    DiscussionError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pagethread::discussion::models::test_support::{
        comment_with_id, page_with_comments, reply_with_id,
    };
    use pagethread::{DiscussionPage, Reaction, ReactionGroup};
    use rstest::rstest;

    use super::write_discussion_to;

    fn render(pages: &[DiscussionPage]) -> String {
        let mut buffer = Vec::new();
        write_discussion_to(&mut buffer, pages).expect("should write discussion");
        String::from_utf8(buffer).expect("output should be valid UTF-8")
    }

    fn loaded_page() -> DiscussionPage {
        let mut page = page_with_comments(&["C_1", "C_2"], Some("abc"));
        page.discussion.id = Some("D_1".to_owned());
        page.discussion.url = Some("https://github.com/octo/blog/discussions/1".to_owned());
        page.discussion.total_comment_count = 3;
        page.discussion.total_reply_count = 1;
        page
    }

    #[rstest]
    fn no_pages_reports_missing_discussion() {
        let output = render(&[]);

        assert!(output.starts_with("No discussion found yet."));
    }

    #[rstest]
    fn writes_comments_replies_and_reactions() {
        let mut page = loaded_page();
        if let Some(first) = page.discussion.comments.first_mut() {
            first.author.login = "alice".to_owned();
            first.author_association = "OWNER".to_owned();
            first.body_html = "<p>Hello</p>".to_owned();
            first.created_at = Utc
                .with_ymd_and_hms(2021, 5, 15, 13, 21, 0)
                .single()
                .expect("valid timestamp");
            first.upvote_count = 2;
            first.reactions = first.reactions.clone().with(
                Reaction::Heart,
                ReactionGroup {
                    count: 1,
                    viewer_has_reacted: false,
                },
            );
            let mut reply = reply_with_id("R_1", "C_1");
            reply.author.login = "bob".to_owned();
            reply.body_html = "<p>Hi</p>".to_owned();
            first.replies = vec![reply];
            first.reply_count = 2;
        }

        let output = render(&[page]);

        assert!(output.contains("Discussion https://github.com/octo/blog/discussions/1"));
        assert!(output.contains("* @alice [owner] on 2021-05-15 13:21 UTC"));
        assert!(output.contains("  <p>Hello</p>"));
        assert!(output.contains("❤️ 1  2 upvotes"));
        assert!(output.contains("    > @bob on"));
        assert!(output.contains("      <p>Hi</p>"));
        assert!(output.contains("    (1 more replies)"));
        assert!(output.contains("2 of 3 comments shown across 1 page(s)."));
        assert!(output.contains("rerun with --pages 2"));
    }

    #[rstest]
    fn minimized_and_deleted_bodies_are_masked() {
        let mut page = loaded_page();
        page.discussion.page_info = page.discussion.page_info.clone().with_has_next_page(false);
        let mut minimized = comment_with_id("C_1");
        minimized.is_minimized = true;
        minimized.body_html = "spam".to_owned();
        let mut deleted = comment_with_id("C_2");
        deleted.deleted_at = Some(Utc::now());
        deleted.body_html = "gone".to_owned();
        page.discussion.comments = vec![minimized, deleted];

        let output = render(&[page]);

        assert!(output.contains("(hidden by a moderator)"));
        assert!(output.contains("(deleted)"));
        assert!(!output.contains("spam"));
        assert!(!output.contains("gone"));
        assert!(!output.contains("More comments available"));
    }
}
