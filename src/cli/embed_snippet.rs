//! Embed tag printing operation.

use std::io::{self, Write};

use pagethread::{DiscussionError, PagethreadConfig};

use super::output::io_error;

/// Prints the embed `<script>` tag for the configured repository.
///
/// # Errors
///
/// Returns a configuration error when a required value is missing.
pub fn run(config: &PagethreadConfig) -> Result<(), DiscussionError> {
    let mut stdout = io::stdout().lock();
    write_snippet_to(&mut stdout, config)
}

/// Renders the tag into `writer`.
///
/// # Errors
///
/// Returns a configuration error when a required value is missing and
/// [`DiscussionError::Io`] when writing fails.
pub fn write_snippet_to<W: Write>(
    writer: &mut W,
    config: &PagethreadConfig,
) -> Result<(), DiscussionError> {
    let tag = config.embed_script()?.render()?;
    writeln!(writer, "{tag}").map_err(|e| io_error(&e))
}
