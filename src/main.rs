//! `pagethread` command-line entrypoint.
//!
//! Shows a discussion's comment tree by default; `--create-discussion`
//! runs the GraphQL mutation and `--embed` prints the `<script>` tag.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use pagethread::{DiscussionError, OperationMode, PagethreadConfig};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let Err(error) = dispatch().await else {
        return ExitCode::SUCCESS;
    };
    let mut stderr = io::stderr().lock();
    if writeln!(stderr, "pagethread: {error}").is_err() {
        tracing::debug!(%error, "stderr closed before the error was reported");
    }
    ExitCode::FAILURE
}

async fn dispatch() -> Result<(), DiscussionError> {
    let config = PagethreadConfig::load().map_err(|error| DiscussionError::Configuration {
        message: error.to_string(),
    })?;

    match config.operation_mode() {
        OperationMode::ShowDiscussion => cli::show_discussion::run(&config).await,
        OperationMode::CreateDiscussion => cli::create_discussion::run(&config).await,
        OperationMode::EmbedSnippet => cli::embed_snippet::run(&config),
    }
}
