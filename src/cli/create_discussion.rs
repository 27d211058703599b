//! Discussion creation operation.

use std::io::{self, Write};

use pagethread::{
    DiscussionError, DiscussionGateway, OctocrabDiscussionGateway, PagethreadConfig,
    PersonalAccessToken,
};

use super::output::io_error;

/// Creates the configured discussion and prints its node id.
///
/// # Errors
///
/// Returns [`DiscussionError::MissingToken`] without a token,
/// [`DiscussionError::Configuration`] when an input is missing, and
/// [`DiscussionError::Api`] when GitHub rejects the mutation.
pub async fn run(config: &PagethreadConfig) -> Result<(), DiscussionError> {
    let mut stdout = io::stdout().lock();
    let api_base = config.graphql_api_url().to_owned();
    run_with_gateway_builder(
        config,
        |token| OctocrabDiscussionGateway::for_token(token, &api_base),
        &mut stdout,
    )
    .await
}

/// Creates the discussion using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &PagethreadConfig,
    build_gateway: F,
    writer: &mut W,
) -> Result<(), DiscussionError>
where
    G: DiscussionGateway,
    F: FnOnce(&PersonalAccessToken) -> Result<G, DiscussionError>,
    W: Write,
{
    let repository = config.require_repository()?;
    let input = config.create_discussion_input()?;
    let token = config.resolve_token()?;

    let gateway = build_gateway(&token)?;
    let response = gateway.create_discussion(&repository, &input).await?;

    if let Some(id) = response.discussion_id() {
        return writeln!(writer, "Created discussion {id} in {repository}")
            .map_err(|e| io_error(&e));
    }
    let message = if response.has_errors() {
        response
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    } else {
        "createDiscussion returned no discussion".to_owned()
    };
    Err(DiscussionError::Api { message })
}
