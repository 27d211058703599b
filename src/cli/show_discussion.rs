//! Discussion loading operation.

use std::io::{self, Write};
use std::sync::Arc;

use pagethread::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use pagethread::{
    DiscussionCache, DiscussionError, HttpPageFetcher, PageFetcher, PagethreadConfig,
    RevalidationTrigger,
};

use super::output::{write_discussion_to, write_missing_discussion_to};

const NOT_FOUND: u16 = 404;

/// Loads the configured discussion and prints its comment tree.
///
/// # Errors
///
/// Returns a configuration error when the query cannot be built, or the
/// fetch error when a page still fails after retries.
pub async fn run(config: &PagethreadConfig) -> Result<(), DiscussionError> {
    let fetcher = HttpPageFetcher::new(config.api_url(), config.resolve_token().ok())?;
    let mut stdout = io::stdout().lock();
    run_with_fetcher(config, fetcher, &mut stdout).await
}

/// Loads the discussion through `fetcher` and writes it to `writer`.
///
/// This function is exposed for testing with scripted fetchers.
pub async fn run_with_fetcher<F, W>(
    config: &PagethreadConfig,
    fetcher: F,
    writer: &mut W,
) -> Result<(), DiscussionError>
where
    F: PageFetcher,
    W: Write,
{
    let query = config.discussion_query()?;
    let cache = DiscussionCache::new(fetcher, query, config.pagination())
        .with_options(config.revalidation_options())
        .with_telemetry(telemetry_sink(config));

    match cache.trigger(RevalidationTrigger::Mount).await {
        Ok(_) => {}
        Err(DiscussionError::Http {
            status: NOT_FOUND, ..
        }) => return write_missing_discussion_to(writer),
        Err(error) => return Err(error),
    }
    let snapshot = cache.set_size(config.pages.max(1)).await?;
    write_discussion_to(writer, snapshot.pages())
}

fn telemetry_sink(config: &PagethreadConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}
