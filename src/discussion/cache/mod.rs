//! Paginated discussion cache with optimistic mutations.
//!
//! [`DiscussionCache`] holds the ordered page sequence for one query. Pages
//! are fetched along a cursor chain, replaced wholesale on revalidation and
//! rewritten locally by the mutators, each of which schedules exactly one
//! confirming refetch.
//!
//! Every write produces a new [`Snapshot`] with a higher version. A
//! revalidation remembers the version it started from and is discarded if a
//! newer write landed before it finished; the newer write is responsible for
//! its own confirmation.

mod keys;
pub mod reducers;
mod snapshot;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;

pub use keys::page_key;
pub use snapshot::Snapshot;

use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

use super::error::DiscussionError;
use super::fetcher::PageFetcher;
use super::gate::{
    ErrorStatus, PermanentErrorGate, RevalidationOptions, RevalidationPolicy, RevalidationTrigger,
};
use super::models::{Comment, Discussion, DiscussionPage, Reply};
use super::pagination::PaginationParams;
use super::query::{DiscussionQuery, QueryKey};

/// Refetch scheduled by a mutator.
///
/// The optimistic write has already happened when this is returned. The
/// confirming revalidation only runs while this future is polled, so it must
/// be awaited; dropping it leaves the optimistic pages unconfirmed.
#[must_use = "the confirming refetch only runs when the revalidation is awaited"]
pub struct Revalidation<'a>(BoxFuture<'a, Result<Snapshot, DiscussionError>>);

impl<'a> Revalidation<'a> {
    fn new<Fut>(refetch: Fut) -> Self
    where
        Fut: Future<Output = Result<Snapshot, DiscussionError>> + Send + 'a,
    {
        Self(refetch.boxed())
    }
}

impl Future for Revalidation<'_> {
    type Output = Result<Snapshot, DiscussionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.0.poll_unpin(cx)
    }
}

impl std::fmt::Debug for Revalidation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Revalidation")
    }
}

/// Completion signal of the operation behind an optimistic write.
///
/// The cache waits for it before revalidating. Its output is ignored, so a
/// failed or cancelled operation still leads to a refetch.
pub struct Confirmation<'a>(BoxFuture<'a, ()>);

impl<'a> Confirmation<'a> {
    /// Wraps any future as a confirmation.
    #[must_use]
    pub fn new<Fut>(operation: Fut) -> Self
    where
        Fut: Future + Send + 'a,
    {
        Self(operation.map(drop).boxed())
    }

    async fn settle(self) {
        self.0.await;
    }
}

impl std::fmt::Debug for Confirmation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Confirmation")
    }
}

#[derive(Debug)]
struct CacheState {
    query: DiscussionQuery,
    pagination: PaginationParams,
    snapshot: Snapshot,
    last_version: u64,
    epoch: u64,
    size: usize,
    error: Option<DiscussionError>,
    status: ErrorStatus,
    settled: bool,
    validating: usize,
}

impl CacheState {
    fn new(query: DiscussionQuery, pagination: PaginationParams) -> Self {
        Self {
            query,
            pagination,
            snapshot: Snapshot::default(),
            last_version: 0,
            epoch: 0,
            size: 1,
            error: None,
            status: ErrorStatus::default(),
            settled: true,
            validating: 0,
        }
    }

    fn write(&mut self, pages: Vec<DiscussionPage>) -> Snapshot {
        self.last_version = self.last_version.saturating_add(1);
        self.snapshot = Snapshot::new(pages, self.last_version);
        self.snapshot.clone()
    }
}

/// Decrements the in-flight counter when a fetch sequence ends, however it
/// ends.
struct ValidatingGuard<'a> {
    state: &'a Mutex<CacheState>,
}

impl<'a> ValidatingGuard<'a> {
    fn enter(state: &'a Mutex<CacheState>) -> Self {
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
        guard.validating = guard.validating.saturating_add(1);
        drop(guard);
        Self { state }
    }
}

impl Drop for ValidatingGuard<'_> {
    fn drop(&mut self) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        guard.validating = guard.validating.saturating_sub(1);
    }
}

/// Ordered page cache for one discussion query.
///
/// All operations take `&self`; fetches may overlap and the last committed
/// write wins, subject to the stale-revalidation rule described in the
/// module documentation.
pub struct DiscussionCache<F, P = PermanentErrorGate> {
    fetcher: F,
    policy: P,
    options: RevalidationOptions,
    telemetry: Arc<dyn TelemetrySink>,
    state: Mutex<CacheState>,
}

impl<F: PageFetcher> DiscussionCache<F> {
    /// Creates an empty cache for `query` using the default error gate.
    #[must_use]
    pub fn new(fetcher: F, query: DiscussionQuery, pagination: PaginationParams) -> Self {
        Self {
            fetcher,
            policy: PermanentErrorGate,
            options: RevalidationOptions::default(),
            telemetry: Arc::new(NoopTelemetrySink),
            state: Mutex::new(CacheState::new(query, pagination)),
        }
    }
}

impl<F: PageFetcher, P: RevalidationPolicy> DiscussionCache<F, P> {
    /// Replaces the revalidation policy.
    #[must_use]
    pub fn with_policy<Q: RevalidationPolicy>(self, policy: Q) -> DiscussionCache<F, Q> {
        DiscussionCache {
            fetcher: self.fetcher,
            policy,
            options: self.options,
            telemetry: self.telemetry,
            state: self.state,
        }
    }

    /// Replaces the revalidation switches and retry budget.
    #[must_use]
    pub const fn with_options(mut self, options: RevalidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Routes cache telemetry to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot.clone()
    }

    /// Returns the held pages concatenated into one discussion.
    #[must_use]
    pub fn discussion(&self) -> Option<Discussion> {
        self.snapshot().discussion()
    }

    /// Returns the error of the most recent failed fetch, if it has not been
    /// cleared by a success since.
    #[must_use]
    pub fn error(&self) -> Option<DiscussionError> {
        self.lock().error.clone()
    }

    /// Returns the stored error status, zero when clear.
    #[must_use]
    pub fn error_status(&self) -> u16 {
        self.lock().status.get()
    }

    /// Returns the number of pages requested through [`Self::set_size`].
    #[must_use]
    pub fn size(&self) -> usize {
        self.lock().size
    }

    /// Returns true while there is neither data nor an error to show.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        let state = self.lock();
        state.snapshot.is_empty() && state.error.is_none()
    }

    /// Returns true while any fetch sequence is in flight.
    #[must_use]
    pub fn is_validating(&self) -> bool {
        self.lock().validating > 0
    }

    /// Returns false between an optimistic write awaiting confirmation and
    /// the next committed revalidation.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.lock().settled
    }

    /// Revalidates in response to `trigger` when both the options and the
    /// policy allow it.
    ///
    /// Returns `Ok(None)` when the trigger is switched off or the stored
    /// error status suppresses automatic revalidation.
    ///
    /// # Errors
    ///
    /// Propagates the error of the revalidation when one runs and fails.
    pub async fn trigger(
        &self,
        trigger: RevalidationTrigger,
    ) -> Result<Option<Snapshot>, DiscussionError> {
        if !self.options.allows(trigger) {
            tracing::trace!(%trigger, "revalidation trigger disabled");
            return Ok(None);
        }
        let status = self.error_status();
        if !self.policy.should_revalidate(status) {
            tracing::debug!(%trigger, status, "revalidation suppressed by error status");
            self.telemetry.record(TelemetryEvent::RevalidationSuppressed {
                trigger: trigger.as_str().to_owned(),
                status,
            });
            return Ok(None);
        }
        self.revalidate().await.map(Some)
    }

    /// Refetches every held page, at least the first, and replaces the page
    /// sequence with the result.
    ///
    /// When a newer write lands while the refetch is in flight the result is
    /// dropped and the current snapshot is returned instead.
    ///
    /// # Errors
    ///
    /// Returns the error of the first page that still fails after retries.
    /// Held pages are left in place.
    pub async fn revalidate(&self) -> Result<Snapshot, DiscussionError> {
        let (query, pagination, target, started_version, epoch) = {
            let state = self.lock();
            (
                state.query.clone(),
                state.pagination.clone(),
                state.snapshot.len().max(1),
                state.snapshot.version(),
                state.epoch,
            )
        };
        let _validating = ValidatingGuard::enter(&self.state);

        let mut pages: Vec<DiscussionPage> = Vec::with_capacity(target);
        for index in 0..target {
            let Some(key) = page_key(&query, &pagination, index, pages.last()) else {
                break;
            };
            let page = self.fetch_with_retry(&key, index, epoch).await?;
            pages.push(page);
        }

        let mut state = self.lock();
        let current_version = state.snapshot.version();
        if current_version != started_version {
            tracing::debug!(
                started_version,
                current_version,
                "discarding revalidation that finished after a newer write"
            );
            self.telemetry
                .record(TelemetryEvent::StaleRevalidationDiscarded {
                    started_version,
                    current_version,
                });
            return Ok(state.snapshot.clone());
        }
        state.settled = true;
        Ok(state.write(pages))
    }

    /// Requests `size` pages, fetching the missing ones in index order.
    ///
    /// Fetching stops early when pagination ends. A smaller size drops the
    /// trailing pages.
    ///
    /// # Errors
    ///
    /// Returns the error of the first page that still fails after retries.
    pub async fn set_size(&self, size: usize) -> Result<Snapshot, DiscussionError> {
        let (query, pagination, epoch) = {
            let mut state = self.lock();
            state.size = size;
            if state.snapshot.len() > size {
                let kept = state.snapshot.pages().iter().take(size).cloned().collect();
                return Ok(state.write(kept));
            }
            (state.query.clone(), state.pagination.clone(), state.epoch)
        };
        let _validating = ValidatingGuard::enter(&self.state);

        loop {
            let (index, previous) = {
                let state = self.lock();
                if state.epoch != epoch || state.snapshot.len() >= size {
                    return Ok(state.snapshot.clone());
                }
                (state.snapshot.len(), state.snapshot.pages().last().cloned())
            };
            let Some(key) = page_key(&query, &pagination, index, previous.as_ref()) else {
                return Ok(self.snapshot());
            };
            let page = self.fetch_with_retry(&key, index, epoch).await?;

            let mut state = self.lock();
            if state.epoch != epoch || state.snapshot.len() != index {
                tracing::debug!(%key, "dropping page fetched for a superseded sequence");
                return Ok(state.snapshot.clone());
            }
            let mut pages = state.snapshot.pages().to_vec();
            pages.push(page);
            state.write(pages);
        }
    }

    /// Drops every page, the error and the stored status, then switches to
    /// a new query.
    ///
    /// Fetches still in flight for the previous query are ignored when they
    /// finish.
    pub fn reset_query(&self, query: DiscussionQuery, pagination: PaginationParams) {
        let mut state = self.lock();
        state.query = query;
        state.pagination = pagination;
        state.epoch = state.epoch.saturating_add(1);
        state.size = 1;
        state.error = None;
        state.status.clear();
        state.settled = true;
        state.write(Vec::new());
    }

    /// Appends `comment` to the last page and schedules a reload.
    ///
    /// With no pages held there is nothing to append to, so only the reload
    /// runs.
    pub fn add_new_comment(&self, comment: &Comment) -> Revalidation<'_> {
        self.apply("add_new_comment", true, |pages| {
            reducers::add_new_comment(pages, comment)
        });
        Revalidation::new(self.revalidate())
    }

    /// Appends `reply` under its parent comment and schedules a reload.
    ///
    /// The snapshot is left untouched when the parent is not held.
    pub fn add_new_reply(&self, reply: &Reply) -> Revalidation<'_> {
        self.apply("add_new_reply", true, |pages| {
            reducers::add_new_reply(pages, reply)
        });
        Revalidation::new(self.revalidate())
    }

    /// Replaces the whole page sequence.
    ///
    /// Without a confirmation the pages are taken as authoritative and the
    /// refetch runs straight away. With one, the cache stays unsettled until
    /// the confirmation resolves and the refetch commits.
    pub fn update_discussion<'a>(
        &'a self,
        pages: Vec<DiscussionPage>,
        confirmation: Option<Confirmation<'a>>,
    ) -> Revalidation<'a> {
        self.apply("update_discussion", confirmation.is_none(), |_| Some(pages));
        self.confirm_then_revalidate(confirmation)
    }

    /// Replaces the comment with the same id wherever it is held.
    pub fn update_comment<'a>(
        &'a self,
        comment: &Comment,
        confirmation: Option<Confirmation<'a>>,
    ) -> Revalidation<'a> {
        self.apply("update_comment", confirmation.is_none(), |pages| {
            reducers::update_comment(pages, comment)
        });
        self.confirm_then_revalidate(confirmation)
    }

    /// Replaces the reply with the same id under whichever comment holds it.
    pub fn update_reply<'a>(
        &'a self,
        reply: &Reply,
        confirmation: Option<Confirmation<'a>>,
    ) -> Revalidation<'a> {
        self.apply("update_reply", confirmation.is_none(), |pages| {
            reducers::update_reply(pages, reply)
        });
        self.confirm_then_revalidate(confirmation)
    }

    fn confirm_then_revalidate<'a>(
        &'a self,
        confirmation: Option<Confirmation<'a>>,
    ) -> Revalidation<'a> {
        Revalidation::new(async move {
            if let Some(pending) = confirmation {
                pending.settle().await;
            }
            self.revalidate().await
        })
    }

    /// Runs `reducer` against the current pages under the lock and writes
    /// its result, if any.
    fn apply<R>(&self, operation: &'static str, settled: bool, reducer: R)
    where
        R: FnOnce(&[DiscussionPage]) -> Option<Vec<DiscussionPage>>,
    {
        let mut state = self.lock();
        let Some(pages) = reducer(state.snapshot.pages()) else {
            tracing::trace!(operation, "mutation left the snapshot unchanged");
            return;
        };
        state.settled = settled;
        let version = state.write(pages).version();
        drop(state);

        tracing::debug!(operation, version, "optimistic write");
        self.telemetry.record(TelemetryEvent::OptimisticWrite {
            operation: operation.to_owned(),
            version,
        });
    }

    /// Fetches one page, retrying with backoff while the options and the
    /// stored status allow it.
    async fn fetch_with_retry(
        &self,
        key: &QueryKey,
        page_index: usize,
        epoch: u64,
    ) -> Result<DiscussionPage, DiscussionError> {
        let mut attempt: u32 = 0;
        loop {
            let outcome = self.fetcher.fetch(key).await;
            let status = self.observe(epoch, outcome.as_ref().err());
            let error = match outcome {
                Ok(page) => {
                    tracing::debug!(%key, page_index, "discussion page fetched");
                    self.telemetry.record(TelemetryEvent::PageFetched {
                        key: key.to_string(),
                        page_index,
                        comment_count: page.discussion.comments.len(),
                    });
                    return Ok(page);
                }
                Err(error) => error,
            };

            if !self.options.retry_on_error
                || attempt >= self.options.error_retry_count
                || !self.policy.should_revalidate(status)
            {
                tracing::debug!(%key, attempt, status, "giving up on discussion page");
                return Err(error);
            }

            let delay = self
                .policy
                .retry_delay(attempt, self.options.error_retry_interval);
            tracing::debug!(%key, attempt, status, ?delay, "retrying discussion page");
            self.telemetry.record(TelemetryEvent::ErrorRetryScheduled {
                attempt,
                delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                status,
            });
            tokio::time::sleep(delay).await;
            attempt = attempt.saturating_add(1);
        }
    }

    /// Records a fetch outcome against the query it was issued for and
    /// returns the stored status afterwards.
    fn observe(&self, epoch: u64, error: Option<&DiscussionError>) -> u16 {
        let mut state = self.lock();
        if state.epoch == epoch {
            state.status.observe(error);
            state.error = error.cloned();
        }
        state.status.get()
    }
}
