//! Revalidation gating for permanent error classes.
//!
//! The cache remembers the status of the last failed fetch. While that
//! status is 403 or 404 no automatic revalidation runs: not on mount, focus,
//! reconnect, or as an error retry. The status clears on the next successful
//! fetch or when the query changes.

use std::fmt;
use std::time::Duration;

use super::error::DiscussionError;

/// Status code stored when no error is outstanding.
pub const NO_ERROR: u16 = 0;

const FORBIDDEN: u16 = 403;
const NOT_FOUND: u16 = 404;
const DEFAULT_ERROR_RETRY_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_ERROR_RETRY_COUNT: u32 = 3;
const MAX_BACKOFF_EXPONENT: u32 = 8;

/// Returns false exactly for the permanent statuses 403 and 404.
///
/// # Example
///
/// ```
/// use pagethread::discussion::gate::should_revalidate;
///
/// assert!(should_revalidate(0));
/// assert!(should_revalidate(500));
/// assert!(!should_revalidate(404));
/// ```
#[must_use]
pub const fn should_revalidate(status: u16) -> bool {
    !matches!(status, FORBIDDEN | NOT_FOUND)
}

/// Decides when the cache may refetch on its own.
pub trait RevalidationPolicy: Send + Sync {
    /// Returns whether automatic revalidation is allowed while `status` is
    /// the stored error status.
    fn should_revalidate(&self, status: u16) -> bool;

    /// Delay before retry number `attempt` (zero-based) of a failed fetch.
    ///
    /// Defaults to exponential backoff: `interval * 2^min(attempt, 8)`.
    fn retry_delay(&self, attempt: u32, interval: Duration) -> Duration {
        interval.saturating_mul(1_u32 << attempt.min(MAX_BACKOFF_EXPONENT))
    }
}

/// Default policy that stops revalidating after 403 or 404.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermanentErrorGate;

impl RevalidationPolicy for PermanentErrorGate {
    fn should_revalidate(&self, status: u16) -> bool {
        should_revalidate(status)
    }
}

/// Events that may cause the cache to refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevalidationTrigger {
    /// The consumer attached to the cache.
    Mount,
    /// The consumer regained focus.
    Focus,
    /// The network came back.
    Reconnect,
}

impl RevalidationTrigger {
    /// Returns a stable name for logs and telemetry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Focus => "focus",
            Self::Reconnect => "reconnect",
        }
    }
}

impl fmt::Display for RevalidationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Switches for each automatic revalidation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidationOptions {
    /// Revalidate when the consumer mounts.
    pub on_mount: bool,
    /// Revalidate when the consumer regains focus.
    pub on_focus: bool,
    /// Revalidate when the network reconnects.
    pub on_reconnect: bool,
    /// Retry failed fetches with backoff.
    pub retry_on_error: bool,
    /// Base delay between error retries.
    pub error_retry_interval: Duration,
    /// Maximum retries of one failed fetch.
    pub error_retry_count: u32,
}

impl Default for RevalidationOptions {
    fn default() -> Self {
        Self {
            on_mount: true,
            on_focus: true,
            on_reconnect: true,
            retry_on_error: true,
            error_retry_interval: DEFAULT_ERROR_RETRY_INTERVAL,
            error_retry_count: DEFAULT_ERROR_RETRY_COUNT,
        }
    }
}

impl RevalidationOptions {
    /// Returns whether the given trigger is switched on.
    #[must_use]
    pub const fn allows(&self, trigger: RevalidationTrigger) -> bool {
        match trigger {
            RevalidationTrigger::Mount => self.on_mount,
            RevalidationTrigger::Focus => self.on_focus,
            RevalidationTrigger::Reconnect => self.on_reconnect,
        }
    }
}

/// The stored error status of one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorStatus(u16);

impl ErrorStatus {
    /// Returns the stored status, [`NO_ERROR`] when clear.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Records the outcome of a fetch attempt and reports whether the stored
    /// status changed.
    ///
    /// Errors without a status (transport failures) clear the status just
    /// like a success does.
    pub fn observe(&mut self, outcome: Option<&DiscussionError>) -> bool {
        let next = outcome
            .and_then(DiscussionError::status)
            .unwrap_or(NO_ERROR);
        if next == self.0 {
            return false;
        }
        self.0 = next;
        true
    }

    /// Clears the stored status.
    pub const fn clear(&mut self) {
        self.0 = NO_ERROR;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{
        ErrorStatus, PermanentErrorGate, RevalidationOptions, RevalidationPolicy,
        RevalidationTrigger, should_revalidate,
    };
    use crate::discussion::error::DiscussionError;

    #[rstest]
    #[case::no_error(0, true)]
    #[case::forbidden(403, false)]
    #[case::not_found(404, false)]
    #[case::unauthorised(401, true)]
    #[case::rate_limited(429, true)]
    #[case::server_error(500, true)]
    #[case::gateway_timeout(504, true)]
    fn permanent_statuses_suppress_revalidation(#[case] status: u16, #[case] expected: bool) {
        assert_eq!(should_revalidate(status), expected);
        assert_eq!(PermanentErrorGate.should_revalidate(status), expected);
    }

    #[rstest]
    #[case(0, 5)]
    #[case(1, 10)]
    #[case(3, 40)]
    #[case(8, 1280)]
    #[case(12, 1280)]
    fn retry_delay_doubles_up_to_the_cap(#[case] attempt: u32, #[case] expected_secs: u64) {
        let delay = PermanentErrorGate.retry_delay(attempt, Duration::from_secs(5));

        assert_eq!(delay, Duration::from_secs(expected_secs));
    }

    #[test]
    fn error_status_follows_fetch_outcomes() {
        let mut status = ErrorStatus::default();
        let not_found = DiscussionError::Http {
            status: 404,
            message: "not found".to_owned(),
        };
        let offline = DiscussionError::Network {
            message: "offline".to_owned(),
        };

        assert!(status.observe(Some(&not_found)), "404 should be stored");
        assert_eq!(status.get(), 404);
        assert!(!status.observe(Some(&not_found)), "repeat should not change");
        assert!(status.observe(Some(&offline)), "transport error clears");
        assert_eq!(status.get(), 0);
        assert!(status.observe(Some(&not_found)));
        assert!(status.observe(None), "success clears");
        assert_eq!(status.get(), 0);
    }

    #[rstest]
    #[case::mount(RevalidationTrigger::Mount)]
    #[case::focus(RevalidationTrigger::Focus)]
    #[case::reconnect(RevalidationTrigger::Reconnect)]
    fn triggers_can_be_switched_off_independently(#[case] trigger: RevalidationTrigger) {
        let all_on = RevalidationOptions::default();
        let only_off = RevalidationOptions {
            on_mount: trigger != RevalidationTrigger::Mount,
            on_focus: trigger != RevalidationTrigger::Focus,
            on_reconnect: trigger != RevalidationTrigger::Reconnect,
            ..RevalidationOptions::default()
        };

        assert!(all_on.allows(trigger));
        assert!(!only_off.allows(trigger));
    }
}
