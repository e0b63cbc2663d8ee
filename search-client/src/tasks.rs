//! Task completion polling support.
//!
//! A mutating call is acknowledged before it is applied; the server works
//! through tasks asynchronously. The waiter polls a task's status until the
//! provider reports the completion sentinel, sleeping between polls with a
//! stepped backoff.

use std::time::Duration;

/// Options for a bounded task wait.
///
/// By default polling continues until the provider reports completion, with
/// no attempt cap — a stuck task blocks its waiter indefinitely. The cap is
/// strictly opt-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitTaskOptions {
    /// Maximum number of status polls before giving up with
    /// [`crate::SearchError::WaitExhausted`]. `None` polls until completion.
    pub max_attempts: Option<u32>,
}

impl WaitTaskOptions {
    /// Cap the wait at `max_attempts` status polls.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }
}

/// Sleep interval before the given poll attempt: the base interval stepped
/// up by one unit for every ten attempts, never decreasing.
pub(crate) fn retry_delay(attempt: u32, base: Duration) -> Duration {
    base * attempt.div_ceil(10)
}
