//! Configuration for the search client.

use std::time::Duration;

/// Client configuration shared by every index handle.
///
/// Read-only once constructed; handles clone it freely.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of batch entries sent in a single provider request.
    /// Larger inputs are split into chunks of at most this size.
    pub batch_size: usize,

    /// Base interval for the task completion waiter. The actual sleep steps
    /// up by one base unit for every ten poll attempts.
    pub wait_task_time_before_retry: Duration,

    /// Default replica-forwarding behavior for settings, synonym, and rule
    /// writes. `None` omits the flag entirely, leaving the provider's own
    /// default in effect; the flag is never injected over an explicit
    /// caller-supplied value.
    pub default_forward_to_replicas: Option<bool>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            wait_task_time_before_retry: Duration::from_millis(100),
            default_forward_to_replicas: None,
        }
    }
}

impl SearchConfig {
    /// Create a config with a custom batch size ceiling.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    /// Set the base interval for task completion polling.
    pub fn wait_task_time_before_retry(mut self, interval: Duration) -> Self {
        self.wait_task_time_before_retry = interval;
        self
    }

    /// Set the default replica-forwarding flag.
    pub fn forward_to_replicas(mut self, forward: bool) -> Self {
        self.default_forward_to_replicas = Some(forward);
        self
    }
}
