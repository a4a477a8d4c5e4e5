//! Per-request execution context handed to the cache accessors.

use std::time::Duration;
use tokio::time::Instant;

/// Bounds how long a caller is willing to wait for a cold-start fetch.
///
/// Cancellation is dropping the accessor future. A warm cache never consults
/// the deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// No deadline; waits as long as the store takes.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
