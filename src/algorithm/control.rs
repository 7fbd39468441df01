//! Cooperative cancellation and rate-limited progress reporting

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Progress sink receiving a phase label and a fraction in `[0, 1]`
pub type ProgressCallback = Arc<dyn Fn(&str, f64) + Send + Sync>;

/// Shared flag polled before every solver step
///
/// Clones observe the same flag, so one handle can stay with the caller while
/// another travels with the attempt to a worker thread.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Gate letting a progress report through at most once per interval
pub struct ProgressThrottle {
    callback: Option<ProgressCallback>,
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressThrottle {
    /// Wrap an optional callback
    pub fn new(callback: Option<ProgressCallback>, interval: Duration) -> Self {
        Self {
            callback,
            interval,
            last: None,
        }
    }

    /// Report unless the previous report was too recent
    ///
    /// `fraction` is only evaluated when a report goes out.
    pub fn report(&mut self, label: &str, fraction: impl FnOnce() -> f64) {
        let Some(callback) = &self.callback else {
            return;
        };
        let now = Instant::now();
        if self
            .last
            .is_some_and(|last| now.duration_since(last) < self.interval)
        {
            return;
        }
        self.last = Some(now);
        callback(label, fraction());
    }

    /// Report unconditionally
    pub fn finish(&mut self, label: &str, fraction: f64) {
        if let Some(callback) = &self.callback {
            callback(label, fraction);
        }
        self.last = Some(Instant::now());
    }
}

impl fmt::Debug for ProgressThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressThrottle")
            .field("enabled", &self.callback.is_some())
            .field("interval", &self.interval)
            .finish()
    }
}
