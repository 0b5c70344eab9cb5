use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window request limiter keyed by caller identity (client IP here).
#[derive(Debug, Clone)]
pub struct RequestRateLimiter {
    buckets: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    window: Duration,
    max_requests: usize,
}

impl RequestRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    /// Records an attempt for `key` and reports whether it is allowed to
    /// proceed. Denied attempts are not recorded against the window.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(key.to_string()).or_default();

        Self::prune(bucket, now, self.window);
        if bucket.len() >= self.max_requests {
            return false;
        }

        bucket.push_back(now);
        true
    }

    fn prune(bucket: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while bucket
            .front()
            .is_some_and(|oldest| now.duration_since(*oldest) > window)
        {
            bucket.pop_front();
        }
    }
}
