use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Typing indicator backed by a count of chat requests in flight.
///
/// Visible while at least one request is outstanding. Each request holds a
/// [`PendingGuard`]; the count goes down when the guard is dropped, so it is
/// decremented exactly once per request whether it succeeded or failed.
#[derive(Debug, Clone, Default)]
pub struct PendingIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl PendingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> PendingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        PendingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
#[must_use = "the indicator hides as soon as the guard is dropped"]
pub struct PendingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
