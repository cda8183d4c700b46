//! Scroll-triggered loading: decide when sentinel visibility should pull
//! the next page.

use std::time::{Duration, Instant};

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1000);

/// Watches the end-of-list sentinel. `observe` is fed visibility events
/// plus the current store flags and answers whether to fire the load-more
/// callback. Firing is throttled by a cooldown on top of the loading
/// guard, so repeated visibility events inside one loading cycle trigger
/// at most one fetch.
#[derive(Debug)]
pub struct SentinelWatcher {
    threshold: f64,
    cooldown: Duration,
    last_fired: Option<Instant>,
    attached: bool,
}

impl SentinelWatcher {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_THRESHOLD, DEFAULT_COOLDOWN)
    }

    pub fn with_settings(threshold: f64, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            last_fired: None,
            attached: true,
        }
    }

    /// Report a sentinel visibility event. Returns true when the caller
    /// should request the next page.
    pub fn observe(&mut self, visible_ratio: f64, loading: bool, has_more: bool, now: Instant) -> bool {
        if !self.attached || visible_ratio < self.threshold {
            return false;
        }
        if loading || !has_more {
            return false;
        }
        if let Some(last) = self.last_fired {
            if now.duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }

    /// Stop observing. After this every event is ignored; a torn-down
    /// sentinel must never fire.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Default for SentinelWatcher {
    fn default() -> Self {
        Self::new()
    }
}
