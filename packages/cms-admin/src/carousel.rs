//! Auto-advancing slide carousel.
//!
//! [`Carousel`] is the index state; [`run_carousel`] drives it on a fixed
//! cadence. Manual navigation moves the index but leaves the cadence alone.
//! A change in slide count restarts the cadence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest cadence the driver accepts. Zero would make the timer panic.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
    interval: Duration,
    /// Bumped every time the cadence restarts
    epoch: u64,
}

impl Carousel {
    /// `interval` is raised to [`MIN_INTERVAL`] if shorter.
    pub fn new(len: usize, interval: Duration) -> Self {
        Self {
            len,
            index: 0,
            interval: interval.max(MIN_INTERVAL),
            epoch: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Timer firing. Wraps past the last slide.
    pub fn tick(&mut self) -> usize {
        self.next()
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// Jump to slide `k`. Out-of-range selections are ignored.
    pub fn select(&mut self, k: usize) -> bool {
        if k >= self.len {
            return false;
        }
        self.index = k;
        true
    }

    /// New slide count. Returns true when the count changed and the cadence
    /// must restart.
    pub fn set_len(&mut self, len: usize) -> bool {
        if len == self.len {
            return false;
        }
        self.len = len;
        self.index = self.index.min(len.saturating_sub(1));
        self.epoch += 1;
        true
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(0, DEFAULT_INTERVAL)
    }
}

fn lock(carousel: &Mutex<Carousel>) -> MutexGuard<'_, Carousel> {
    carousel.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Advance `carousel` every interval until `shutdown` fires.
///
/// The count already in `slide_count` is applied before the first tick.
/// Later updates resize the carousel and restart the interval. If the sender
/// goes away the last count stays.
pub async fn run_carousel(
    carousel: Arc<Mutex<Carousel>>,
    mut slide_count: watch::Receiver<usize>,
    shutdown: CancellationToken,
) {
    let period = {
        let mut state = lock(&carousel);
        state.set_len(*slide_count.borrow_and_update());
        state.interval()
    };
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut watching = true;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = slide_count.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                    continue;
                }
                let len = *slide_count.borrow_and_update();
                if lock(&carousel).set_len(len) {
                    debug!(len, "Slide count changed, restarting carousel");
                    ticker.reset();
                }
            }
            _ = ticker.tick() => {
                let index = lock(&carousel).tick();
                debug!(index, "Carousel advanced");
            }
        }
    }
}
