//! Once-per-second elapsed-time ticker
//!
//! Drives a counter while a search is active. The tick callback returns
//! whether ticking should continue; a `false` return halts the ticker from
//! inside the tick, so the counter is frozen within one tick of searching
//! ending even before the owner calls `stop`.

use crate::poll::scheduler::PollScheduler;
use std::time::Duration;

/// A once-per-second callback slot
#[derive(Clone, Default)]
pub struct ElapsedTicker {
    scheduler: PollScheduler,
}

impl ElapsedTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking. The first invocation happens one second after start.
    ///
    /// `advance` returns `true` to keep ticking, `false` to halt.
    /// Starting again replaces any running ticker.
    pub fn start<F>(&self, mut advance: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let scheduler = self.scheduler.clone();
        self.scheduler
            .start_delayed(Duration::from_secs(1), move || {
                let keep_ticking = advance();
                let scheduler = scheduler.clone();
                async move {
                    if !keep_ticking {
                        scheduler.stop();
                    }
                }
            });
    }

    /// Stop ticking. No-op when idle; never panics.
    pub fn stop(&self) {
        self.scheduler.stop();
    }

    /// Whether the ticker is currently live
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }
}
