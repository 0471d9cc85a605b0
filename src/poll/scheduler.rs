//! Single-slot recurring task scheduling
//!
//! A `PollScheduler` owns one logical timer slot: starting it again replaces
//! any timer already running in the slot, and stopping is always safe. The
//! scheduler does not serialize overlapping callback executions; callers
//! that poll a network must handle out-of-order completions themselves.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

/// The timer slot. Aborts any live task when the last handle is dropped.
#[derive(Default)]
struct Slot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
        }
    }
}

/// Runs a callback on a fixed interval until stopped
#[derive(Clone, Default)]
pub struct PollScheduler {
    slot: Arc<Slot>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the recurring callback, first invocation immediately.
    ///
    /// Any timer already running in this slot is stopped first, so repeated
    /// starts never leak timers.
    pub fn start<F, Fut>(&self, period: Duration, tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.spawn(period, tick, true);
    }

    /// Start the recurring callback, first invocation one full period from now
    pub fn start_delayed<F, Fut>(&self, period: Duration, tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.spawn(period, tick, false);
    }

    fn spawn<F, Fut>(&self, period: Duration, mut tick: F, immediate: bool)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let mut guard = self.slot.lock();
        if let Some(previous) = guard.take() {
            previous.abort();
        }
        *guard = Some(tokio::spawn(async move {
            let mut timer = if immediate {
                interval(period)
            } else {
                interval_at(Instant::now() + period, period)
            };
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                tick().await;
            }
        }));
    }

    /// Stop the timer. No-op when nothing is running; never panics.
    pub fn stop(&self) {
        if let Some(handle) = self.slot.lock().take() {
            handle.abort();
        }
    }

    /// Whether a timer is currently live in this slot
    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::sleep;

    fn counting_tick(counter: Arc<AtomicU32>) -> impl FnMut() -> std::future::Ready<()> {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_the_interval() {
        let scheduler = PollScheduler::new();
        let counter = Arc::new(AtomicU32::new(0));

        scheduler.start(Duration::from_secs(1), counting_tick(counter.clone()));

        // First tick fires immediately, then once per period.
        sleep(Duration::from_millis(3_100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_replaces_previous_timer() {
        let scheduler = PollScheduler::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        scheduler.start(Duration::from_secs(1), counting_tick(first.clone()));
        sleep(Duration::from_millis(1_100)).await;
        let first_before_restart = first.load(Ordering::SeqCst);
        assert!(first_before_restart >= 1);

        scheduler.start(Duration::from_secs(1), counting_tick(second.clone()));
        sleep(Duration::from_millis(5_000)).await;

        // Old timer is dead, only the replacement keeps counting.
        assert_eq!(first.load(Ordering::SeqCst), first_before_restart);
        assert!(second.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_and_is_idempotent() {
        let scheduler = PollScheduler::new();
        let counter = Arc::new(AtomicU32::new(0));

        scheduler.start(Duration::from_secs(1), counting_tick(counter.clone()));
        sleep(Duration::from_millis(2_100)).await;
        scheduler.stop();

        let frozen = counter.load(Ordering::SeqCst);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), frozen);
        assert!(!scheduler.is_running());

        // Stopping again, or stopping a never-started scheduler, is a no-op.
        scheduler.stop();
        PollScheduler::new().stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_start_skips_immediate_tick() {
        let scheduler = PollScheduler::new();
        let counter = Arc::new(AtomicU32::new(0));

        scheduler.start_delayed(Duration::from_secs(1), counting_tick(counter.clone()));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_scheduler_aborts_the_timer() {
        let counter = Arc::new(AtomicU32::new(0));

        {
            let scheduler = PollScheduler::new();
            scheduler.start(Duration::from_secs(1), counting_tick(counter.clone()));
            sleep(Duration::from_millis(1_100)).await;
        }

        let frozen = counter.load(Ordering::SeqCst);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), frozen);
    }
}
