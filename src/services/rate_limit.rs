use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// Default spacing between two dispatched routing calls
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(3000);

/// Time source for the rate limiter
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    fn sleep_until(&self, deadline: Instant) -> impl Future<Output = ()> + Send;
}

/// Clock backed by the tokio timer
///
/// Under `#[tokio::test(start_paused = true)]` this clock only moves when the
/// test advances it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&self, deadline: Instant) -> impl Future<Output = ()> + Send {
        tokio::time::sleep_until(deadline)
    }
}

/// Serializes calls and spaces their dispatch by a minimum interval
///
/// Only one permit exists. A caller holds it from dispatch until its call
/// completes, so at most one call is ever in flight, and waiting callers are
/// suspended on the lock instead of polling a timer.
#[derive(Debug)]
pub struct RateLimiter<C: Clock = TokioClock> {
    clock: C,
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
    calls: AtomicU64,
}

/// Permission to dispatch one call; the next caller waits until it is dropped
#[derive(Debug)]
pub struct Permit<'a> {
    _slot: MutexGuard<'a, Option<Instant>>,
    /// 1-based sequence number of this call
    pub call: u64,
}

impl RateLimiter<TokioClock> {
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, TokioClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(min_interval: Duration, clock: C) -> Self {
        Self {
            clock,
            min_interval,
            last_dispatch: Mutex::new(None),
            calls: AtomicU64::new(0),
        }
    }

    /// Wait for the next dispatch slot
    pub async fn acquire(&self) -> Permit<'_> {
        let mut slot = self.last_dispatch.lock().await;

        if let Some(last) = *slot {
            let ready_at = last + self.min_interval;
            if self.clock.now() < ready_at {
                self.clock.sleep_until(ready_at).await;
            }
        }

        *slot = Some(self.clock.now());
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        Permit { _slot: slot, call }
    }

    /// Number of calls dispatched so far
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(3));
        let start = Instant::now();

        let permit = limiter.acquire().await;

        assert_eq!(permit.call, 1);
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_spaced_by_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(3));
        let start = Instant::now();

        drop(limiter.acquire().await);
        drop(limiter.acquire().await);
        let third = limiter.acquire().await;

        assert_eq!(third.call, 3);
        assert_eq!(Instant::now() - start, Duration::from_secs(6));
        assert_eq!(limiter.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_slow_call() {
        let limiter = RateLimiter::new(Duration::from_secs(3));

        drop(limiter.acquire().await);
        tokio::time::advance(Duration::from_secs(5)).await;
        let before = Instant::now();
        drop(limiter.acquire().await);

        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_caller_waits_for_permit_release() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let first = limiter.acquire().await;

        let mut second = task::spawn(limiter.acquire());
        assert_pending!(second.poll());

        // Interval elapsed but the first call is still in flight
        tokio::time::advance(Duration::from_millis(500)).await;
        assert_pending!(second.poll());

        drop(first);
        assert!(second.is_woken());
        let permit = assert_ready!(second.poll());
        assert_eq!(permit.call, 2);
    }
}
