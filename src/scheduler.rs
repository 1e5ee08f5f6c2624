use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A periodic background task: a worker thread that fires a callback once
/// per interval until stopped. Stopping (or dropping) wakes the sleeping
/// worker immediately and joins it, so no tick fires after teardown.
pub struct Ticker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl Ticker {
    /// Spawn a worker that calls `tick` every `interval`. The first call
    /// happens one full interval after spawning.
    pub fn spawn<F>(name: &'static str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let shared = Arc::new(Shared {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
        });
        let worker = Arc::clone(&shared);
        let handle = thread::spawn(move || {
            log::trace!("{name}: ticker started ({interval:?})");
            let mut stopped = worker
                .stopped
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            while !*stopped {
                let (guard, wait) = worker
                    .wake
                    .wait_timeout(stopped, interval)
                    .unwrap_or_else(PoisonError::into_inner);
                stopped = guard;
                if *stopped {
                    break;
                }
                if wait.timed_out() {
                    // The lock is released while the callback runs, so
                    // commands never wait on a tick in progress.
                    drop(stopped);
                    tick();
                    stopped = worker
                        .stopped
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
            log::trace!("{name}: ticker stopped");
        });
        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Raise the stop flag, wake the worker, and wait for it to exit.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            *self
                .shared
                .stopped
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = true;
            self.shared.wake.notify_all();
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[test]
    fn test_ticker_fires_repeatedly() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let mut ticker = Ticker::spawn("test-fire", Duration::from_millis(5), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(120));
        ticker.stop();
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let mut ticker = Ticker::spawn("test-stop", Duration::from_millis(5), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(40));
        ticker.stop();
        let frozen = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), frozen);
    }

    #[test]
    fn test_drop_joins_the_worker() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let c = Arc::clone(&count);
            let _ticker = Ticker::spawn("test-drop", Duration::from_millis(5), move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
            thread::sleep(Duration::from_millis(30));
        }
        let frozen = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), frozen);
    }

    #[test]
    fn test_stop_is_prompt_even_with_a_long_interval() {
        let mut ticker = Ticker::spawn("test-prompt", Duration::from_secs(60), || {});
        let start = Instant::now();
        ticker.stop();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_stop_twice_is_harmless() {
        let mut ticker = Ticker::spawn("test-twice", Duration::from_millis(5), || {});
        ticker.stop();
        ticker.stop();
    }
}
