#![forbid(unsafe_code)]

//! Cooperative shutdown signalling.
//!
//! A [`StopSignal`] / [`StopTrigger`] pair is the single cancellation token
//! shared by every background thread the framework spawns: the byte reader,
//! the key parser, the resize watcher, and command/subscription tasks. The
//! event loop owns the trigger and fires it on every exit path; observers
//! either check [`StopSignal::is_stopped`] between blocking operations or
//! learn about shutdown when a channel send fails after the loop has dropped
//! its receivers.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Observer half of the shutdown token. Cheap to clone.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

/// Trigger half of the shutdown token. Cheap to clone.
#[derive(Clone)]
pub struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a new signal/trigger pair.
    pub fn new() -> (StopSignal, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        (
            StopSignal {
                inner: inner.clone(),
            },
            StopTrigger { inner },
        )
    }

    /// Check whether shutdown has been requested.
    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap()
    }

    /// Block until shutdown or the timeout elapses.
    ///
    /// Returns `true` if stopped, `false` on timeout. Loops on the condvar to
    /// absorb spurious wakeups.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap();
        let start = Instant::now();
        loop {
            if *stopped {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar.wait_timeout(stopped, duration - elapsed).unwrap();
            stopped = guard;
        }
    }
}

impl StopTrigger {
    /// Request shutdown. Idempotent; wakes every waiter.
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap();
        *stopped = true;
        cvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_unstopped() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.is_stopped());
    }

    #[test]
    fn trigger_is_observed_across_threads() {
        let (signal, trigger) = StopSignal::new();
        let observer = signal.clone();
        let handle = thread::spawn(move || observer.wait_timeout(Duration::from_secs(5)));
        trigger.stop();
        assert!(handle.join().unwrap());
        assert!(signal.is_stopped());
    }

    #[test]
    fn wait_times_out_when_untriggered() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }
}
