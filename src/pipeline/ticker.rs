// SPDX-License-Identifier: GPL-3.0-only

//! Fixed-rate capture tick loop
//!
//! A self-rescheduling ticker rather than a cancellable timer: the tick
//! thread consults the running flag at fire time, invokes the listener, then
//! sleeps for the computed interval. `stop` only clears the flag, so a
//! wake-up already pending when `stop` is called is a single no-op instead
//! of a cancelled timer. This trades one wasted wake-up for not needing a
//! cancellation primitive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed-rate ticker driving the capture loop
///
/// The listener runs on the tick thread and must not block: the next tick's
/// scheduling shares that thread. In this pipeline the listener only posts a
/// message to the coordinating context.
pub struct CaptureTicker {
    listener: Arc<dyn Fn() + Send + Sync>,
    interval: Duration,
    /// Flag for the current run; each start gets a fresh one so a stopped
    /// thread that has not exited yet can never resume
    run_flag: Mutex<Option<Arc<AtomicBool>>>,
}

impl CaptureTicker {
    /// Create a ticker firing `fps` times per second
    ///
    /// The interval is `1000 / fps` milliseconds with integer division, so
    /// fractional rates truncate (fps=3 gives 333 ms). An fps of 0 is
    /// treated as 1.
    pub fn new<F>(fps: u32, listener: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            listener: Arc::new(listener),
            interval: Duration::from_millis(u64::from(1000 / fps.max(1))),
            run_flag: Mutex::new(None),
        }
    }

    /// Tick interval computed from the configured rate
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking; the first tick fires immediately. No-op while already
    /// running.
    pub fn start(&self) {
        let mut slot = self.run_flag.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|flag| flag.load(Ordering::Acquire)) {
            return;
        }

        let flag = Arc::new(AtomicBool::new(true));
        let thread_flag = Arc::clone(&flag);
        let listener = Arc::clone(&self.listener);
        let interval = self.interval;

        debug!(interval_ms = interval.as_millis() as u64, "Starting capture ticker");
        let spawned = thread::Builder::new()
            .name("capture-ticker".into())
            .spawn(move || {
                loop {
                    // consulted at fire time: a stop between ticks suppresses
                    // the callback and ends the loop
                    if !thread_flag.load(Ordering::Acquire) {
                        debug!("Capture ticker stopped");
                        break;
                    }
                    listener();
                    thread::sleep(interval);
                }
            });

        match spawned {
            Ok(_) => *slot = Some(flag),
            Err(e) => warn!(error = %e, "Failed to spawn ticker thread"),
        }
    }

    /// Stop ticking. Does not cancel a pending wake-up; the tick thread
    /// observes the cleared flag at its next fire and exits without invoking
    /// the listener.
    pub fn stop(&self) {
        let slot = self.run_flag.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(flag) = slot.as_ref() {
            flag.store(false, Ordering::Release);
        }
    }

    pub fn is_running(&self) -> bool {
        let slot = self.run_flag.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}
