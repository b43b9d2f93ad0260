//! Refresh signal multiplexer.
//!
//! One cancellable periodic timer and any number of manual triggers feed a
//! single channel of [`RefreshSignal`]s. The consumer re-fetches backend
//! state for every signal it receives.
//!
//! ```text
//!   interval(period) ──┐
//!                      ├──▶ RefreshSignals::recv() ──▶ fetch + apply
//!   RefreshHandle::trigger() ──┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Default polling period.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_millis(2000);

/// Why a refresh was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSignal {
    /// The periodic timer fired.
    Tick,
    /// Someone asked for an immediate refresh (user action, command settled).
    Manual,
}

/// Periodic refresh timer configuration.
#[derive(Debug, Clone, Copy)]
pub struct RefreshScheduler {
    period: Duration,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_PERIOD)
    }
}

impl RefreshScheduler {
    /// Create a scheduler firing every `period` (must be non-zero; zero is
    /// bumped to one millisecond).
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the periodic timer on the current tokio runtime.
    ///
    /// The first tick fires one full period after this call. Returns the
    /// handle used for manual triggers and teardown, and the receiving end
    /// of the merged signal stream.
    pub fn start(&self) -> (RefreshHandle, RefreshSignals) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let stopped = Arc::new(AtomicBool::new(false));
        let period = self.period;

        let tick_tx = signal_tx.clone();
        let tick_stopped = stopped.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if tick_stopped.load(Ordering::Acquire) {
                            break;
                        }
                        if tick_tx.send(RefreshSignal::Tick).is_err() {
                            // Consumer gone
                            break;
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("refresh timer stopped");
        });

        let handle = RefreshHandle {
            inner: Arc::new(HandleInner {
                signal_tx,
                stop_tx,
                stopped: stopped.clone(),
            }),
        };
        let signals = RefreshSignals {
            receiver: signal_rx,
            stop_rx: handle.inner.stop_tx.subscribe(),
            stopped,
        };
        (handle, signals)
    }
}

#[derive(Debug)]
struct HandleInner {
    signal_tx: mpsc::UnboundedSender<RefreshSignal>,
    stop_tx: watch::Sender<bool>,
    stopped: Arc<AtomicBool>,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        let _ = self.stop_tx.send(true);
    }
}

/// Cloneable control handle for a running scheduler.
///
/// The timer stops when [`stop`](Self::stop) is called or the last clone is
/// dropped.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    inner: Arc<HandleInner>,
}

impl RefreshHandle {
    /// Emit one immediate refresh signal.
    ///
    /// Does not shift the periodic schedule. No-op after [`stop`](Self::stop).
    pub fn trigger(&self) {
        if self.is_stopped() {
            return;
        }
        let _ = self.inner.signal_tx.send(RefreshSignal::Manual);
    }

    /// Stop the timer and suppress any further delivery. Idempotent.
    pub fn stop(&self) {
        if !self.inner.stopped.swap(true, Ordering::AcqRel) {
            debug!("stopping refresh scheduler");
        }
        let _ = self.inner.stop_tx.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }
}

/// Receiving end of the merged refresh signal stream.
#[derive(Debug)]
pub struct RefreshSignals {
    receiver: mpsc::UnboundedReceiver<RefreshSignal>,
    stop_rx: watch::Receiver<bool>,
    stopped: Arc<AtomicBool>,
}

impl RefreshSignals {
    /// Wait for the next signal.
    ///
    /// Returns `None` once the scheduler has been stopped, even if signals
    /// were still queued. A pending call wakes up as soon as
    /// [`RefreshHandle::stop`] runs.
    pub async fn recv(&mut self) -> Option<RefreshSignal> {
        if self.stopped.load(Ordering::Acquire) {
            return None;
        }
        // Only `true` is ever published, so any change (or a dropped
        // sender) means stop.
        tokio::select! {
            biased;
            _ = self.stop_rx.changed() => None,
            signal = self.receiver.recv() => {
                if self.stopped.load(Ordering::Acquire) {
                    None
                } else {
                    signal
                }
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<RefreshSignal> {
        if self.stopped.load(Ordering::Acquire) {
            return None;
        }
        self.receiver.try_recv().ok()
    }
}
