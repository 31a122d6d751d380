//! Debounced re-classification
//!
//! Data-change notifications tend to arrive in bursts after a write. The
//! scheduler coalesces a burst into a single classification run once the
//! notifications have been quiet for the configured period.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::config::RefreshConfig;

/// Single-slot quiet-period tracker
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    last_notified: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_notified: None,
        }
    }

    /// Record a change notification; restarts the quiet period
    pub fn notify(&mut self, now: Instant) {
        self.last_notified = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_notified.is_some()
    }

    /// When the pending refresh becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.last_notified.map(|t| t + self.quiet)
    }

    /// True exactly once per burst, when the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.last_notified = None;
                true
            }
            _ => false,
        }
    }
}

/// Background task that runs a refresh callback after each quiet burst
pub struct RefreshScheduler {
    trigger: mpsc::Sender<()>,
    task: JoinHandle<()>,
    runs: Arc<AtomicU64>,
}

impl RefreshScheduler {
    /// Spawn onto the current tokio runtime
    pub fn spawn<F>(config: &RefreshConfig, on_refresh: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        // one slot: a pending signal already covers every later one
        let (trigger, rx) = mpsc::channel(1);
        let runs = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run_loop(
            rx,
            Debouncer::new(config.debounce()),
            on_refresh,
            Arc::clone(&runs),
        ));

        let scheduler = Self {
            trigger,
            task,
            runs,
        };
        if config.initial_run {
            scheduler.notify();
        }
        scheduler
    }

    /// Signal that the underlying data changed
    pub fn notify(&self) {
        // Full means a signal is already queued
        let _ = self.trigger.try_send(());
    }

    /// Refreshes run so far
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    /// Stop the task; a refresh still waiting out its quiet period is dropped
    pub async fn shutdown(self) {
        drop(self.trigger);
        if let Err(e) = self.task.await {
            tracing::warn!("Refresh task ended abnormally: {}", e);
        }
    }
}

async fn run_loop<F>(
    mut rx: mpsc::Receiver<()>,
    mut debouncer: Debouncer,
    mut on_refresh: F,
    runs: Arc<AtomicU64>,
) where
    F: FnMut() + Send + 'static,
{
    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            signal = rx.recv() => match signal {
                Some(()) => debouncer.notify(Instant::now()),
                None => {
                    if debouncer.is_pending() {
                        tracing::debug!("Dropping pending refresh on shutdown");
                    }
                    return;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if debouncer.poll(Instant::now()) {
                    tracing::debug!("Running debounced refresh");
                    on_refresh();
                    runs.fetch_add(1, Ordering::SeqCst);
                }
            }
        }
    }
}
