use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::tracker::{DirectoryTracker, PollOutcome};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Runs [`DirectoryTracker::poll`] on a dedicated thread at a fixed interval.
///
/// Polls happen one after another on that single thread, with the tracker
/// locked for the whole list-diff-dispatch sequence. Dropping the watcher
/// stops the thread.
pub struct DirectoryWatcher {
    tracker: Arc<Mutex<DirectoryTracker>>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl DirectoryWatcher {
    pub fn start(tracker: DirectoryTracker, interval: Duration) -> Result<Self> {
        let tracker = Arc::new(Mutex::new(tracker));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let shared = tracker.clone();
        let handle = thread::Builder::new()
            .name("dirpoll-timer".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let mut tracker = shared.lock();
                        if let PollOutcome::Changed {
                            failed_listeners, ..
                        } = tracker.poll()
                        {
                            if !failed_listeners.is_empty() {
                                tracing::warn!(
                                    "{} listener(s) failed for {}",
                                    failed_listeners.len(),
                                    tracker.directory().display()
                                );
                            }
                        }
                    }
                    // Stop requested or the watcher was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .context("Failed to spawn poll thread")?;

        tracing::debug!("Polling every {:?}", interval);

        Ok(Self {
            tracker,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Runs `f` with exclusive access to the tracker, waiting for any poll
    /// in progress to finish first.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&mut DirectoryTracker) -> R) -> R {
        f(&mut *self.tracker.lock())
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the poll thread and waits for it to exit.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Poll thread panicked");
            }
        }
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
