use std::path::{Path, PathBuf};

use crate::dispatcher::Dispatcher;
use crate::error::WatchError;
use crate::listener::Listener;
use crate::snapshot::{Delta, Snapshot};

/// What a single call to [`DirectoryTracker::poll`] did.
#[derive(Debug)]
pub enum PollOutcome {
    /// The listing matched the stored snapshot.
    Unchanged,
    /// Entries were added or removed and listeners were notified.
    Changed {
        delta: Delta,
        failed_listeners: Vec<WatchError>,
    },
    /// The directory could not be listed; the stored snapshot was kept.
    Failed(WatchError),
}

impl PollOutcome {
    pub fn delta(&self) -> Option<&Delta> {
        match self {
            Self::Changed { delta, .. } => Some(delta),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Owns the last known listing of one directory and reports how it changes.
pub struct DirectoryTracker {
    directory: PathBuf,
    snapshot: Snapshot,
    dispatcher: Dispatcher,
}

impl DirectoryTracker {
    /// Takes the initial snapshot. The directory must already exist.
    pub fn initialize<P: AsRef<Path>>(directory: P) -> Result<Self, WatchError> {
        let directory = directory.as_ref().to_path_buf();
        let snapshot = Snapshot::read(&directory)
            .map_err(|err| WatchError::directory_access(&directory, err))?;

        tracing::debug!(
            "Initial snapshot of {} has {} entries",
            directory.display(),
            snapshot.len()
        );

        Ok(Self {
            directory,
            snapshot,
            dispatcher: Dispatcher::new(),
        })
    }

    pub fn register_listener<L: Listener + 'static>(&mut self, listener: L) {
        self.dispatcher.register(Box::new(listener));
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn listener_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// Lists the directory again, notifies listeners of any delta and
    /// stores the new listing.
    ///
    /// A failed listing is logged and leaves the stored snapshot untouched,
    /// so the next successful poll diffs against the last good state.
    pub fn poll(&mut self) -> PollOutcome {
        let current = match Snapshot::read(&self.directory) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                let err = WatchError::transient_listing(&self.directory, err);
                tracing::warn!("{}", err);
                return PollOutcome::Failed(err);
            }
        };

        let delta = self.snapshot.diff(&current);
        let outcome = if delta.is_empty() {
            PollOutcome::Unchanged
        } else {
            tracing::debug!(
                "{}: {} added, {} removed",
                self.directory.display(),
                delta.added.len(),
                delta.removed.len()
            );
            let failed_listeners = self.dispatcher.dispatch(
                &self.directory,
                &delta.added_lossy(),
                &delta.removed_lossy(),
            );
            PollOutcome::Changed {
                delta,
                failed_listeners,
            }
        };

        self.snapshot = current;
        outcome
    }
}
