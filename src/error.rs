//! Error types for directory polling.
//!
//! [`WatchError`] separates the three ways a poll cycle can go wrong:
//!
//! - **Directory access** ([`WatchError::DirectoryAccess`]): the first listing
//!   failed. Fatal, the tracker cannot be built without a starting snapshot.
//! - **Transient listing** ([`WatchError::TransientListing`]): a later listing
//!   failed. Recoverable, the stored snapshot is kept and the next tick retries.
//! - **Listener** ([`WatchError::Listener`]): a listener returned an error or
//!   panicked. Recoverable, the remaining listeners still run.

use std::path::PathBuf;

/// Errors raised by the tracker and dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The directory could not be listed when the tracker was created.
    #[error("cannot access directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory could not be listed during a poll.
    #[error("failed to list directory {}: {source}", path.display())]
    TransientListing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A registered listener failed while receiving a delta.
    #[error("listener '{listener}' failed: {source}")]
    Listener {
        listener: String,
        #[source]
        source: anyhow::Error,
    },
}

impl WatchError {
    pub fn directory_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryAccess {
            path: path.into(),
            source,
        }
    }

    pub fn transient_listing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TransientListing {
            path: path.into(),
            source,
        }
    }

    pub fn listener(listener: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Listener {
            listener: listener.into(),
            source,
        }
    }

    /// Returns `true` if polling can carry on after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::TransientListing { .. } | Self::Listener { .. })
    }

    /// Returns `true` if this error should halt startup.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}
