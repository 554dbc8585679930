//! Synchronous fan-out of deltas to registered listeners.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::WatchError;
use crate::listener::Listener;

/// Ordered list of listeners.
///
/// Listeners run on the caller's thread in registration order. A failing
/// listener is logged and skipped over; it never stops the ones after it.
#[derive(Default)]
pub struct Dispatcher {
    listeners: Vec<Box<dyn Listener>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener. Duplicates are allowed.
    pub fn register(&mut self, listener: Box<dyn Listener>) {
        tracing::debug!("Registered listener '{}'", listener.name());
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Calls every listener with the delta and returns the failures.
    pub fn dispatch(&mut self, directory: &Path, added: &[String], removed: &[String]) -> Vec<WatchError> {
        let mut failures = Vec::new();

        for listener in &mut self.listeners {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                listener.receive(directory, added, removed)
            }));

            let error = match result {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => WatchError::listener(listener.name(), err),
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    WatchError::listener(
                        listener.name(),
                        anyhow::anyhow!("listener panicked: {}", message),
                    )
                }
            };

            tracing::error!("{}", error);
            failures.push(error);
        }

        failures
    }
}
