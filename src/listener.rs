//! Listener trait and the built-in listeners.

use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Receives every non-empty delta detected by a tracker.
pub trait Listener: Send {
    fn receive(&mut self, directory: &Path, added: &[String], removed: &[String]) -> Result<()>;

    /// Name used when reporting a failure from this listener.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Listener for F
where
    F: FnMut(&Path, &[String], &[String]) -> Result<()> + Send,
{
    fn receive(&mut self, directory: &Path, added: &[String], removed: &[String]) -> Result<()> {
        self(directory, added, removed)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Prints a human readable summary of each delta.
pub struct ConsoleListener<W: Write + Send = Stdout> {
    out: W,
}

impl ConsoleListener {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleListener {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write + Send> ConsoleListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Formats a delta the way [`ConsoleListener`] prints it.
pub fn render_change(directory: &Path, added: &[String], removed: &[String]) -> String {
    let mut text = format!("\nChanges in directory: {}\n", directory.display());
    if !added.is_empty() {
        text.push_str(&format!("    New files created: {}\n", added.join(", ")));
    }
    if !removed.is_empty() {
        text.push_str(&format!("    Files deleted: {}\n", removed.join(", ")));
    }
    text
}

impl<W: Write + Send> Listener for ConsoleListener<W> {
    fn receive(&mut self, directory: &Path, added: &[String], removed: &[String]) -> Result<()> {
        if added.is_empty() && removed.is_empty() {
            return Ok(());
        }
        self.out
            .write_all(render_change(directory, added, removed).as_bytes())
            .context("Failed to write change summary")?;
        self.out.flush().context("Failed to flush output")?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[derive(Debug, Serialize)]
struct DirectoryChange<'a> {
    directory: &'a Path,
    added: &'a [String],
    removed: &'a [String],
    timestamp: DateTime<Utc>,
}

/// Writes one JSON object per delta, one per line.
pub struct JsonListener<W: Write + Send = Stdout> {
    out: W,
}

impl JsonListener {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> JsonListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Listener for JsonListener<W> {
    fn receive(&mut self, directory: &Path, added: &[String], removed: &[String]) -> Result<()> {
        let change = DirectoryChange {
            directory,
            added,
            removed,
            timestamp: Utc::now(),
        };
        let line = serde_json::to_string(&change).context("Failed to serialize change")?;
        writeln!(self.out, "{}", line).context("Failed to write change")?;
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Records every delta it receives. Handy for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    calls: std::sync::Arc<parking_lot::Mutex<Vec<(PathBuf, Vec<String>, Vec<String>)>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>, Vec<String>)> {
        self.calls.lock().clone()
    }
}

impl Listener for RecordingListener {
    fn receive(&mut self, directory: &Path, added: &[String], removed: &[String]) -> Result<()> {
        self.calls
            .lock()
            .push((directory.to_path_buf(), added.to_vec(), removed.to_vec()));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
