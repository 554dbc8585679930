//! Directory snapshots and the delta between two of them.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// The set of entry names present in a directory at one point in time.
///
/// Names are kept as raw `OsString`s in an ordered set, so two entries never
/// collapse into one and every sequence derived from a snapshot is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeSet<OsString>,
}

/// Names added and removed between two snapshots, both sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub added: Vec<OsString>,
    pub removed: Vec<OsString>,
}

impl Snapshot {
    /// Lists one level of `directory`. Files and subdirectories both count
    /// as entries; only the final name component is kept.
    pub fn read<P: AsRef<Path>>(directory: P) -> std::io::Result<Self> {
        let mut entries = BTreeSet::new();
        for entry in std::fs::read_dir(directory)? {
            entries.insert(entry?.file_name());
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<S: AsRef<OsStr>>(&self, name: S) -> bool {
        self.entries.contains(name.as_ref())
    }

    /// Computes what changed going from `self` to `newer`.
    pub fn diff(&self, newer: &Snapshot) -> Delta {
        Delta {
            added: newer.entries.difference(&self.entries).cloned().collect(),
            removed: self.entries.difference(&newer.entries).cloned().collect(),
        }
    }

    /// Rebuilds the newer snapshot from this one and a delta.
    pub fn apply(&self, delta: &Delta) -> Snapshot {
        let mut entries = self.entries.clone();
        entries.extend(delta.added.iter().cloned());
        for name in &delta.removed {
            entries.remove(name);
        }
        Snapshot { entries }
    }
}

impl<S: Into<OsString>> FromIterator<S> for Snapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Added names as display strings, invalid UTF-8 replaced.
    pub fn added_lossy(&self) -> Vec<String> {
        lossy(&self.added)
    }

    /// Removed names as display strings, invalid UTF-8 replaced.
    pub fn removed_lossy(&self) -> Vec<String> {
        lossy(&self.removed)
    }
}

fn lossy(names: &[OsString]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}
