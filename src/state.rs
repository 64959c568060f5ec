//! Persisted run state and its backing store.
//!
//! The state file is the tracker's only durable artifact: a JSON document
//! holding the last run timestamp, the per-directory last-seen mtimes, and
//! the accumulated modified-directory log. It must round-trip losslessly,
//! stay human-inspectable, and survive a process dying mid-write.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// The persisted aggregate. Exactly one instance per tracker; mutated in
/// place during a run and written back at the end of it.
///
/// `BTreeMap` keys keep the serialized document in a stable order, so
/// successive snapshots diff cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunState {
    /// Timestamp of the last executed run, epoch seconds.
    pub ts: i64,

    /// Directory path → last-seen modification time (epoch seconds,
    /// fractional part preserved).
    #[serde(default)]
    pub tracked_paths: BTreeMap<PathBuf, f64>,

    /// Directory path → representative filename that triggered the
    /// "modified" classification. A running log, never recomputed.
    #[serde(default)]
    pub modified_paths: BTreeMap<PathBuf, String>,
}

impl RunState {
    /// Fresh state for a first-ever run: empty maps, and a timestamp floor
    /// far enough back that existing files become baseline instead of
    /// being reported as newly modified.
    #[must_use]
    pub const fn baseline(floor_ts: i64) -> Self {
        Self {
            ts: floor_ts,
            tracked_paths: BTreeMap::new(),
            modified_paths: BTreeMap::new(),
        }
    }
}

/// Owner of the state file's load/save lifecycle. The backing path is fixed
/// for the lifetime of the store.
#[derive(Debug, Clone)]
pub struct StateStore {
    /// Canonical location of the persisted state.
    path: PathBuf,
}

impl StateStore {
    /// Create a store backed by `path`. Nothing is touched on disk until
    /// the first save.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing-file path, exposed so the path filter can self-exclude it.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state. Any failure — missing file, truncated or
    /// malformed JSON — falls back to [`RunState::baseline`] with the given
    /// floor. This is a recovery path, not an error.
    #[must_use]
    pub fn load(&self, floor_ts: i64) -> RunState {
        match std::fs::read(&self.path) {
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(state) => state,
                Err(err) => {
                    debug!(
                        "unreadable state at {}, starting fresh: {err}",
                        self.path.display()
                    );
                    RunState::baseline(floor_ts)
                }
            },
            Err(err) => {
                debug!("no state at {}: {err}", self.path.display());
                RunState::baseline(floor_ts)
            }
        }
    }

    /// Persist the state durably: serialize, write to a temporary file next
    /// to the canonical path, then atomically publish it. The previous
    /// content survives any interruption before the final rename.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write, or the
    /// publish step fails. This is the one failure the tracker surfaces as
    /// a hard error — silently losing state would reset tracking history.
    pub fn save(&self, state: &RunState) -> Result<()> {
        let data = serde_json::to_vec_pretty(state).context("Failed to serialize run state")?;

        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory: {}", parent.display()))?;

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
        tmp.write_all(&data).context("Failed to write run state")?;
        tmp.as_file().sync_all().context("Failed to flush run state")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to publish state file: {}", self.path.display()))?;

        Ok(())
    }
}
