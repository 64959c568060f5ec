//! The change-tracking orchestrator.
//!
//! A [`ChangeTracker`] composes root enumeration, the walker, the path
//! filter and the state store into one synchronous scan pass: walk every
//! eligible file, update per-directory timestamps, compute the delta of
//! newly modified directories, prune directories that vanished from the
//! input set, and persist the result.
//!
//! Per-file failures are classified, never fatal. The only hard error a
//! run can surface is a failed state save — losing the persisted state
//! silently would corrupt every future incremental decision.

use crate::TrackerContext;
use crate::filter::PathFilter;
use crate::roots::RootSource;
use crate::state::{RunState, StateStore};
use crate::{utils, walker};
use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Classification of a single file visit during a scan.
///
/// The scan treats every skip as non-fatal; the typed outcome exists so the
/// policy is explicit and testable instead of silent suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    /// The file advanced its directory's tracked timestamp.
    Tracked {
        /// True when the directory was already known before this run and is
        /// therefore recorded as modified; false for a first-ever baseline.
        newly_modified: bool,
    },
    /// Modification time predates the current tracking window.
    SkippedStale,
    /// Modification time carries no new information for its directory.
    SkippedCurrent,
    /// The file could not be stat'ed (vanished mid-scan, permissions).
    SkippedUnreadable,
}

/// Result of one executed scan pass, surfaced to collaborators.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Directories first observed as modified by this run, with the
    /// filename that triggered the classification.
    pub newly_modified: BTreeMap<PathBuf, String>,

    /// Eligible files visited.
    pub visited_files: usize,

    /// Directories observed to contain at least one eligible file.
    pub input_dirs: usize,

    /// Directories tracked after pruning.
    pub tracked_dirs: usize,

    /// Wall time of the scan pass.
    pub elapsed: Duration,
}

/// Orchestrator owning the run state for the lifetime of the process.
pub struct ChangeTracker {
    /// Where scans start.
    roots: Box<dyn RootSource>,
    /// Eligibility policy.
    filter: PathFilter,
    /// Durable state backing.
    store: StateStore,
    /// The in-memory run state, mutated during scans.
    state: RunState,
    /// Minimum spacing between unforced runs, seconds.
    run_interval: i64,
    /// Report of the most recent executed run, if any.
    last_report: Option<ScanReport>,
}

impl ChangeTracker {
    /// Build a tracker from a context: select roots, compile the filter,
    /// and load (or default) the persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured exclusion pattern fails to compile.
    pub fn new(ctx: &TrackerContext) -> Result<Self> {
        let store = StateStore::new(ctx.state_path.clone());
        let filter = PathFilter::from_config(&ctx.config.exclusions, store.path())?;
        let roots = crate::roots::detect(&ctx.config.scan);

        let window = i64::try_from(ctx.config.scan.staleness_window_secs).unwrap_or(i64::MAX);
        let floor = utils::current_timestamp().saturating_sub(window);
        let state = store.load(floor);

        Ok(Self {
            roots,
            filter,
            store,
            state,
            run_interval: i64::try_from(ctx.config.scan.run_interval_secs).unwrap_or(i64::MAX),
            last_report: None,
        })
    }

    /// Current run state (read-only; for status display).
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Report of the most recent executed run in this process, if any.
    #[must_use]
    pub const fn last_report(&self) -> Option<&ScanReport> {
        self.last_report.as_ref()
    }

    /// Execute one scan pass, or nothing if the throttle window has not
    /// elapsed.
    ///
    /// Returns `Ok(None)` for a throttled no-op and `Ok(Some(report))` for
    /// an executed run.
    ///
    /// # Errors
    ///
    /// Returns an error only if persisting the updated state fails.
    pub fn run(&mut self, force: bool) -> Result<Option<ScanReport>> {
        let now = utils::current_timestamp();
        let next_due = self.state.ts.saturating_add(self.run_interval);
        if !force && now < next_due {
            debug!("run skipped: {}s until the next window", next_due - now);
            return Ok(None);
        }

        let started = Instant::now();
        let prev_tracked: HashSet<PathBuf> = self.state.tracked_paths.keys().cloned().collect();
        let prev_modified: HashSet<PathBuf> = self.state.modified_paths.keys().cloned().collect();

        let mut input_paths: HashSet<PathBuf> = HashSet::new();
        let mut visited_files = 0usize;

        for root in self.roots.roots() {
            debug!("scanning {}", root.display());
            for file in walker::walk_files(&root) {
                if !self.filter.is_eligible(&file) {
                    continue;
                }
                let Some(dir) = file.parent().map(Path::to_path_buf) else {
                    continue;
                };
                visited_files += 1;
                // Recorded before the stat: a directory whose files all
                // vanish mid-scan still counts as observed this run.
                input_paths.insert(dir.clone());

                let outcome = self.visit_file(&file, &dir, &prev_tracked);
                trace!("{outcome:?}: {}", file.display());
            }
        }

        // Directories absent from this run's input set can no longer be
        // modified; drop them. The modified log is historical and survives.
        self.state
            .tracked_paths
            .retain(|dir, _| input_paths.contains(dir));

        let newly_modified: BTreeMap<PathBuf, String> = self
            .state
            .modified_paths
            .iter()
            .filter(|(dir, _)| !prev_modified.contains(*dir))
            .map(|(dir, file)| (dir.clone(), file.clone()))
            .collect();

        self.state.ts = now;
        self.store.save(&self.state)?;

        let report = ScanReport {
            newly_modified,
            visited_files,
            input_dirs: input_paths.len(),
            tracked_dirs: self.state.tracked_paths.len(),
            elapsed: started.elapsed(),
        };

        debug!(
            "processed {}/{} paths in {}",
            report.tracked_dirs,
            report.input_dirs,
            humantime::format_duration(Duration::from_millis(
                u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX)
            ))
        );
        if !report.newly_modified.is_empty() {
            info!("{} newly modified directories", report.newly_modified.len());
        }

        self.last_report = Some(report.clone());
        Ok(Some(report))
    }

    /// Visit one eligible file: stat it and fold its mtime into the state.
    #[allow(clippy::cast_precision_loss)]
    fn visit_file(
        &mut self,
        file: &Path,
        dir: &Path,
        prev_tracked: &HashSet<PathBuf>,
    ) -> VisitOutcome {
        let Ok(mtime) = utils::file_mtime(file) else {
            return VisitOutcome::SkippedUnreadable;
        };

        if mtime < self.state.ts as f64 {
            return VisitOutcome::SkippedStale;
        }
        let known = self.state.tracked_paths.get(dir).copied().unwrap_or(0.0);
        if mtime <= known {
            return VisitOutcome::SkippedCurrent;
        }

        self.state.tracked_paths.insert(dir.to_path_buf(), mtime);

        // A directory's first-ever appearance is baseline, not "modified";
        // only previously known directories make the modified log.
        let newly_modified = prev_tracked.contains(dir);
        if newly_modified {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.state.modified_paths.insert(dir.to_path_buf(), name);
        }

        VisitOutcome::Tracked { newly_modified }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackerContext;
    use filetime::FileTime;
    use std::fs;
    use tempfile::TempDir;

    /// Context scanning a dedicated data directory inside a tempdir.
    fn test_ctx(temp_dir: &TempDir) -> TrackerContext {
        let data_dir = temp_dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();

        let state_path = temp_dir.path().join("state/state.json");
        let config_path = temp_dir.path().join("config");
        let mut ctx = TrackerContext::new_explicit(state_path, config_path).unwrap();
        ctx.config.scan.roots = vec![data_dir];
        ctx
    }

    fn data_dir(ctx: &TrackerContext) -> PathBuf {
        ctx.config.scan.roots[0].clone()
    }

    fn touch_future(path: &Path, offset_secs: i64) {
        let mtime = FileTime::from_unix_time(utils::current_timestamp() + offset_secs, 0);
        filetime::set_file_mtime(path, mtime).unwrap();
    }

    #[test]
    fn test_first_run_baselines_without_reporting() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("proj");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.txt"), "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        assert!(tracker.last_report().is_none());
        let report = tracker.run(true).unwrap().expect("forced run executes");

        assert!(tracker.state().tracked_paths.contains_key(&dir));
        assert!(tracker.state().modified_paths.is_empty());
        assert!(report.newly_modified.is_empty());
        assert_eq!(report.tracked_dirs, 1);
        assert_eq!(
            tracker.last_report().map(|r| r.tracked_dirs),
            Some(1)
        );
    }

    #[test]
    fn test_forced_rerun_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("proj");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.txt"), "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        tracker.run(true).unwrap();
        let tracked = tracker.state().tracked_paths.clone();
        let modified = tracker.state().modified_paths.clone();

        let report = tracker.run(true).unwrap().unwrap();
        assert_eq!(tracker.state().tracked_paths, tracked);
        assert_eq!(tracker.state().modified_paths, modified);
        assert!(report.newly_modified.is_empty());
    }

    #[test]
    fn test_modification_is_reported_once() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("proj");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("a.txt");
        fs::write(&file, "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        tracker.run(true).unwrap();

        // Touch past both the run timestamp and the tracked value
        touch_future(&file, 10);
        let report = tracker.run(true).unwrap().unwrap();

        assert_eq!(report.newly_modified.len(), 1);
        assert_eq!(
            report.newly_modified.get(&dir),
            Some(&"a.txt".to_string())
        );
        assert_eq!(
            tracker.state().modified_paths.get(&dir),
            Some(&"a.txt".to_string())
        );

        // Already-known entries are not re-reported on the next run
        let report = tracker.run(true).unwrap().unwrap();
        assert!(report.newly_modified.is_empty());
        assert_eq!(tracker.state().modified_paths.len(), 1);
    }

    #[test]
    fn test_stale_mtime_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("old");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("ancient.txt");
        fs::write(&file, "x").unwrap();
        // Older than the 7-day staleness window
        let mtime = FileTime::from_unix_time(utils::current_timestamp() - 30 * 24 * 3600, 0);
        filetime::set_file_mtime(&file, mtime).unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        let report = tracker.run(true).unwrap().unwrap();

        assert!(tracker.state().tracked_paths.is_empty());
        assert_eq!(report.input_dirs, 1);
        assert_eq!(report.tracked_dirs, 0);
    }

    #[test]
    fn test_pruning_of_vanished_directories() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("gone");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("only.txt");
        fs::write(&file, "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        tracker.run(true).unwrap();
        assert!(tracker.state().tracked_paths.contains_key(&dir));

        fs::remove_file(&file).unwrap();
        tracker.run(true).unwrap();
        assert!(!tracker.state().tracked_paths.contains_key(&dir));
    }

    #[test]
    fn test_modified_log_survives_pruning() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("proj");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("a.txt");
        fs::write(&file, "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        tracker.run(true).unwrap();
        touch_future(&file, 10);
        tracker.run(true).unwrap();
        assert!(tracker.state().modified_paths.contains_key(&dir));

        // Directory drops out of the input set, but the log keeps history
        fs::remove_file(&file).unwrap();
        tracker.run(true).unwrap();
        assert!(!tracker.state().tracked_paths.contains_key(&dir));
        assert!(tracker.state().modified_paths.contains_key(&dir));
    }

    #[test]
    fn test_throttle_skips_unforced_runs() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("proj");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("a.txt");
        fs::write(&file, "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        tracker.run(true).unwrap();
        let before = tracker.state().clone();

        // A fresh change is invisible to a throttled run
        touch_future(&file, 10);
        assert!(tracker.run(false).unwrap().is_none());
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_unforced_run_executes_after_interval() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = test_ctx(&temp_dir);
        ctx.config.scan.run_interval_secs = 0;
        let dir = data_dir(&ctx).join("proj");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.txt"), "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        assert!(tracker.run(false).unwrap().is_some());
    }

    #[test]
    fn test_excluded_paths_never_tracked() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = test_ctx(&temp_dir);
        let excluded = data_dir(&ctx).join("vendor");
        ctx.config.exclusions.parents = vec![excluded.clone()];
        fs::create_dir_all(&excluded).unwrap();
        let file = excluded.join("fresh.txt");
        fs::write(&file, "x").unwrap();
        touch_future(&file, 10);

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        tracker.run(true).unwrap();
        tracker.run(true).unwrap();

        assert!(tracker.state().tracked_paths.is_empty());
        assert!(tracker.state().modified_paths.is_empty());
    }

    #[test]
    fn test_state_file_inside_root_not_tracked() {
        let temp_dir = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        let state_path = data.path().join("state.json");
        let config_path = temp_dir.path().join("config");
        let mut ctx = TrackerContext::new_explicit(state_path, config_path).unwrap();
        ctx.config.scan.roots = vec![data.path().to_path_buf()];

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        tracker.run(true).unwrap();
        // The save created the state file inside the scanned root; a
        // rerun must not pick it up.
        tracker.run(true).unwrap();
        assert!(tracker.state().tracked_paths.is_empty());
    }

    #[test]
    fn test_empty_root_set_is_a_noop_run() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = test_ctx(&temp_dir);
        ctx.config.scan.roots = vec![temp_dir.path().join("does-not-exist")];

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        let report = tracker.run(true).unwrap().unwrap();
        assert_eq!(report.visited_files, 0);
        assert_eq!(report.input_dirs, 0);
    }

    #[test]
    fn test_visit_outcomes() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        let dir = data_dir(&ctx).join("proj");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("a.txt");
        fs::write(&file, "x").unwrap();

        let mut tracker = ChangeTracker::new(&ctx).unwrap();
        let prev: HashSet<PathBuf> = HashSet::new();

        // Baseline: tracked but not modified
        assert_eq!(
            tracker.visit_file(&file, &dir, &prev),
            VisitOutcome::Tracked {
                newly_modified: false
            }
        );
        // Same mtime again: no new information
        assert_eq!(
            tracker.visit_file(&file, &dir, &prev),
            VisitOutcome::SkippedCurrent
        );

        // Newer mtime with the directory previously known: modified
        touch_future(&file, 10);
        let prev: HashSet<PathBuf> = [dir.clone()].into_iter().collect();
        assert_eq!(
            tracker.visit_file(&file, &dir, &prev),
            VisitOutcome::Tracked {
                newly_modified: true
            }
        );

        // Vanished file: unreadable
        fs::remove_file(&file).unwrap();
        assert_eq!(
            tracker.visit_file(&file, &dir, &prev),
            VisitOutcome::SkippedUnreadable
        );

        // Pre-window mtime: stale
        let old = dir.join("old.txt");
        fs::write(&old, "y").unwrap();
        let mtime = FileTime::from_unix_time(utils::current_timestamp() - 30 * 24 * 3600, 0);
        filetime::set_file_mtime(&old, mtime).unwrap();
        assert_eq!(
            tracker.visit_file(&old, &dir, &prev),
            VisitOutcome::SkippedStale
        );
    }
}
