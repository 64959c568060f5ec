use anyhow::Result;
use dirtrack::TrackerContext;
use filetime::FileTime;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture: a temporary tree with a dedicated scan root, plus a
/// context whose state and config live outside that root.
pub struct TestTracker {
    pub temp_dir: TempDir,
    pub ctx: TrackerContext,
}

impl TestTracker {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir_all(&data_dir)?;

        let state_path = temp_dir.path().join(".dirtrack/state.json");
        let config_path = temp_dir.path().join(".config/dirtrack/config");

        let mut ctx = TrackerContext::new_explicit(state_path, config_path)?;
        ctx.config.scan.roots = vec![data_dir];
        Ok(Self { temp_dir, ctx })
    }

    /// The scanned root.
    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    /// Create (or overwrite) a file under the scan root, parents included.
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.data_dir().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Shift a file's mtime to now + `offset_secs`.
    pub fn touch(&self, path: &Path, offset_secs: i64) {
        let now = i64::try_from(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs(),
        )
        .unwrap();
        filetime::set_file_mtime(path, FileTime::from_unix_time(now + offset_secs, 0)).unwrap();
    }
}

impl Default for TestTracker {
    fn default() -> Self {
        Self::new().expect("Failed to create test tracker")
    }
}
