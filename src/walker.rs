//! Recursive filesystem walking.
//!
//! The walker yields every file under a root, lazily. Directories are never
//! yielded — downstream logic derives them from file parents. Entries that
//! fail mid-walk (removed between listing and visit, permission denied) are
//! skipped; a best-effort scan never aborts on a single entry. Callers must
//! not depend on any particular listing order.

use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Lazily walk all files under `root`. Calling again re-walks from scratch.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> + use<> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
            Ok(_) => None,
            Err(err) => {
                trace!("skipping unreadable entry: {err}");
                None
            }
        })
}
