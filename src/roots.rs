//! Root enumeration.
//!
//! A [`RootSource`] produces the set of top-level directories a scan starts
//! from. The concrete source is selected once, at tracker construction:
//! explicitly configured roots win, otherwise the platform default is used
//! (mounted drive letters on Windows, the home directory elsewhere).
//! An empty root set is not an error — it yields a no-op scan.

use crate::config::ScanConfig;
use std::path::PathBuf;

/// Capability interface: where does a scan start?
pub trait RootSource {
    /// The roots to scan. Finite; possibly empty.
    fn roots(&self) -> Vec<PathBuf>;
}

/// Probes each drive letter A–Z and yields the mounted ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriveLetterRoots;

impl RootSource for DriveLetterRoots {
    fn roots(&self) -> Vec<PathBuf> {
        (b'A'..=b'Z')
            .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
            .filter(|path| path.exists())
            .collect()
    }
}

/// Yields the user's home directory, or nothing if it cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeDirRoot;

impl RootSource for HomeDirRoot {
    fn roots(&self) -> Vec<PathBuf> {
        dirs::home_dir().into_iter().collect()
    }
}

/// An explicit, configured list of roots. Nonexistent entries are dropped at
/// enumeration time so a stale config entry degrades to a smaller scan.
#[derive(Debug, Clone, Default)]
pub struct FixedRoots {
    /// The configured root paths.
    paths: Vec<PathBuf>,
}

impl FixedRoots {
    /// Create a fixed root set.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl RootSource for FixedRoots {
    fn roots(&self) -> Vec<PathBuf> {
        self.paths
            .iter()
            .filter(|path| path.exists())
            .cloned()
            .collect()
    }
}

/// Select the root source for this host. Called once at construction,
/// never per scan. Configured roots may start with `~/`.
#[must_use]
pub fn detect(config: &ScanConfig) -> Box<dyn RootSource> {
    if config.roots.is_empty() {
        if cfg!(windows) {
            Box::new(DriveLetterRoots)
        } else {
            Box::new(HomeDirRoot)
        }
    } else {
        let expanded = config
            .roots
            .iter()
            .map(|root| {
                crate::utils::expand_tilde(&root.to_string_lossy())
                    .unwrap_or_else(|_| root.clone())
            })
            .collect();
        Box::new(FixedRoots::new(expanded))
    }
}
