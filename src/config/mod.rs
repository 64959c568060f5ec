//! Configuration for the tracker: scan timing, scan roots, and the
//! exclusion policy. Stored as TOML; a default file is created on first
//! load. All values are fixed at construction time — there is no dynamic
//! reconfiguration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core settings (state-file location).
    #[serde(default)]
    pub core: CoreConfig,

    /// Scan timing and scope.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Path exclusion policy.
    #[serde(default)]
    pub exclusions: ExclusionConfig,
}

/// Core settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Where the persisted run state lives.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

/// Scan timing and scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Minimum spacing between unforced runs, in seconds.
    #[serde(default = "default_run_interval_secs")]
    pub run_interval_secs: u64,

    /// How far back an mtime may lie and still baseline a directory,
    /// in seconds.
    #[serde(default = "default_staleness_window_secs")]
    pub staleness_window_secs: u64,

    /// Explicit scan roots. Empty means "use the platform default"
    /// (mounted drive letters on Windows, the home directory elsewhere).
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

/// Path exclusion policy, one list per rule kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionConfig {
    /// File extensions to skip (case-insensitive, no leading dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Path components to skip wherever they appear (vendor and
    /// cloud-sync internals).
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,

    /// Parent paths whose entire subtree is skipped (prefix containment,
    /// not substring).
    #[serde(default)]
    pub parents: Vec<PathBuf>,

    /// Regex patterns matched against a file's parent-directory string.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            run_interval_secs: default_run_interval_secs(),
            staleness_window_secs: default_staleness_window_secs(),
            roots: Vec::new(),
        }
    }
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            directories: default_directories(),
            parents: Vec::new(),
            patterns: default_patterns(),
        }
    }
}

impl Config {
    /// Load configuration from a file, creating a default one if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot read or parse the configuration file
    /// - Configuration file contains invalid TOML
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// Get a configuration value by dotted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return None;
        }

        match (parts[0], parts[1]) {
            ("core", "state_path") => Some(self.core.state_path.display().to_string()),
            ("scan", "run_interval_secs") => Some(self.scan.run_interval_secs.to_string()),
            ("scan", "staleness_window_secs") => {
                Some(self.scan.staleness_window_secs.to_string())
            }
            _ => None,
        }
    }

    /// Set a configuration value by dotted key.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key format is invalid (must be section.key)
    /// - The key is unknown
    /// - The value is invalid for the key
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return Err(anyhow::anyhow!("Invalid configuration key: {key}"));
        }

        match (parts[0], parts[1]) {
            ("core", "state_path") => self.core.state_path = PathBuf::from(value),
            ("scan", "run_interval_secs") => {
                self.scan.run_interval_secs = value
                    .parse()
                    .with_context(|| format!("Invalid number: {value}"))?;
            }
            ("scan", "staleness_window_secs") => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid number: {value}"))?;
                if secs == 0 {
                    return Err(anyhow::anyhow!("Staleness window must be non-zero"));
                }
                self.scan.staleness_window_secs = secs;
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {key}")),
        }
        Ok(())
    }
}

// Default functions for serde

/// Default state-file location: `~/.dirtrack/state.json`.
fn default_state_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    home.join(crate::DEFAULT_STATE_DIR).join(crate::STATE_FILE)
}

/// 8 hours between unforced runs.
const fn default_run_interval_secs() -> u64 {
    8 * 3600
}

/// 7 days of mtime history considered fresh.
const fn default_staleness_window_secs() -> u64 {
    7 * 24 * 3600
}

/// Lock/log/tmp artifacts carry no operator-relevant signal.
fn default_extensions() -> Vec<String> {
    ["lock", "log", "tmp"].map(String::from).to_vec()
}

/// Vendor and cloud-sync internals that churn constantly.
fn default_directories() -> Vec<String> {
    [
        "ASUS",
        "Google",
        "Intel",
        "Microsoft",
        "NVIDIA",
        "NVIDIA Corporation",
        "$Recycle.Bin",
        "OneDrive",
        "OneDriveTemp",
        "Packages",
    ]
    .map(String::from)
    .to_vec()
}

/// Directories whose name says cache or logs, with a word-ish boundary.
fn default_patterns() -> Vec<String> {
    vec![r"(?i)(cache|logs)([\W_]|$)".to_string()]
}
