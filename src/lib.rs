#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Simple counters and timestamp math cannot overflow
#![allow(clippy::float_arithmetic)] // Required for fractional mtime comparisons

//! # Dirtrack - Incremental Filesystem Modification Tracker
//!
//! Dirtrack periodically scans a set of root directories, remembers the most
//! recent modification timestamp seen per directory, and reports directories
//! that contain files modified since the last successful scan. State survives
//! process restarts through a JSON document on disk.
//!
//! ## Features
//!
//! - **Incremental detection**: only directories with genuinely newer mtimes
//!   are reported; first-ever sightings are baselined, not reported
//! - **Durable state**: the run state is published atomically, so an
//!   interrupted run never corrupts previous results
//! - **Data-driven exclusions**: extension, directory-name, parent-path and
//!   regex pattern rules, evaluated in a fixed precedence order
//! - **Throttled runs**: unforced runs are no-ops inside the run interval
//!
//! ## Architecture
//!
//! The codebase is organized into several key modules:
//!
//! - [`tracker`]: The change-tracking orchestrator
//! - [`state`]: Persisted run state and its store
//! - [`filter`]: Path eligibility rules
//! - [`roots`]: Platform root enumeration
//! - [`walker`]: Recursive file walking
//! - [`config`]: Configuration parsing and defaults
//! - [`commands`]: CLI command implementations
//! - [`output`]: Output formatting and styling
//!
//! ## Example Usage
//!
//! ```no_run
//! use dirtrack::TrackerContext;
//! use dirtrack::tracker::ChangeTracker;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = TrackerContext::new()?;
//! let mut tracker = ChangeTracker::new(&ctx)?;
//!
//! // Force an immediate scan, bypassing the throttle window
//! if let Some(report) = tracker.run(true)? {
//!     for (dir, file) in &report.newly_modified {
//!         println!("{}: {}", dir.display(), file);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Configuration parsing, defaults, and management.
pub mod config;

/// Path eligibility rules and the ordered exclusion filter.
pub mod filter;

/// Output formatting and styling.
pub mod output;

/// Root enumeration for the platforms the tracker runs on.
pub mod roots;

/// Persisted run state and its backing store.
pub mod state;

/// The change-tracking orchestrator.
pub mod tracker;

/// Utility functions and helpers.
pub mod utils;

/// Recursive filesystem walking.
pub mod walker;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Current version of the dirtrack binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default state directory name within the home directory.
pub const DEFAULT_STATE_DIR: &str = ".dirtrack";

/// Name of the persisted run-state file.
pub const STATE_FILE: &str = "state.json";

/// Default configuration file path relative to home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/dirtrack/config";

/// Central context for all dirtrack operations.
///
/// Holds the configuration and the resolved state-file path needed for
/// executing commands. Exactly one tracker instance per context owns the
/// persisted state; there is no process-global mutable state.
#[derive(Debug, Clone)]
pub struct TrackerContext {
    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Path to the persisted run-state file.
    pub state_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl TrackerContext {
    /// Creates a new `TrackerContext` by loading the configuration from the
    /// default path.
    ///
    /// The environment variables `DIRTRACK_CONFIG_PATH` and
    /// `DIRTRACK_STATE_PATH` override the config-file and state-file
    /// locations respectively.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined or if the
    /// configuration file cannot be read or created.
    pub fn new() -> Result<Self> {
        let config_path = if let Ok(path) = std::env::var("DIRTRACK_CONFIG_PATH") {
            PathBuf::from(path)
        } else {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(DEFAULT_CONFIG_PATH)
        };

        let config = config::Config::load(&config_path)?;

        // Allow environment variable to override the configured state path
        let state_path = if let Ok(path) = std::env::var("DIRTRACK_STATE_PATH") {
            PathBuf::from(path)
        } else {
            config.core.state_path.clone()
        };

        Ok(Self {
            config_path,
            state_path,
            config,
        })
    }

    /// Creates a new `TrackerContext` with explicit paths.
    /// This avoids the need for environment variable manipulation in tests.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be loaded or created.
    pub fn new_explicit(state_path: PathBuf, config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            config::Config::load(&config_path)?
        } else {
            let mut config = config::Config::default();
            config.core.state_path.clone_from(&state_path);

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            config.save(&config_path)?;
            config
        };

        Ok(Self {
            config_path,
            state_path,
            config,
        })
    }
}
