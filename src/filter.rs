//! Path eligibility rules.
//!
//! The filter is a pure predicate: given a candidate file path, decide
//! whether the tracker should look at it at all. Policy is data-driven —
//! an ordered list of [`ExclusionRule`]s built from configuration, checked
//! first-match-wins. The rules touch no shared state and perform no I/O,
//! so a filter can be shared freely across scans.

use crate::config::ExclusionConfig;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A single exclusion predicate.
///
/// Rule kinds are checked in the order they appear in [`PathFilter`]'s rule
/// list; construction fixes that order to the documented precedence:
/// state file, extension, directory name, parent path, parent pattern.
#[derive(Debug, Clone)]
pub enum ExclusionRule {
    /// The tracker's own state file is never tracked.
    StateFile(PathBuf),
    /// Case-insensitive file-extension membership (stored lowercase,
    /// without the leading dot).
    Extension(HashSet<String>),
    /// Any path component exactly equals one of these names.
    DirectoryName(HashSet<String>),
    /// The path lives under one of these parents (component-wise prefix
    /// containment, not substring).
    ParentPath(Vec<PathBuf>),
    /// The parent-directory string matches this pattern.
    ParentPattern(Regex),
}

impl ExclusionRule {
    /// Whether this rule excludes `path`.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::StateFile(state_file) => path == state_file,
            Self::Extension(exts) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| exts.contains(&e.to_ascii_lowercase())),
            Self::DirectoryName(names) => path
                .components()
                .any(|c| names.contains(&c.as_os_str().to_string_lossy().into_owned())),
            Self::ParentPath(parents) => parents.iter().any(|p| path.starts_with(p)),
            Self::ParentPattern(regex) => path
                .parent()
                .is_some_and(|parent| regex.is_match(&parent.to_string_lossy())),
        }
    }

    /// Short identifier for logs and test assertions.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StateFile(_) => "state-file",
            Self::Extension(_) => "extension",
            Self::DirectoryName(_) => "directory-name",
            Self::ParentPath(_) => "parent-path",
            Self::ParentPattern(_) => "parent-pattern",
        }
    }
}

/// Ordered list of exclusion rules applied to every walked file.
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Rules in precedence order; the first match wins.
    rules: Vec<ExclusionRule>,
}

impl PathFilter {
    /// Build a filter from the exclusion configuration plus the state-file
    /// path to self-exclude.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern is not a valid regex.
    pub fn from_config(config: &ExclusionConfig, state_file: &Path) -> Result<Self> {
        let mut rules = vec![ExclusionRule::StateFile(state_file.to_path_buf())];

        let extensions: HashSet<String> = config
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        if !extensions.is_empty() {
            rules.push(ExclusionRule::Extension(extensions));
        }

        let directories: HashSet<String> = config.directories.iter().cloned().collect();
        if !directories.is_empty() {
            rules.push(ExclusionRule::DirectoryName(directories));
        }

        if !config.parents.is_empty() {
            rules.push(ExclusionRule::ParentPath(config.parents.clone()));
        }

        for pattern in &config.patterns {
            let regex = Regex::new(pattern)
                .with_context(|| format!("Invalid exclusion pattern: {pattern}"))?;
            rules.push(ExclusionRule::ParentPattern(regex));
        }

        Ok(Self { rules })
    }

    /// The first rule that excludes `path`, if any.
    #[must_use]
    pub fn exclusion_for(&self, path: &Path) -> Option<&ExclusionRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    /// Whether `path` is eligible for tracking.
    #[must_use]
    pub fn is_eligible(&self, path: &Path) -> bool {
        self.exclusion_for(path).is_none()
    }
}
