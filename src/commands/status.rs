//! The `status` command: where the tracker stands between runs.

use crate::TrackerContext;
use crate::tracker::ChangeTracker;
use anyhow::Result;
use chrono::{Local, TimeZone};
use colored::Colorize;
use std::time::Duration;

/// Show the last run time, tracked/modified counts, and when the next
/// unforced run becomes due.
///
/// # Errors
///
/// Returns an error if the tracker cannot be constructed.
pub fn execute(ctx: &TrackerContext) -> Result<()> {
    let tracker = ChangeTracker::new(ctx)?;
    let state = tracker.state();

    let last_run = Local.timestamp_opt(state.ts, 0).single().map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    println!("{} {}", "State file:".bold(), ctx.state_path.display());
    println!("{} {last_run}", "Last run:".bold());
    println!(
        "{} {}",
        "Tracked directories:".bold(),
        state.tracked_paths.len()
    );
    println!(
        "{} {}",
        "Modified log entries:".bold(),
        state.modified_paths.len()
    );

    let now = crate::utils::current_timestamp();
    let interval = i64::try_from(ctx.config.scan.run_interval_secs).unwrap_or(i64::MAX);
    let due_in = state.ts.saturating_add(interval) - now;
    if due_in > 0 {
        println!(
            "{} in {}",
            "Next unforced run:".bold(),
            humantime::format_duration(Duration::from_secs(
                u64::try_from(due_in).unwrap_or_default()
            ))
        );
    } else {
        println!("{} now", "Next unforced run:".bold());
    }

    Ok(())
}
