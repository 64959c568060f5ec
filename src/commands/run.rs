//! The `run` command: execute one scan pass and print what changed.

use crate::TrackerContext;
use crate::output;
use crate::tracker::ChangeTracker;
use anyhow::Result;
use colored::Colorize;

/// Execute a scan. With `force`, the throttle window is bypassed.
///
/// # Errors
///
/// Returns an error if the tracker cannot be constructed (bad exclusion
/// pattern) or if persisting the updated state fails.
pub fn execute(ctx: &TrackerContext, force: bool) -> Result<()> {
    let mut tracker = ChangeTracker::new(ctx)?;

    let Some(report) = tracker.run(force)? else {
        output::info("Scan skipped: run interval has not elapsed (use --force)");
        return Ok(());
    };

    if report.newly_modified.is_empty() {
        output::info("No newly modified directories");
    } else {
        println!(
            "{}",
            format!(
                "{} newly modified directories:",
                report.newly_modified.len()
            )
            .bold()
        );
        for (dir, file) in &report.newly_modified {
            println!("  {}", dir.join(file).display());
        }
    }

    output::verbose(&format!(
        "Visited {} files across {} directories ({} tracked)",
        report.visited_files, report.input_dirs, report.tracked_dirs
    ));

    Ok(())
}
