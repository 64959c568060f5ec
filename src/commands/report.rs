//! The `report` command: the accumulated modified-directories log.

use crate::TrackerContext;
use crate::output;
use crate::tracker::ChangeTracker;
use anyhow::Result;

/// Print every directory ever observed as modified, with the file that
/// triggered the classification. With `paths_only`, print just the joined
/// paths, one per line, for piping.
///
/// # Errors
///
/// Returns an error if the tracker cannot be constructed.
pub fn execute(ctx: &TrackerContext, paths_only: bool) -> Result<()> {
    let tracker = ChangeTracker::new(ctx)?;
    let modified = &tracker.state().modified_paths;

    if modified.is_empty() {
        output::info("No modified directories on record");
        return Ok(());
    }

    for (dir, file) in modified {
        if paths_only {
            println!("{}", dir.join(file).display());
        } else {
            println!("{}: {file}", dir.display());
        }
    }

    Ok(())
}
