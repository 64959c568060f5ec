//! The `config` command: get, set, and list configuration values.

use crate::TrackerContext;
use crate::output;
use anyhow::Result;

/// Get/set a dotted configuration key, or list the scalar keys.
///
/// # Errors
///
/// Returns an error if the key is unknown, the value is invalid, or the
/// configuration file cannot be written.
pub fn execute(
    ctx: &TrackerContext,
    key: Option<&str>,
    value: Option<String>,
    list: bool,
) -> Result<()> {
    if list {
        for key in ["core.state_path", "scan.run_interval_secs", "scan.staleness_window_secs"] {
            if let Some(value) = ctx.config.get(key) {
                println!("{key}={value}");
            }
        }
        return Ok(());
    }

    let Some(key) = key else {
        output::warning("No configuration key given (try --list)");
        return Ok(());
    };

    match value {
        Some(value) => {
            let mut config = ctx.config.clone();
            config.set(key, value)?;
            config.save(&ctx.config_path)?;
        }
        None => match ctx.config.get(key) {
            Some(value) => println!("{value}"),
            None => return Err(anyhow::anyhow!("Unknown configuration key: {key}")),
        },
    }

    Ok(())
}
