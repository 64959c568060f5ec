use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use dirtrack::cli::{Cli, Commands};
use dirtrack::{TrackerContext, commands, output};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.quiet {
        output::set_verbosity(output::Verbosity::Quiet);
    } else if cli.verbose {
        output::set_verbosity(output::Verbosity::Verbose);
    }

    // Completion needs no context; everything else loads configuration
    if let Commands::Completion { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let ctx = TrackerContext::new()?;

    match cli.command {
        Commands::Run { force } => commands::run::execute(&ctx, force)?,
        Commands::Status => commands::status::execute(&ctx)?,
        Commands::Report { paths_only } => commands::report::execute(&ctx, paths_only)?,
        Commands::Config { key, value, list } => {
            commands::config::execute(&ctx, key.as_deref(), value, list)?;
        }
        Commands::Completion { .. } => unreachable!("handled above"),
    }

    Ok(())
}
