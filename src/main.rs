use anyhow::Result;
use clap::Parser;

use dist_publish::cli::{Cli, Command, PublishArgs};
use dist_publish::commands;
use dist_publish::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    tracing::debug!(?config, "Loaded configuration");

    // A bare invocation publishes with the configured defaults
    let command = cli
        .command
        .unwrap_or_else(|| Command::Publish(PublishArgs::default()));

    // Dispatch to subcommand
    match command {
        Command::Publish(args) => {
            tracing::info!(?args, "Starting publish");
            commands::publish::run(args, &config)?;
        }
        Command::Check(args) => {
            tracing::info!(?args, "Starting check");
            commands::check::run(args, &config)?;
        }
        Command::Completions(args) => {
            commands::completions::run(args)?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "warn"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dist_publish={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
