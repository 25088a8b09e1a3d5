use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// dist-publish - copy build output into the project root
#[derive(Parser, Debug)]
#[command(name = "dist-publish")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Defaults to `publish` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace previously published build output with the current one
    Publish(PublishArgs),

    /// Inspect build output without publishing anything
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct PublishArgs {
    /// Build output directory to publish from
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Directory to publish into
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Entry to mirror (can be specified multiple times)
    #[arg(short, long = "target", value_name = "NAME")]
    pub targets: Vec<String>,

    /// Show what would be copied without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Build output directory to inspect
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Entry to report on (can be specified multiple times)
    #[arg(short, long = "target", value_name = "NAME")]
    pub targets: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
