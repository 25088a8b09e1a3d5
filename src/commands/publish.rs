//! Publish command implementation.

use crate::cli::PublishArgs;
use crate::config::Config;
use crate::publisher::{
    OsFileSystem, PublishRequest, PublishTarget, Publisher, TargetOutcome,
};
use anyhow::Result;
use humansize::{format_size, BINARY};

/// Run the publish command.
pub fn run(args: PublishArgs, config: &Config) -> Result<()> {
    let request = resolve_request(&args, config)?;

    if request.dry_run {
        println!(
            "[DRY RUN] Would publish {} -> {}",
            request.source_root.display(),
            request.dest_root.display()
        );
    } else {
        println!(
            "Publishing {} -> {}",
            request.source_root.display(),
            request.dest_root.display()
        );
    }

    let publisher = Publisher::new(OsFileSystem);
    let report = publisher.publish(&request)?;

    for outcome in &report.outcomes {
        match outcome {
            TargetOutcome::Copied { target, stats } => {
                println!(
                    "  {} ({} file{}, {})",
                    target,
                    stats.files,
                    if stats.files == 1 { "" } else { "s" },
                    format_size(stats.bytes, BINARY)
                );
            }
            TargetOutcome::Missing { target } => {
                eprintln!(
                    "Warning: '{}' not found under {}, skipped",
                    target,
                    request.source_root.display()
                );
            }
        }
    }

    let total = report.total();
    println!(
        "{} {} file{} ({})",
        if request.dry_run { "Would publish" } else { "Published" },
        total.files,
        if total.files == 1 { "" } else { "s" },
        format_size(total.bytes, BINARY)
    );

    Ok(())
}

/// CLI flags win over the config file, which wins over built-in defaults.
fn resolve_request(args: &PublishArgs, config: &Config) -> Result<PublishRequest> {
    let source_root = args
        .source
        .clone()
        .unwrap_or_else(|| config.publisher.source_dir.clone());
    let dest_root = args
        .dest
        .clone()
        .unwrap_or_else(|| config.publisher.dest_dir.clone());

    let targets = if args.targets.is_empty() {
        config.publish_targets()?
    } else {
        args.targets
            .iter()
            .map(|name| PublishTarget::new(name.clone()))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(PublishRequest {
        source_root,
        dest_root,
        targets,
        dry_run: args.dry_run,
    })
}
