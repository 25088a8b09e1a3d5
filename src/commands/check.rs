//! Check command implementation.
//!
//! Read-only preflight: report what a publish run would pick up, without
//! touching the destination.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::PublishError;
use crate::publisher::PublishTarget;
use anyhow::Result;
use humansize::{format_size, BINARY};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Preflight report for one source root.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub source: PathBuf,
    pub targets: Vec<TargetStatus>,
}

/// Presence and size of a single target under the source root.
#[derive(Debug, Serialize)]
pub struct TargetStatus {
    pub name: String,
    pub present: bool,
    pub kind: Option<String>,
    pub files: u64,
    pub bytes: u64,
}

/// Run the check command.
pub fn run(args: CheckArgs, config: &Config) -> Result<()> {
    let source = args
        .source
        .clone()
        .unwrap_or_else(|| config.publisher.source_dir.clone());

    let targets = if args.targets.is_empty() {
        config.publish_targets()?
    } else {
        args.targets
            .iter()
            .map(|name| PublishTarget::new(name.clone()))
            .collect::<Result<Vec<_>, _>>()?
    };

    if !source.exists() {
        return Err(PublishError::SourceMissing(source).into());
    }
    if !source.is_dir() {
        return Err(PublishError::NotADirectory(source).into());
    }

    let report = build_report(&source, &targets);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn build_report(source: &Path, targets: &[PublishTarget]) -> CheckReport {
    let statuses = targets
        .iter()
        .map(|target| {
            let path = source.join(target.name());
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {
                    let (files, bytes) = tree_stats(&path);
                    TargetStatus {
                        name: target.name().to_string(),
                        present: true,
                        kind: Some("dir".to_string()),
                        files,
                        bytes,
                    }
                }
                Ok(meta) => TargetStatus {
                    name: target.name().to_string(),
                    present: true,
                    kind: Some("file".to_string()),
                    files: 1,
                    bytes: meta.len(),
                },
                Err(_) => TargetStatus {
                    name: target.name().to_string(),
                    present: false,
                    kind: None,
                    files: 0,
                    bytes: 0,
                },
            }
        })
        .collect();

    CheckReport {
        source: source.to_path_buf(),
        targets: statuses,
    }
}

/// File count and total size of everything under `path`.
fn tree_stats(path: &Path) -> (u64, u64) {
    let mut files = 0u64;
    let mut bytes = 0u64;
    for entry in WalkDir::new(path).into_iter().flatten() {
        if entry.file_type().is_file() {
            files += 1;
            if let Ok(meta) = entry.metadata() {
                bytes += meta.len();
            }
        }
    }
    (files, bytes)
}

fn print_report(report: &CheckReport) {
    println!("Source: {}", report.source.display());
    println!("\n  {:<20} {:<8} {:>8} {:>10}", "TARGET", "KIND", "FILES", "SIZE");
    println!("  {}", "-".repeat(50));

    for status in &report.targets {
        if status.present {
            println!(
                "  {:<20} {:<8} {:>8} {:>10}",
                status.name,
                status.kind.as_deref().unwrap_or("?"),
                status.files,
                format_size(status.bytes, BINARY),
            );
        } else {
            println!("  {:<20} {:<8} {:>8} {:>10}", status.name, "absent", "-", "-");
        }
    }

    let missing: Vec<_> = report
        .targets
        .iter()
        .filter(|s| !s.present)
        .map(|s| s.name.as_str())
        .collect();
    if !missing.is_empty() {
        eprintln!("\nWarning: missing under source: {}", missing.join(", "));
    }
}
