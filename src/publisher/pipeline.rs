//! The publish pipeline: validate source, clean destination, copy targets.
//!
//! One linear pass per invocation. Cleanup fully completes before any copy
//! begins, and each target is fully copied before the next one starts.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PublishError, Result};

use super::fs::{EntryKind, FileSystem};
use super::target::PublishTarget;

/// Explicit inputs for one publish run.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Build output directory the targets are read from.
    pub source_root: PathBuf,
    /// Directory the targets are published into.
    pub dest_root: PathBuf,
    /// Top-level entries to mirror.
    pub targets: Vec<PublishTarget>,
    /// Walk and count without touching the destination.
    pub dry_run: bool,
}

impl PublishRequest {
    pub fn new(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        targets: Vec<PublishTarget>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            targets,
            dry_run: false,
        }
    }
}

/// Counters accumulated while copying one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

impl CopyStats {
    fn add(&mut self, other: CopyStats) {
        self.files += other.files;
        self.dirs += other.dirs;
        self.bytes += other.bytes;
    }
}

/// What happened to a single target.
#[derive(Debug, Clone)]
pub enum TargetOutcome {
    /// The target existed under the source and was mirrored.
    Copied {
        target: PublishTarget,
        stats: CopyStats,
    },
    /// The target was not present under the source; skipped.
    Missing { target: PublishTarget },
}

/// Result of a whole publish run.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl PublishReport {
    pub fn copied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TargetOutcome::Copied { .. }))
            .count()
    }

    /// Targets that were absent under the source root.
    pub fn missing(&self) -> Vec<&PublishTarget> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                TargetOutcome::Missing { target } => Some(target),
                _ => None,
            })
            .collect()
    }

    /// Aggregate counters across all copied targets.
    pub fn total(&self) -> CopyStats {
        let mut total = CopyStats::default();
        for outcome in &self.outcomes {
            if let TargetOutcome::Copied { stats, .. } = outcome {
                total.add(*stats);
            }
        }
        total
    }
}

/// Mirrors build output into a destination root, replacing previous copies.
pub struct Publisher<F> {
    fs: F,
}

impl<F: FileSystem> Publisher<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Run the full pipeline.
    ///
    /// A missing source root fails before anything is touched. Targets
    /// absent under the source are reported as [`TargetOutcome::Missing`]
    /// and do not abort the run. Any other I/O failure propagates
    /// immediately; there is no retry and no rollback.
    pub fn publish(&self, request: &PublishRequest) -> Result<PublishReport> {
        self.validate_source(request)?;
        self.clean_destination(request)?;

        let mut report = PublishReport::default();
        for target in &request.targets {
            let src = request.source_root.join(target.name());
            let dest = request.dest_root.join(target.name());

            if self.fs.kind(&src).is_none() {
                tracing::warn!(
                    "target '{}' missing under {}, skipping",
                    target,
                    request.source_root.display()
                );
                report.outcomes.push(TargetOutcome::Missing {
                    target: target.clone(),
                });
                continue;
            }

            let mut stats = CopyStats::default();
            self.copy_entry(&src, &dest, request.dry_run, &mut stats)?;
            tracing::debug!(
                "copied '{}' ({} files, {} bytes)",
                target,
                stats.files,
                stats.bytes
            );
            report.outcomes.push(TargetOutcome::Copied {
                target: target.clone(),
                stats,
            });
        }

        Ok(report)
    }

    /// The source root must exist and be a directory before anything runs.
    fn validate_source(&self, request: &PublishRequest) -> Result<()> {
        match self.fs.kind(&request.source_root) {
            Some(EntryKind::Dir) => Ok(()),
            Some(EntryKind::File) => {
                Err(PublishError::NotADirectory(request.source_root.clone()))
            }
            None => Err(PublishError::SourceMissing(request.source_root.clone())),
        }
    }

    /// Remove previously published copies of every target from the
    /// destination. Safe to run when nothing exists there.
    fn clean_destination(&self, request: &PublishRequest) -> Result<()> {
        for target in &request.targets {
            let dest = request.dest_root.join(target.name());
            let Some(kind) = self.fs.kind(&dest) else {
                continue;
            };

            if request.dry_run {
                tracing::info!(path = %dest.display(), "dry-run: would remove");
                continue;
            }

            let removed = match kind {
                EntryKind::Dir => self.fs.remove_dir_all(&dest),
                EntryKind::File => self.fs.remove_file(&dest),
            };
            removed.map_err(|e| PublishError::Io {
                path: dest.clone(),
                source: e,
            })?;
            tracing::debug!(path = %dest.display(), "removed stale entry");
        }
        Ok(())
    }

    /// Depth-first pre-order copy of one entry. Sibling order follows
    /// directory-listing order; each child is independent so no ordering
    /// guarantee is needed.
    fn copy_entry(
        &self,
        src: &Path,
        dest: &Path,
        dry_run: bool,
        stats: &mut CopyStats,
    ) -> Result<()> {
        match self.fs.kind(src) {
            Some(EntryKind::Dir) => {
                if !dry_run {
                    // The destination was cleaned before copying started, so
                    // a non-directory here means something reappeared mid-run.
                    if self.fs.kind(dest) == Some(EntryKind::File) {
                        return Err(PublishError::NotADirectory(dest.to_path_buf()));
                    }
                    self.fs.create_dir_all(dest).map_err(|e| PublishError::Io {
                        path: dest.to_path_buf(),
                        source: e,
                    })?;
                }
                stats.dirs += 1;

                let children = self.fs.read_dir(src).map_err(|e| PublishError::Io {
                    path: src.to_path_buf(),
                    source: e,
                })?;
                for child in children {
                    let Some(name) = child.file_name() else {
                        continue;
                    };
                    self.copy_entry(&child, &dest.join(name), dry_run, stats)?;
                }
                Ok(())
            }
            Some(EntryKind::File) => {
                let copied = if dry_run {
                    self.fs.file_size(src)
                } else {
                    self.fs.copy_file(src, dest)
                };
                let bytes = copied.map_err(|e| PublishError::Io {
                    path: src.to_path_buf(),
                    source: e,
                })?;
                stats.files += 1;
                stats.bytes += bytes;
                Ok(())
            }
            None => Err(PublishError::Io {
                path: src.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "entry disappeared during copy"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::memory::MemoryFileSystem;
    use crate::publisher::target::default_targets;

    fn request() -> PublishRequest {
        PublishRequest::new("/project/dist", "/project", default_targets())
    }

    /// Source tree from the reference scenario: an index page plus a
    /// two-level assets directory.
    fn seed_source(fs: &MemoryFileSystem) {
        fs.add_file("/project/dist/index.html", b"A".to_vec());
        fs.add_file("/project/dist/assets/logo.png", vec![1, 2, 3, 4]);
        fs.add_file("/project/dist/assets/sub/icon.svg", b"<svg/>".to_vec());
    }

    #[test]
    fn publish_mirrors_source_into_destination() {
        let fs = MemoryFileSystem::new();
        seed_source(&fs);
        let req = request();

        let publisher = Publisher::new(&fs);
        let report = publisher.publish(&req).unwrap();

        assert_eq!(report.copied_count(), 2);
        assert!(report.missing().is_empty());
        assert_eq!(fs.file_contents("/project/index.html"), Some(b"A".to_vec()));
        assert_eq!(
            fs.file_contents("/project/assets/logo.png"),
            Some(vec![1, 2, 3, 4])
        );
        assert_eq!(
            fs.file_contents("/project/assets/sub/icon.svg"),
            Some(b"<svg/>".to_vec())
        );
    }

    #[test]
    fn publish_replaces_stale_destination_entries() {
        let fs = MemoryFileSystem::new();
        seed_source(&fs);
        // Leftovers from a previous publish with a different assets tree.
        fs.add_file("/project/index.html", b"B".to_vec());
        fs.add_file("/project/assets/old.png", b"stale".to_vec());
        let req = request();

        Publisher::new(&fs).publish(&req).unwrap();

        assert_eq!(fs.file_contents("/project/index.html"), Some(b"A".to_vec()));
        assert_eq!(fs.kind(Path::new("/project/assets/old.png")), None);
        assert_eq!(
            fs.file_contents("/project/assets/logo.png"),
            Some(vec![1, 2, 3, 4])
        );
    }

    #[test]
    fn publish_twice_is_idempotent() {
        let fs = MemoryFileSystem::new();
        seed_source(&fs);
        let req = request();
        let publisher = Publisher::new(&fs);

        publisher.publish(&req).unwrap();
        let after_first = fs.paths();
        let report = publisher.publish(&req).unwrap();
        let after_second = fs.paths();

        assert_eq!(after_first, after_second);
        assert_eq!(report.copied_count(), 2);
    }

    #[test]
    fn missing_target_is_skipped_not_fatal() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/project/dist/index.html", b"A".to_vec());
        // no assets directory
        let req = request();

        let report = Publisher::new(&fs).publish(&req).unwrap();

        assert_eq!(report.copied_count(), 1);
        let missing: Vec<_> = report.missing().iter().map(|t| t.name()).collect();
        assert_eq!(missing, vec!["assets"]);
        assert_eq!(fs.file_contents("/project/index.html"), Some(b"A".to_vec()));
    }

    #[test]
    fn missing_source_root_is_fatal_and_touches_nothing() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/project");
        fs.add_file("/project/index.html", b"keep".to_vec());
        fs.add_file("/project/assets/old.png", b"keep".to_vec());
        let req = request();

        let err = Publisher::new(&fs).publish(&req).unwrap_err();

        assert!(matches!(err, PublishError::SourceMissing(_)));
        // Destination untouched, including entries cleanup would have removed.
        assert_eq!(fs.file_contents("/project/index.html"), Some(b"keep".to_vec()));
        assert_eq!(
            fs.file_contents("/project/assets/old.png"),
            Some(b"keep".to_vec())
        );
    }

    #[test]
    fn source_root_that_is_a_file_is_fatal() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/project/dist", b"not a dir".to_vec());
        let req = request();

        let err = Publisher::new(&fs).publish(&req).unwrap_err();

        assert!(matches!(err, PublishError::NotADirectory(_)));
    }

    #[test]
    fn cleanup_completes_before_copy_begins() {
        let fs = MemoryFileSystem::new();
        seed_source(&fs);
        fs.add_file("/project/assets/sub/icon.svg", b"old icon".to_vec());

        Publisher::new(&fs).publish(&request()).unwrap();

        // The same nested path exists again but holds the new bytes.
        assert_eq!(
            fs.file_contents("/project/assets/sub/icon.svg"),
            Some(b"<svg/>".to_vec())
        );
    }

    #[test]
    fn dry_run_counts_but_mutates_nothing() {
        let fs = MemoryFileSystem::new();
        seed_source(&fs);
        fs.add_file("/project/index.html", b"B".to_vec());
        fs.add_file("/project/assets/old.png", b"stale".to_vec());
        let mut req = request();
        req.dry_run = true;

        let before = fs.paths();
        let report = Publisher::new(&fs).publish(&req).unwrap();

        assert_eq!(fs.paths(), before);
        let total = report.total();
        assert_eq!(total.files, 3);
        assert_eq!(total.bytes, 1 + 4 + 6);
    }

    #[test]
    fn copy_entry_rejects_file_where_directory_needed() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/assets/logo.png", b"x".to_vec());
        fs.add_file("/dest/assets", b"blocker".to_vec());

        let publisher = Publisher::new(&fs);
        let mut stats = CopyStats::default();
        let err = publisher
            .copy_entry(
                Path::new("/src/assets"),
                Path::new("/dest/assets"),
                false,
                &mut stats,
            )
            .unwrap_err();

        assert!(matches!(err, PublishError::NotADirectory(_)));
    }

    #[test]
    fn file_target_copy_counts_bytes() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/project/dist/index.html", b"hello".to_vec());
        let req = PublishRequest::new(
            "/project/dist",
            "/project",
            vec![PublishTarget::new("index.html").unwrap()],
        );

        let report = Publisher::new(&fs).publish(&req).unwrap();
        let total = report.total();

        assert_eq!(total.files, 1);
        assert_eq!(total.bytes, 5);
        assert_eq!(total.dirs, 0);
    }
}
