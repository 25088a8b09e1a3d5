//! Build artifact publishing.
//!
//! This module provides:
//! - A [`FileSystem`] capability trait with OS and in-memory backends
//! - Publish targets and the request/report types
//! - The clean-then-copy pipeline itself

pub mod fs;
pub mod memory;
pub mod pipeline;
pub mod target;

pub use fs::{EntryKind, FileSystem, OsFileSystem};
pub use memory::MemoryFileSystem;
pub use pipeline::{CopyStats, PublishReport, PublishRequest, Publisher, TargetOutcome};
pub use target::{default_targets, PublishTarget, DEFAULT_TARGET_NAMES};
