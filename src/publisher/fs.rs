//! File-system access used by the publish pipeline.
//!
//! The pipeline never calls `std::fs` directly; it goes through the
//! [`FileSystem`] trait so tests can run against an in-memory tree
//! instead of real disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of an existing file-system entry.
///
/// Symlinks are classified by what they point at, same as `fs::metadata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// File-system operations the publisher needs.
pub trait FileSystem: Send + Sync {
    /// Classify the entry at `path`, or `None` if nothing exists there.
    fn kind(&self, path: &Path) -> Option<EntryKind>;

    /// Immediate children of a directory, in listing order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Byte-for-byte file copy. Returns the number of bytes written.
    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<u64>;

    /// Size in bytes of a regular file.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and everything under it.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        (**self).kind(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).read_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<u64> {
        (**self).copy_file(src, dest)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        (**self).file_size(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).remove_dir_all(path)
    }
}

/// [`FileSystem`] backed by the host OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Some(EntryKind::Dir),
            Ok(_) => Some(EntryKind::File),
            Err(_) => None,
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(path)? {
            children.push(entry?.path());
        }
        Ok(children)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<u64> {
        fs::copy(src, dest)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}
