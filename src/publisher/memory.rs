//! In-memory [`FileSystem`] implementation.
//!
//! Backs the pipeline unit tests so they exercise traversal, cleanup and
//! copy semantics without touching real disk. Behavior matches the OS for
//! the operations the trait exposes: creating a directory over an existing
//! file fails, copying into a missing parent fails, removing a missing
//! path fails.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use super::fs::{EntryKind, FileSystem};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// A [`FileSystem`] holding its whole tree in a `BTreeMap`.
///
/// Paths are normalized on the way in, so `./dist/index.html` and
/// `dist/index.html` address the same entry.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory (and its parents), overwriting nothing.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in ancestors_inclusive(&path) {
            nodes.entry(ancestor).or_insert(Node::Dir);
        }
    }

    /// Create a file with the given contents, creating parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = normalize(path.as_ref());
        let mut nodes = self.nodes.lock().unwrap();
        if let Some(parent) = path.parent() {
            for ancestor in ancestors_inclusive(parent) {
                nodes.entry(ancestor).or_insert(Node::Dir);
            }
        }
        nodes.insert(path, Node::File(contents.into()));
    }

    /// Contents of a file, or `None` if absent or a directory.
    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let path = normalize(path.as_ref());
        match self.nodes.lock().unwrap().get(&path) {
            Some(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// All entry paths currently in the tree, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.lock().unwrap().keys().cloned().collect()
    }
}

impl FileSystem for MemoryFileSystem {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        let path = normalize(path);
        match self.nodes.lock().unwrap().get(&path) {
            Some(Node::Dir) => Some(EntryKind::Dir),
            Some(Node::File(_)) => Some(EntryKind::File),
            None => None,
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let path = normalize(path);
        let nodes = self.nodes.lock().unwrap();
        match nodes.get(&path) {
            Some(Node::Dir) => Ok(nodes
                .keys()
                .filter(|key| key.parent() == Some(path.as_path()))
                .cloned()
                .collect()),
            Some(Node::File(_)) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("not a directory: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            )),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in ancestors_inclusive(&path) {
            match nodes.get(&ancestor) {
                Some(Node::File(_)) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("file exists: {}", ancestor.display()),
                    ));
                }
                Some(Node::Dir) => {}
                None => {
                    nodes.insert(ancestor, Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> io::Result<u64> {
        let src = normalize(src);
        let dest = normalize(dest);
        let mut nodes = self.nodes.lock().unwrap();

        let data = match nodes.get(&src) {
            Some(Node::File(data)) => data.clone(),
            Some(Node::Dir) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("is a directory: {}", src.display()),
                ));
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file: {}", src.display()),
                ));
            }
        };

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() && !matches!(nodes.get(parent), Some(Node::Dir)) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such directory: {}", parent.display()),
                ));
            }
        }

        let len = data.len() as u64;
        nodes.insert(dest, Node::File(data));
        Ok(len)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        let path = normalize(path);
        match self.nodes.lock().unwrap().get(&path) {
            Some(Node::File(data)) => Ok(data.len() as u64),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.get(&path) {
            Some(Node::File(_)) => {
                nodes.remove(&path);
                Ok(())
            }
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.get(&path) {
            Some(Node::Dir) => {
                nodes.retain(|key, _| !key.starts_with(&path));
                Ok(())
            }
            Some(Node::File(_)) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("not a directory: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            )),
        }
    }
}

/// Strip `.` components and resolve `..` against the components seen so far.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Every ancestor of `path` (shallowest first), including `path` itself.
fn ancestors_inclusive(path: &Path) -> Vec<PathBuf> {
    let mut chain: Vec<PathBuf> = path
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .collect();
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_creates_parents() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/dist/assets/logo.png", b"png".to_vec());

        assert_eq!(fs.kind(Path::new("/dist")), Some(EntryKind::Dir));
        assert_eq!(fs.kind(Path::new("/dist/assets")), Some(EntryKind::Dir));
        assert_eq!(
            fs.kind(Path::new("/dist/assets/logo.png")),
            Some(EntryKind::File)
        );
    }

    #[test]
    fn normalization_unifies_paths() {
        let fs = MemoryFileSystem::new();
        fs.add_file("./dist/index.html", b"x".to_vec());

        assert_eq!(fs.kind(Path::new("dist/index.html")), Some(EntryKind::File));
        assert_eq!(fs.kind(Path::new("dist/./index.html")), Some(EntryKind::File));
    }

    #[test]
    fn read_dir_lists_only_immediate_children() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/dist/index.html", b"a".to_vec());
        fs.add_file("/dist/assets/logo.png", b"b".to_vec());

        let children = fs.read_dir(Path::new("/dist")).unwrap();
        assert_eq!(children.len(), 2);
        assert!(children.contains(&PathBuf::from("/dist/assets")));
        assert!(children.contains(&PathBuf::from("/dist/index.html")));
    }

    #[test]
    fn read_dir_on_missing_path_fails() {
        let fs = MemoryFileSystem::new();
        let err = fs.read_dir(Path::new("/nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn create_dir_all_over_file_fails() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/root/blocker", b"x".to_vec());

        let err = fs
            .create_dir_all(Path::new("/root/blocker/child"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn copy_file_requires_existing_parent() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/f", b"data".to_vec());

        let err = fs
            .copy_file(Path::new("/src/f"), Path::new("/missing/f"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn copy_file_overwrites_destination() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/f", b"new".to_vec());
        fs.add_file("/dest/f", b"old".to_vec());

        let written = fs.copy_file(Path::new("/src/f"), Path::new("/dest/f")).unwrap();

        assert_eq!(written, 3);
        assert_eq!(fs.file_contents("/dest/f"), Some(b"new".to_vec()));
    }

    #[test]
    fn remove_dir_all_removes_subtree() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/dest/assets/old.png", b"x".to_vec());
        fs.add_file("/dest/assets/sub/icon.svg", b"y".to_vec());
        fs.add_file("/dest/index.html", b"z".to_vec());

        fs.remove_dir_all(Path::new("/dest/assets")).unwrap();

        assert_eq!(fs.kind(Path::new("/dest/assets")), None);
        assert_eq!(fs.kind(Path::new("/dest/assets/sub/icon.svg")), None);
        assert_eq!(fs.kind(Path::new("/dest/index.html")), Some(EntryKind::File));
    }

    #[test]
    fn remove_file_on_dir_fails() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/d");
        assert!(fs.remove_file(Path::new("/d")).is_err());
    }
}
