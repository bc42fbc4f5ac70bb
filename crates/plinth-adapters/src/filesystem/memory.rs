//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use plinth_core::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem, WriteMode},
    },
    domain::ScaffoldPath,
    error::PlinthResult,
};

/// In-memory filesystem. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    writes: usize,
}

impl MemoryFilesystemInner {
    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                self.directories.insert(ancestor.to_path_buf());
            }
        }
    }

    /// A regular file sitting where a directory is needed.
    fn blocking_file<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        path.ancestors()
            .skip(1)
            .find(|a| self.files.contains_key(*a))
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (testing helper). Parents are created implicitly.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref().to_path_buf();
            inner.add_parents(&path);
            inner.files.insert(path, contents.as_ref().to_vec());
        }
        self
    }

    /// Seed a directory (testing helper).
    pub fn with_directory(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref().to_path_buf();
            inner.add_parents(&path);
            inner.directories.insert(path);
        }
        self
    }

    /// Read a file's content as UTF-8 (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let bytes = inner.files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of successful `write_atomic` calls so far.
    pub fn write_count(&self) -> usize {
        self.inner.read().map(|inner| inner.writes).unwrap_or(0)
    }
}

impl Filesystem for MemoryFilesystem {
    fn entry(&self, path: &ScaffoldPath) -> PlinthResult<EntryKind> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let path = path.as_path();

        Ok(if inner.files.contains_key(path) {
            EntryKind::File
        } else if inner.directories.contains(path) {
            EntryKind::Directory
        } else if inner.blocking_file(path).is_some() {
            EntryKind::Other
        } else {
            EntryKind::Missing
        })
    }

    fn write_atomic(
        &self,
        path: &ScaffoldPath,
        contents: &[u8],
        mode: WriteMode,
    ) -> PlinthResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let path = path.as_path();

        if let Some(blocker) = inner.blocking_file(path) {
            return Err(ApplicationError::PathCollision {
                path: path.to_path_buf(),
                reason: format!("'{}' is a file", blocker.display()),
            }
            .into());
        }
        if inner.directories.contains(path) {
            return Err(ApplicationError::PathCollision {
                path: path.to_path_buf(),
                reason: "a directory exists at the target path".into(),
            }
            .into());
        }
        if mode == WriteMode::CreateNew && inner.files.contains_key(path) {
            return Err(ApplicationError::FileExists {
                path: path.to_path_buf(),
            }
            .into());
        }

        inner.add_parents(path);
        inner.files.insert(path.to_path_buf(), contents.to_vec());
        inner.writes += 1;
        Ok(())
    }
}
