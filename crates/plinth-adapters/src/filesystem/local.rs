//! Local filesystem adapter using std::fs.
//!
//! Every write goes to a temporary file in the target directory first and is
//! then renamed into place, so a reader never sees a half-written file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use plinth_core::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem, WriteMode},
    },
    domain::ScaffoldPath,
    error::{PlinthError, PlinthResult},
};

/// Production filesystem rooted at the scaffold root.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    /// Create an adapter writing under `root`. The root is created on the
    /// first write if it does not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &ScaffoldPath) -> PathBuf {
        self.root.join(path.as_path())
    }

    /// Fails if `dir`, once symlinks are followed, is not under the root.
    /// Only the deepest existing ancestor is checked.
    fn ensure_within_root(&self, dir: &Path, target: &Path) -> PlinthResult<()> {
        let root =
            fs::canonicalize(&self.root).map_err(|e| map_io_error(&self.root, e, "resolve root"))?;
        let existing = dir
            .ancestors()
            .find(|a| a.exists())
            .unwrap_or(self.root.as_path());
        let real =
            fs::canonicalize(existing).map_err(|e| map_io_error(existing, e, "resolve path"))?;

        if !real.starts_with(&root) {
            return Err(ApplicationError::PathEscapesRoot {
                path: target.to_path_buf(),
                root,
            }
            .into());
        }
        Ok(())
    }
}

impl Filesystem for LocalFilesystem {
    fn entry(&self, path: &ScaffoldPath) -> PlinthResult<EntryKind> {
        let full = self.resolve(path);
        match fs::symlink_metadata(&full) {
            Ok(meta) if meta.is_file() => Ok(EntryKind::File),
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::Other),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
            // A parent component is a regular file.
            Err(e) if e.kind() == io::ErrorKind::NotADirectory => Ok(EntryKind::Other),
            Err(e) => Err(map_io_error(&full, e, "inspect")),
        }
    }

    fn write_atomic(
        &self,
        path: &ScaffoldPath,
        contents: &[u8],
        mode: WriteMode,
    ) -> PlinthResult<()> {
        let full = self.resolve(path);
        let parent = full.parent().unwrap_or(self.root.as_path()).to_path_buf();

        fs::create_dir_all(&self.root).map_err(|e| map_io_error(&self.root, e, "create root"))?;
        self.ensure_within_root(&parent, &full)?;
        fs::create_dir_all(&parent).map_err(|e| ApplicationError::PathCollision {
            path: path.as_path().to_path_buf(),
            reason: format!("cannot create parent directory: {e}"),
        })?;
        self.ensure_within_root(&parent, &full)?;

        let mut tmp = NamedTempFile::new_in(&parent)
            .map_err(|e| map_io_error(&parent, e, "create temporary file"))?;
        tmp.write_all(contents)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| map_io_error(tmp.path(), e, "write temporary file"))?;
        set_permissions(&tmp, &full, mode)?;
        trace!(tmp = %tmp.path().display(), "staged");

        match mode {
            WriteMode::Replace => {
                tmp.persist(&full)
                    .map_err(|e| map_io_error(&full, e.error, "replace file"))?;
            }
            WriteMode::CreateNew => {
                tmp.persist_noclobber(&full).map_err(|e| {
                    if e.error.kind() == io::ErrorKind::AlreadyExists {
                        PlinthError::from(ApplicationError::FileExists { path: full.clone() })
                    } else {
                        map_io_error(&full, e.error, "create file")
                    }
                })?;
            }
        }

        debug!(path = %full.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }
}

/// Temporary files are created `0600`; give the final file the mode of the
/// file it replaces, or `0644` when new.
fn set_permissions(tmp: &NamedTempFile, target: &Path, mode: WriteMode) -> PlinthResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let perms = match (mode, fs::metadata(target)) {
            (WriteMode::Replace, Ok(existing)) => existing.permissions(),
            _ => fs::Permissions::from_mode(0o644),
        };
        tmp.as_file()
            .set_permissions(perms)
            .map_err(|e| map_io_error(tmp.path(), e, "set permissions"))?;
    }
    #[cfg(not(unix))]
    {
        let _ = (tmp, target, mode);
    }
    Ok(())
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PlinthError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_core::error::ErrorKind;
    use tempfile::TempDir;

    fn p(s: &str) -> ScaffoldPath {
        ScaffoldPath::try_new(s).unwrap()
    }

    #[test]
    fn create_new_makes_parents_and_writes() {
        let dir = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new(dir.path());

        fs_.write_atomic(&p("test/e2e/e2e_test.go"), b"package e2e\n", WriteMode::CreateNew)
            .unwrap();

        let written = fs::read_to_string(dir.path().join("test/e2e/e2e_test.go")).unwrap();
        assert_eq!(written, "package e2e\n");
        assert_eq!(fs_.entry(&p("test/e2e/e2e_test.go")).unwrap(), EntryKind::File);
        assert_eq!(fs_.entry(&p("test/e2e")).unwrap(), EntryKind::Directory);
    }

    #[test]
    fn create_new_refuses_to_clobber() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), "module keep").unwrap();
        let fs_ = LocalFilesystem::new(dir.path());

        let err = fs_
            .write_atomic(&p("go.mod"), b"module new", WriteMode::CreateNew)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FileExists);
        assert_eq!(fs::read_to_string(dir.path().join("go.mod")).unwrap(), "module keep");
    }

    #[test]
    fn replace_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), "module old").unwrap();
        let fs_ = LocalFilesystem::new(dir.path());

        fs_.write_atomic(&p("go.mod"), b"module new", WriteMode::Replace)
            .unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("go.mod")).unwrap(), "module new");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("go.mod")]);
    }

    #[test]
    fn missing_root_is_created_on_write() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("fresh");
        let fs_ = LocalFilesystem::new(&root);

        assert_eq!(fs_.entry(&p("README.md")).unwrap(), EntryKind::Missing);
        fs_.write_atomic(&p("README.md"), b"# hi", WriteMode::CreateNew).unwrap();
        assert!(root.join("README.md").is_file());
    }

    #[test]
    fn file_in_parent_position_is_a_collision() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test"), "not a dir").unwrap();
        let fs_ = LocalFilesystem::new(dir.path());

        assert_eq!(fs_.entry(&p("test/e2e/e2e_test.go")).unwrap(), EntryKind::Other);
        let err = fs_
            .write_atomic(&p("test/e2e/e2e_test.go"), b"x", WriteMode::CreateNew)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_rejected() {
        let outside = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("test")).unwrap();
        let fs_ = LocalFilesystem::new(dir.path());

        let err = fs_
            .write_atomic(&p("test/e2e/e2e_test.go"), b"x", WriteMode::CreateNew)
            .unwrap_err();

        assert!(matches!(
            err,
            PlinthError::Application(ApplicationError::PathEscapesRoot { .. })
        ));
        assert!(fs::read_dir(outside.path()).unwrap().next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn new_files_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new(dir.path());
        fs_.write_atomic(&p("Makefile"), b"all:", WriteMode::CreateNew).unwrap();

        let mode = fs::metadata(dir.path().join("Makefile")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
