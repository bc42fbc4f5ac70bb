use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::domain::error::{DomainError, DomainResult};

/// An output path guaranteed to stay **inside** the scaffold root.
///
/// Construction rejects:
/// - empty paths
/// - absolute paths (including Windows prefixes)
/// - any `..` segment
///
/// `.` segments and repeated separators are dropped, so two spellings of the
/// same file compare equal. Duplicate-path detection relies on that.
///
/// `ScaffoldPath` is a *semantic guardrail*, not a filesystem abstraction:
/// it never touches the disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScaffoldPath(PathBuf);

impl ScaffoldPath {
    /// Validate and normalise a path.
    ///
    /// # Errors
    ///
    /// `InvalidPath` naming the offending input and the rule it broke.
    pub fn try_new(path: impl AsRef<str>) -> DomainResult<Self> {
        let raw = path.as_ref();
        let invalid = |reason: &str| DomainError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.trim().is_empty() {
            return Err(invalid("path is empty"));
        }

        let candidate = Path::new(raw);
        if candidate.is_absolute() || raw.starts_with('/') || raw.starts_with('\\') {
            return Err(invalid("absolute paths are not allowed"));
        }

        let mut normalised = PathBuf::new();
        for component in candidate.components() {
            match component {
                Component::Normal(part) => normalised.push(part),
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("path escapes the scaffold root")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("absolute paths are not allowed"));
                }
            }
        }

        if normalised.as_os_str().is_empty() {
            return Err(invalid("path does not name a file"));
        }

        Ok(Self(normalised))
    }

    /// Borrow as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Parent directory inside the root, if the path is nested.
    pub fn parent(&self) -> Option<&Path> {
        self.0.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Consume into a `PathBuf`.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ScaffoldPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl TryFrom<&str> for ScaffoldPath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl fmt::Display for ScaffoldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forward slashes on every platform; reports and tests compare strings.
        let mut first = true;
        for component in self.0.components() {
            if !first {
                f.write_str("/")?;
            }
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for ScaffoldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
