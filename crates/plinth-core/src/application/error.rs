//! Application layer errors.
//!
//! These errors represent failures while persisting rendered files, not
//! template logic. Template logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while the driver writes to the scaffold root.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// Target file exists and the conflict policy is `error`.
    #[error("File already exists: {path}")]
    FileExists { path: PathBuf },

    /// Target path (or one of its parents) is occupied by something that
    /// is not a regular file of the expected kind.
    #[error("Path collision at {path}: {reason}")]
    PathCollision { path: PathBuf, reason: String },

    /// Resolved location lies outside the scaffold root (e.g. via a symlink).
    #[error("Path {path} escapes the scaffold root {root}")]
    PathEscapesRoot { path: PathBuf, root: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared in-memory state was poisoned.
    #[error("Filesystem store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FileExists { path } => vec![
                format!("'{}' already exists and was left untouched", path.display()),
                "Use --conflict skip to keep existing files".into(),
                "Use --conflict overwrite to replace them (destructive)".into(),
            ],
            Self::PathCollision { path, .. } => vec![
                format!("Something other than a file occupies '{}'", path.display()),
                "Remove or rename it, or override the template's path".into(),
            ],
            Self::PathEscapesRoot { root, .. } => vec![
                format!("Generated files must stay under {}", root.display()),
                "Check for symlinks inside the scaffold root".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreLockError => vec!["This is a bug, please report it".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileExists { .. } => ErrorCategory::Conflict,
            Self::PathCollision { .. } | Self::PathEscapesRoot { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
