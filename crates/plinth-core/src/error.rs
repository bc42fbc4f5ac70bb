//! Unified error handling for Plinth Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use std::fmt;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Plinth Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlinthError {
    /// Errors from the domain layer (configuration, templates, rendering).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (writing files).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

/// The failure taxonomy reported per template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A declared mixin slot or required setting has no value.
    Configuration,
    /// The body or path references a name with no binding (or a malformed token).
    UnresolvedPlaceholder,
    /// The writer found an existing file under the `error` policy.
    FileExists,
    /// Empty, absolute, escaping or colliding output path.
    Path,
    /// Two templates in one batch resolved to the same path.
    DuplicatePath,
    /// The template definition itself is broken.
    Template,
    /// I/O failures and bugs.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::UnresolvedPlaceholder => "unresolved-placeholder",
            Self::FileExists => "file-exists",
            Self::Path => "path",
            Self::DuplicatePath => "duplicate-path",
            Self::Template => "template",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlinthError {
    /// Which taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => match e {
                DomainError::Configuration { .. }
                | DomainError::MissingRequiredField { .. }
                | DomainError::InvalidConfiguration { .. } => ErrorKind::Configuration,
                DomainError::UnresolvedPlaceholder { .. }
                | DomainError::MalformedPlaceholder { .. } => ErrorKind::UnresolvedPlaceholder,
                DomainError::InvalidPath { .. } => ErrorKind::Path,
                DomainError::DuplicatePath { .. } => ErrorKind::DuplicatePath,
                DomainError::DuplicateSlot { .. }
                | DomainError::UndeclaredSlot { .. }
                | DomainError::EmptyBody { .. }
                | DomainError::Frozen { .. } => ErrorKind::Template,
            },
            Self::Application(e) => match e {
                ApplicationError::FileExists { .. } => ErrorKind::FileExists,
                ApplicationError::PathCollision { .. }
                | ApplicationError::PathEscapesRoot { .. } => ErrorKind::Path,
                ApplicationError::FilesystemError { .. } | ApplicationError::StoreLockError => {
                    ErrorKind::Internal
                }
            },
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Plinth".into(),
                "Please report this issue with the output of -vv".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Conflict => ErrorCategory::Conflict,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Conflict,
    Internal,
}

/// Convenient result type alias.
pub type PlinthResult<T> = Result<T, PlinthError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> PlinthResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> PlinthResult<T> {
        self.map_err(|e| PlinthError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn kinds_follow_the_taxonomy() {
        let cases: Vec<(PlinthError, ErrorKind)> = vec![
            (
                DomainError::Configuration {
                    template: "t".into(),
                    slot: "Repo".into(),
                }
                .into(),
                ErrorKind::Configuration,
            ),
            (
                DomainError::UnresolvedPlaceholder {
                    template: "t".into(),
                    token: "X".into(),
                }
                .into(),
                ErrorKind::UnresolvedPlaceholder,
            ),
            (
                ApplicationError::FileExists {
                    path: PathBuf::from("a"),
                }
                .into(),
                ErrorKind::FileExists,
            ),
            (
                DomainError::InvalidPath {
                    path: "../a".into(),
                    reason: "escapes".into(),
                }
                .into(),
                ErrorKind::Path,
            ),
            (
                ApplicationError::PathCollision {
                    path: PathBuf::from("a"),
                    reason: "directory".into(),
                }
                .into(),
                ErrorKind::Path,
            ),
            (
                DomainError::DuplicatePath {
                    path: "a".into(),
                    first: "x".into(),
                    second: "y".into(),
                }
                .into(),
                ErrorKind::DuplicatePath,
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn transparent_display_keeps_inner_message() {
        let err: PlinthError = ApplicationError::FileExists {
            path: PathBuf::from("test/e2e/e2e_test.go"),
        }
        .into();
        assert_eq!(err.to_string(), "File already exists: test/e2e/e2e_test.go");
    }

    #[test]
    fn context_wraps_foreign_errors_as_internal() {
        let r: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = r.context("reading boilerplate").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("reading boilerplate: boom"));
    }
}
