// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the driver records them per template)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("template '{template}' requires mixin slot '{slot}' but no value was configured")]
    Configuration { template: String, slot: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("mixin slot '{slot}' is declared more than once")]
    DuplicateSlot { slot: String },

    #[error("mixin slot '{slot}' is not declared by this template")]
    UndeclaredSlot { slot: String },

    // ========================================================================
    // Rendering Errors
    // ========================================================================
    #[error("template '{template}' references unresolved placeholder '{{{{ .{token} }}}}'")]
    UnresolvedPlaceholder { template: String, token: String },

    #[error("template '{template}' contains malformed placeholder '{token}': {reason}")]
    MalformedPlaceholder {
        template: String,
        token: String,
        reason: String,
    },

    // ========================================================================
    // Path Errors
    // ========================================================================
    #[error("invalid output path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("templates '{first}' and '{second}' both resolve to '{path}'")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    // ========================================================================
    // Template Lifecycle Violations
    // ========================================================================
    #[error("template '{template}' has an empty body after defaulting")]
    EmptyBody { template: String },

    #[error("template '{template}' is frozen; path and body can no longer change")]
    Frozen { template: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Configuration { slot, .. } => vec![
                format!("Provide a value for '{slot}'"),
                "Pass it with --var KEY=VALUE or set it under [project.variables]".into(),
            ],
            Self::MissingRequiredField { field } => vec![
                format!("'{field}' must be supplied explicitly; no default is assumed"),
                "Set it on the command line or in the [project] config section".into(),
            ],
            Self::InvalidConfiguration { field, reason } => {
                vec![format!("Fix the value of '{field}': {reason}")]
            }
            Self::UnresolvedPlaceholder { token, .. } => vec![
                format!("Bind '{token}' with --var {token}=VALUE"),
                "Or declare the matching mixin slot on the template".into(),
            ],
            Self::MalformedPlaceholder { .. } => {
                vec!["Placeholders must have the form {{ .Name }}".into()]
            }
            Self::InvalidPath { .. } => vec![
                "Output paths must be relative to the scaffold root".into(),
                "Paths may not contain '..' segments".into(),
            ],
            Self::DuplicatePath { .. } => vec![
                "Two templates in the batch write the same file".into(),
                "Override one template's path or remove it from the batch".into(),
                "No files were written".into(),
            ],
            _ => vec!["This is a defect in the template definition".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. }
            | Self::MissingRequiredField { .. }
            | Self::InvalidConfiguration { .. } => ErrorCategory::Configuration,
            Self::UnresolvedPlaceholder { .. }
            | Self::MalformedPlaceholder { .. }
            | Self::InvalidPath { .. } => ErrorCategory::Validation,
            Self::DuplicatePath { .. } => ErrorCategory::Conflict,
            Self::DuplicateSlot { .. }
            | Self::UndeclaredSlot { .. }
            | Self::EmptyBody { .. }
            | Self::Frozen { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Conflict,
    Internal,
}

pub type DomainResult<T> = Result<T, DomainError>;
