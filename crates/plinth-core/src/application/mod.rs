//! Application layer for Plinth.
//!
//! This layer contains:
//! - **Services**: the scaffold driver and the conflict-policy writer
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! template logic itself. Defaulting and rendering rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    FileWriter, PlannedFile, ReportEntry, ScaffoldPlan, ScaffoldReport, ScaffoldService,
    TemplateFailure, WriteOutcome,
};

// Re-export port traits (for adapter implementation)
pub use ports::{EntryKind, Filesystem, TemplateRenderer, WriteMode};

pub use error::ApplicationError;
