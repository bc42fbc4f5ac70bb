//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! "scaffold a project" use case.

pub mod scaffold_service;
pub mod writer;

pub use scaffold_service::{
    PlannedFile, ReportEntry, ScaffoldPlan, ScaffoldReport, ScaffoldService, TemplateFailure,
};
pub use writer::{FileWriter, WriteOutcome};
