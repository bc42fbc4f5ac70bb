// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Plinth.
//!
//! This module contains pure scaffolding logic with no I/O. Writing files is
//! handled via ports (traits) defined in the application layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or external calls
//! - **Value objects**: `ScaffoldPath`, `RenderedFile`, `FrozenTemplate` have no setters
//!
// Public API - what the world sees
pub mod config;
pub mod error;
pub mod mixin;
pub mod path;
pub mod render;
pub mod rendered;
pub mod template;

// Re-exports for convenience
pub use config::{ConfigurationContext, ConfigurationContextBuilder};
pub use error::{DomainError, DomainResult, ErrorCategory};
pub use mixin::{MixinSet, MixinSlot};
pub use path::ScaffoldPath;
pub use render::Bindings;
pub use rendered::{ConflictPolicy, RenderedFile};
pub use template::{
    FrozenTemplate, StaticTemplate, StaticTemplateBuilder, Template, TemplateBase,
};
