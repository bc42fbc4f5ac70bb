//! Infrastructure adapters for Plinth.
//!
//! This crate implements the ports defined in `plinth-core::application::ports`
//! and ships the built-in templates. All filesystem I/O lives here.

pub mod builtin_templates;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::PlaceholderRenderer;
pub use template_loader::{FilesystemTemplateLoader, LoaderError};
