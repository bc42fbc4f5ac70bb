//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `plinth-adapters` crate provides implementations.

use crate::domain::{ConfigurationContext, FrozenTemplate, RenderedFile, ScaffoldPath};
use crate::error::PlinthResult;

/// What currently occupies a path under the scaffold root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    File,
    Directory,
    /// Symlink, socket, device, ...
    Other,
}

/// How `write_atomic` treats a file that appears at the target meanwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `FileExists` rather than replace anything.
    CreateNew,
    /// Atomically replace whatever file is there.
    Replace,
}

/// Port for filesystem operations, rooted at the scaffold root.
///
/// Implemented by:
/// - `plinth_adapters::filesystem::LocalFilesystem` (production)
/// - `plinth_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
///
/// ## Design Notes
///
/// - Every path is a `ScaffoldPath`, so `..` and absolute paths never reach an adapter
/// - `write_atomic` creates parent directories and never leaves a partial file
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Inspect what is at `path`.
    fn entry(&self, path: &ScaffoldPath) -> PlinthResult<EntryKind>;

    /// Persist `contents` at `path` all-or-nothing.
    ///
    /// # Errors
    ///
    /// - `FileExists` in `CreateNew` mode when the file exists
    /// - `PathCollision` when a parent is a file or the target is a directory
    /// - `PathEscapesRoot` when the resolved location leaves the root
    fn write_atomic(&self, path: &ScaffoldPath, contents: &[u8], mode: WriteMode)
    -> PlinthResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `plinth_adapters::renderer::PlaceholderRenderer` (`{{ .Name }}` substitution)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render a frozen template against the run's configuration.
    ///
    /// Must be free of side effects and deterministic.
    fn render(
        &self,
        template: &FrozenTemplate,
        context: &ConfigurationContext,
    ) -> PlinthResult<RenderedFile>;
}
