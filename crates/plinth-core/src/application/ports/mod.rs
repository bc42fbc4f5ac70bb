//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `plinth-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: existence checks and atomic writes under the scaffold root
//!   - `TemplateRenderer`: frozen template -> rendered file

pub mod output;

pub use output::{EntryKind, Filesystem, TemplateRenderer, WriteMode};
