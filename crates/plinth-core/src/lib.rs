//! Plinth Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the Plinth
//! scaffold engine: mixin injection, template defaulting, placeholder
//! rendering and the batch driver that writes files under a conflict policy.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            plinth-cli (CLI)             │
//! │     (Builds context, picks policy)      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │      (ScaffoldService, FileWriter)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │        (Filesystem, TemplateRenderer)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     plinth-adapters (Infrastructure)    │
//! │ (LocalFilesystem, PlaceholderRenderer)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (MixinSet, Template, ConfigurationCtx)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plinth_core::prelude::*;
//!
//! let context = ConfigurationContext::builder()
//!     .project_name("memcached-operator")
//!     .repository("github.com/example/memcached-operator")
//!     .boilerplate("// Copyright 2024 Example Authors.")
//!     .build()?;
//!
//! let service = ScaffoldService::new(renderer, filesystem, ConflictPolicy::Skip);
//! let report = service.scaffold(&context, templates)?;
//! assert!(report.is_success());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ScaffoldPlan, ScaffoldReport, ScaffoldService, TemplateFailure, WriteOutcome,
        ports::{EntryKind, Filesystem, TemplateRenderer, WriteMode},
    };
    pub use crate::domain::{
        Bindings, ConfigurationContext, ConflictPolicy, FrozenTemplate, MixinSet, MixinSlot,
        RenderedFile, ScaffoldPath, StaticTemplate, Template, TemplateBase,
    };
    pub use crate::error::{ErrorKind, PlinthError, PlinthResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
