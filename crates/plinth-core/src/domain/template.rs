//! Templates and the defaulting protocol.
//!
//! ## Lifecycle
//!
//! ```text
//! construct (empty path/body, declared slots)
//!   -> optional caller overrides (override_path / override_body)
//!   -> mixins injected from the ConfigurationContext      (driver)
//!   -> set_defaults()                                      (template hook)
//!   -> freeze() -> FrozenTemplate                          (driver)
//!   -> render                                              (renderer port)
//! ```
//!
//! The override-wins rule is enforced by [`TemplateBase`]: its `default_*`
//! setters only fill empty fields, so a hook written with them cannot clobber
//! a caller-supplied value and is idempotent for free.

use std::fmt;

use crate::domain::{
    error::{DomainError, DomainResult},
    mixin::{MixinSet, MixinSlot},
    path::ScaffoldPath,
};

/// The template authoring interface.
///
/// Implementors embed a [`TemplateBase`] and provide the defaulting hook.
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct Readme { base: TemplateBase }
///
/// impl Template for Readme {
///     fn name(&self) -> &str { "readme" }
///     fn base(&self) -> &TemplateBase { &self.base }
///     fn base_mut(&mut self) -> &mut TemplateBase { &mut self.base }
///     fn set_defaults(&mut self) -> DomainResult<()> {
///         self.base.default_path("README.md");
///         self.base.default_body("# {{ .ProjectName }}\n");
///         Ok(())
///     }
/// }
/// ```
pub trait Template: Send + Sync + fmt::Debug {
    /// Stable identity used in logs and failure reports.
    fn name(&self) -> &str;

    fn base(&self) -> &TemplateBase;

    fn base_mut(&mut self) -> &mut TemplateBase;

    /// Fill in the default path and body.
    ///
    /// Must not touch the filesystem or network. Use
    /// [`TemplateBase::default_path`] / [`TemplateBase::default_body`] so
    /// caller overrides survive. A hook that derives its defaults from a slot
    /// reads it through [`MixinSet::require`] and propagates the
    /// `Configuration` error.
    fn set_defaults(&mut self) -> DomainResult<()>;
}

/// Path, body and mixins shared by every template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateBase {
    path: String,
    body: String,
    mixins: MixinSet,
    frozen: bool,
}

impl TemplateBase {
    /// Create an unfrozen base with empty path/body and the given slots.
    ///
    /// # Errors
    ///
    /// `DuplicateSlot` if a slot is listed twice.
    pub fn new(slots: impl IntoIterator<Item = MixinSlot>) -> DomainResult<Self> {
        Ok(Self {
            mixins: MixinSet::from_slots(slots)?,
            ..Self::default()
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn mixins(&self) -> &MixinSet {
        &self.mixins
    }

    pub fn mixins_mut(&mut self) -> &mut MixinSet {
        &mut self.mixins
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Caller-supplied path; wins over any default.
    pub fn override_path(&mut self, template: &str, path: impl Into<String>) -> DomainResult<()> {
        self.ensure_unfrozen(template)?;
        self.path = path.into();
        Ok(())
    }

    /// Caller-supplied body; wins over any default.
    pub fn override_body(&mut self, template: &str, body: impl Into<String>) -> DomainResult<()> {
        self.ensure_unfrozen(template)?;
        self.body = body.into();
        Ok(())
    }

    /// Set the path only if nothing was supplied yet.
    pub fn default_path(&mut self, path: impl Into<String>) {
        if self.path.is_empty() && !self.frozen {
            self.path = path.into();
        }
    }

    /// Set the body only if nothing was supplied yet.
    pub fn default_body(&mut self, body: impl Into<String>) {
        if self.body.is_empty() && !self.frozen {
            self.body = body.into();
        }
    }

    /// End the mutable phase and hand out the value the renderer consumes.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` if the path is empty, absolute or escapes the root
    /// - `EmptyBody` if defaulting left the body empty
    /// - `Frozen` if called twice
    pub fn freeze(&mut self, template: &str) -> DomainResult<FrozenTemplate> {
        self.ensure_unfrozen(template)?;

        let path = ScaffoldPath::try_new(&self.path)?;
        if self.body.is_empty() {
            return Err(DomainError::EmptyBody {
                template: template.to_string(),
            });
        }

        self.frozen = true;
        Ok(FrozenTemplate {
            name: template.to_string(),
            path,
            body: self.body.clone(),
            mixins: self.mixins.clone(),
        })
    }

    fn ensure_unfrozen(&self, template: &str) -> DomainResult<()> {
        if self.frozen {
            return Err(DomainError::Frozen {
                template: template.to_string(),
            });
        }
        Ok(())
    }
}

/// A template after defaulting: path validated, body fixed, mixins resolved.
///
/// There are no setters; rendering reads it and produces a `RenderedFile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenTemplate {
    name: String,
    path: ScaffoldPath,
    body: String,
    mixins: MixinSet,
}

impl FrozenTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated path as written by the template. May still contain
    /// placeholders; the renderer substitutes and re-validates it.
    pub fn path(&self) -> &ScaffoldPath {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn mixins(&self) -> &MixinSet {
        &self.mixins
    }
}

// ============================================================================
// StaticTemplate - a template described by data
// ============================================================================

/// A template whose defaults are plain data supplied at construction.
///
/// Useful for one-off files where a dedicated type would be noise.
#[derive(Debug, Clone)]
pub struct StaticTemplate {
    name: String,
    base: TemplateBase,
    default_path: String,
    default_body: String,
}

impl StaticTemplate {
    pub fn builder() -> StaticTemplateBuilder {
        StaticTemplateBuilder::default()
    }
}

impl Template for StaticTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TemplateBase {
        &mut self.base
    }

    fn set_defaults(&mut self) -> DomainResult<()> {
        self.base.default_path(self.default_path.clone());
        self.base.default_body(self.default_body.clone());
        Ok(())
    }
}

/// Builder for [`StaticTemplate`].
///
/// `name`, `path` and `body` are required; slots are optional.
#[derive(Debug, Default)]
pub struct StaticTemplateBuilder {
    name: Option<String>,
    slots: Vec<MixinSlot>,
    path: Option<String>,
    body: Option<String>,
}

impl StaticTemplateBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare a mixin slot (accumulates).
    pub fn slot(mut self, slot: MixinSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Default output path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Default body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// # Errors
    ///
    /// - `MissingRequiredField` if name/path/body not set
    /// - `DuplicateSlot` if a slot was declared twice
    pub fn build(self) -> DomainResult<StaticTemplate> {
        let name = self
            .name
            .ok_or(DomainError::MissingRequiredField { field: "name" })?;
        let default_path = self
            .path
            .ok_or(DomainError::MissingRequiredField { field: "path" })?;
        let default_body = self
            .body
            .ok_or(DomainError::MissingRequiredField { field: "body" })?;

        Ok(StaticTemplate {
            name,
            base: TemplateBase::new(self.slots)?,
            default_path,
            default_body,
        })
    }
}
