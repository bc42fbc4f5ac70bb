//! Configuration context shared by every template in a scaffold run.
//!
//! The context is built once by the caller (usually the CLI) and then only
//! read. It never invents values: project name, repository path and
//! boilerplate text must all be supplied before [`ConfigurationContextBuilder::build`]
//! succeeds.

use std::collections::BTreeMap;

use crate::domain::{
    error::{DomainError, DomainResult},
    mixin::MixinSlot,
};

/// Immutable, process-wide scaffold configuration.
///
/// | Field | Placeholder bound through the matching mixin |
/// |-------|----------------------------------------------|
/// | `project_name` | `{{ .ProjectName }}` |
/// | `repository` | `{{ .Repo }}` |
/// | `boilerplate` | `{{ .Boilerplate }}` |
///
/// Extra variables are addressable by their own key, e.g. `{{ .Domain }}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationContext {
    project_name: String,
    repository: String,
    boilerplate: String,
    /// `BTreeMap` keeps iteration (and therefore logs and listings) stable.
    variables: BTreeMap<String, String>,
}

impl ConfigurationContext {
    pub fn builder() -> ConfigurationContextBuilder {
        ConfigurationContextBuilder::default()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn boilerplate(&self) -> &str {
        &self.boilerplate
    }

    /// Look up an extra named variable.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The value a mixin slot receives when injected from this context.
    ///
    /// Built-in slots always have a value; `Variable` slots only when the
    /// caller supplied that key.
    pub fn slot_value(&self, slot: &MixinSlot) -> Option<&str> {
        match slot {
            MixinSlot::Boilerplate => Some(&self.boilerplate),
            MixinSlot::Repository => Some(&self.repository),
            MixinSlot::ProjectName => Some(&self.project_name),
            MixinSlot::Variable(name) => self.variable(name),
        }
    }
}

/// Builder for [`ConfigurationContext`].
///
/// Validation happens in `build()`, not in the setters.
#[derive(Debug, Default, Clone)]
pub struct ConfigurationContextBuilder {
    project_name: Option<String>,
    repository: Option<String>,
    boilerplate: Option<String>,
    variables: BTreeMap<String, String>,
}

impl ConfigurationContextBuilder {
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn repository(mut self, repo: impl Into<String>) -> Self {
        self.repository = Some(repo.into());
        self
    }

    /// License/header text. An explicitly empty string is accepted and means
    /// "no header"; leaving it unset is an error.
    pub fn boilerplate(mut self, text: impl Into<String>) -> Self {
        self.boilerplate = Some(text.into());
        self
    }

    /// Add one extra variable. A later call with the same key replaces the value.
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn variables<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Consume the builder.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` if project name, repository or boilerplate is unset
    /// - `InvalidConfiguration` if the project name or repository is blank, or a
    ///   variable key could never be referenced by a placeholder
    pub fn build(self) -> DomainResult<ConfigurationContext> {
        let project_name = self
            .project_name
            .ok_or(DomainError::MissingRequiredField {
                field: "project_name",
            })?;
        let repository = self
            .repository
            .ok_or(DomainError::MissingRequiredField { field: "repository" })?;
        let boilerplate = self
            .boilerplate
            .ok_or(DomainError::MissingRequiredField {
                field: "boilerplate",
            })?;

        for (field, value) in [("project_name", &project_name), ("repository", &repository)] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidConfiguration {
                    field: field.into(),
                    reason: "value cannot be blank".into(),
                });
            }
        }

        if let Some(key) = self.variables.keys().find(|k| !is_identifier(k)) {
            return Err(DomainError::InvalidConfiguration {
                field: format!("variables.{key}"),
                reason: "variable names must be identifiers ([A-Za-z_][A-Za-z0-9_]*)".into(),
            });
        }

        Ok(ConfigurationContext {
            project_name,
            repository,
            boilerplate,
            variables: self.variables,
        })
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the name grammar inside `{{ .Name }}`.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
