//! The set of templates a command can choose from: built-ins first, then
//! user templates from a templates directory.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use plinth_adapters::{FilesystemTemplateLoader, builtin_templates};
use plinth_core::{domain::Template, error::PlinthError};

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Builtin,
    User,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::User => "user",
        }
    }
}

/// Listing row for one template, after defaulting.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub path: String,
    pub slots: Vec<String>,
    pub source: Source,
}

pub struct Catalog {
    entries: Vec<(Source, Box<dyn Template>)>,
}

impl Catalog {
    /// Built-ins plus every template under `templates_dir`.
    ///
    /// A user template may not reuse a built-in name.
    pub fn load(templates_dir: Option<&Path>) -> CliResult<Self> {
        let mut entries: Vec<(Source, Box<dyn Template>)> = builtin_templates::all_templates()
            .map_err(PlinthError::from)?
            .into_iter()
            .map(|t| (Source::Builtin, t))
            .collect();

        if let Some(dir) = templates_dir {
            let user = FilesystemTemplateLoader::new(dir)
                .load_all()
                .map_err(PlinthError::from)?;
            debug!(dir = %dir.display(), count = user.len(), "user templates loaded");

            for template in user {
                if builtin_templates::names().iter().any(|n| *n == template.name()) {
                    return Err(CliError::config(format!(
                        "user template '{}' in {} shadows a built-in template",
                        template.name(),
                        dir.display()
                    )));
                }
                entries.push((Source::User, Box::new(template)));
            }
        }

        Ok(Self { entries })
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, t)| t.name().to_string()).collect()
    }

    /// Keep the named templates, in catalog order. An empty `names` keeps
    /// all of them.
    pub fn select(self, names: &[String]) -> CliResult<Vec<Box<dyn Template>>> {
        if let Some(missing) = names
            .iter()
            .find(|n| !self.entries.iter().any(|(_, t)| t.name() == n.as_str()))
        {
            return Err(CliError::TemplateNotFound {
                name: missing.clone(),
                available: self.names(),
            });
        }

        Ok(self
            .entries
            .into_iter()
            .filter(|(_, t)| names.is_empty() || names.iter().any(|n| n == t.name()))
            .map(|(_, t)| t)
            .collect())
    }

    /// Apply defaults to every template and describe it.
    pub fn describe(self) -> CliResult<Vec<TemplateInfo>> {
        self.entries
            .into_iter()
            .map(|(source, mut template)| {
                template.set_defaults().map_err(PlinthError::from)?;
                let base = template.base();
                Ok(TemplateInfo {
                    name: template.name().to_string(),
                    path: base.path().to_string(),
                    slots: base.mixins().slots().map(ToString::to_string).collect(),
                    source,
                })
            })
            .collect()
    }
}
