//! Filesystem-based template loader.
//!
//! Discovers `template.toml` manifests in the immediate subdirectories of a
//! templates directory and turns each into a [`StaticTemplate`].
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── dockerfile/
//! │   ├── template.toml        ← manifest (required)
//! │   └── body.tmpl            ← body (default name)
//! └── readme/
//!     └── template.toml        ← body given inline
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! name  = "dockerfile"                      # unique within the run
//! path  = "Dockerfile"                      # may contain placeholders
//! slots = ["Boilerplate", "Repo", "Owner"]  # optional
//!
//! # Exactly one of:
//! body      = "FROM golang:1.22\n"           # inline body
//! body_file = "Dockerfile.tmpl"             # relative to the manifest; default "body.tmpl"
//! ```

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use plinth_core::{
    domain::{DomainError, MixinSlot, StaticTemplate, Template},
    error::PlinthError,
};

const MANIFEST: &str = "template.toml";
const DEFAULT_BODY_FILE: &str = "body.tmpl";

// ── Errors ───────────────────────────────────────────────────────────────────

/// Why a templates directory or a single manifest could not be loaded.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("templates directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid template in '{}': {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl From<LoaderError> for PlinthError {
    fn from(e: LoaderError) -> Self {
        PlinthError::Configuration {
            message: e.to_string(),
        }
    }
}

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateManifest {
    pub template: TemplateSection,
}

/// `[template]` section.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateSection {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub slots: Vec<String>,
    pub body: Option<String>,
    pub body_file: Option<PathBuf>,
}

// ── Loader ───────────────────────────────────────────────────────────────────

/// Loads user templates from disk.
///
/// ```rust,no_run
/// use plinth_adapters::template_loader::FilesystemTemplateLoader;
///
/// let loader = FilesystemTemplateLoader::new("./templates");
/// let templates = loader.load_all()?;
/// println!("Loaded {} templates", templates.len());
/// # Ok::<(), plinth_adapters::template_loader::LoaderError>(())
/// ```
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Load every valid template, ordered by directory name.
    ///
    /// # Errors
    ///
    /// - `DirectoryNotFound` if `templates_dir` does not exist
    /// - `Io` if it cannot be listed
    /// - `Invalid` if two manifests declare the same name
    ///
    /// A subdirectory whose manifest is missing or malformed is skipped
    /// with a `WARN` log.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<StaticTemplate>, LoaderError> {
        if !self.templates_dir.is_dir() {
            return Err(LoaderError::DirectoryNotFound {
                path: self.templates_dir.clone(),
            });
        }

        let mut templates: Vec<StaticTemplate> = Vec::new();
        let walker = WalkDir::new(&self.templates_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| LoaderError::Io {
                path: self.templates_dir.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            match load_template_from_dir(dir) {
                Ok(template) => {
                    if templates.iter().any(|t| t.name() == template.name()) {
                        return Err(LoaderError::Invalid {
                            path: dir.to_path_buf(),
                            reason: format!("duplicate template name '{}'", template.name()),
                        });
                    }
                    debug!(name = template.name(), "loaded template");
                    templates.push(template);
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping template directory");
                }
            }
        }

        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }
}

/// Load a single template from one subdirectory.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_template_from_dir(dir: &Path) -> Result<StaticTemplate, LoaderError> {
    let manifest_path = dir.join(MANIFEST);
    let raw = fs::read_to_string(&manifest_path).map_err(|source| LoaderError::Io {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest: TemplateManifest = toml::from_str(&raw).map_err(|source| LoaderError::Parse {
        path: manifest_path.clone(),
        source,
    })?;
    let section = manifest.template;

    let invalid = |reason: String| LoaderError::Invalid {
        path: manifest_path.clone(),
        reason,
    };

    let body = match (section.body, section.body_file) {
        (Some(_), Some(_)) => {
            return Err(invalid("set either 'body' or 'body_file', not both".into()));
        }
        (Some(inline), None) => inline,
        (None, file) => {
            let file = file.unwrap_or_else(|| PathBuf::from(DEFAULT_BODY_FILE));
            if file.is_absolute() || file.components().any(|c| c == Component::ParentDir) {
                return Err(invalid(format!(
                    "body_file '{}' must stay inside the template directory",
                    file.display()
                )));
            }
            let body_path = dir.join(file);
            fs::read_to_string(&body_path).map_err(|source| LoaderError::Io {
                path: body_path,
                source,
            })?
        }
    };

    let mut builder = StaticTemplate::builder()
        .name(section.name)
        .path(section.path)
        .body(body);
    for slot in &section.slots {
        let slot: MixinSlot = slot
            .parse()
            .map_err(|e: DomainError| invalid(e.to_string()))?;
        builder = builder.slot(slot);
    }

    builder.build().map_err(|e| invalid(e.to_string()))
}
