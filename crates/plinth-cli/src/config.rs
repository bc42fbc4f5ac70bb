//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `PLINTH_<SECTION>__<KEY>`, e.g.
//!    `PLINTH_SCAFFOLD__CONFLICT_POLICY=skip`
//! 3. `--config FILE`, or else `./.plinth.toml` over the user config file
//! 4. Built-in defaults (always present)
//!
//! The defaults never include a project name, a repository or boilerplate
//! text. Those must be configured or passed explicitly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use plinth_core::domain::ConflictPolicy;

/// File name of the per-directory config.
pub const LOCAL_CONFIG_FILE: &str = ".plinth.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Values injected into template mixins.
    pub project: ProjectConfig,
    /// Scaffold run settings.
    pub scaffold: ScaffoldConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boilerplate: Option<String>,
    /// Read boilerplate from this file when `boilerplate` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boilerplate_file: Option<PathBuf>,
    /// Extra template variables.
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub conflict_policy: ConflictPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            // Nothing is ever overwritten unless asked for.
            conflict_policy: ConflictPolicy::Error,
            root: None,
            templates_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("failed to encode defaults")?;
        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder
                .add_source(File::from(Self::config_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        builder
            .add_source(
                Environment::with_prefix("PLINTH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.plinth.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "plinth", "plinth")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_policy_is_error() {
        assert_eq!(
            AppConfig::default().scaffold.conflict_policy,
            ConflictPolicy::Error
        );
    }

    #[test]
    fn defaults_invent_no_project_values() {
        let cfg = AppConfig::default();
        assert!(cfg.project.name.is_none());
        assert!(cfg.project.repository.is_none());
        assert!(cfg.project.boilerplate.is_none());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plinth.toml");
        fs::write(
            &path,
            r#"
[project]
name = "guestbook"
repository = "example.com/guestbook"

[project.variables]
Owner = "platform"

[scaffold]
conflict_policy = "skip"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.project.name.as_deref(), Some("guestbook"));
        assert_eq!(cfg.scaffold.conflict_policy, ConflictPolicy::Skip);
        assert_eq!(cfg.output, OutputConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/absolutely/does/not/exist.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
