//! `plinth init`: write a starter configuration file.

use std::path::PathBuf;

use tracing::info;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let path = if args.local {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else {
        AppConfig::config_path()
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            path.display(),
        ))?;
        return Ok(());
    }

    let text = render(&args)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(&path, text)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;

    info!(path = %path.display(), "config written");
    output.success(&format!("Configuration created at {}", path.display()))?;
    Ok(())
}

/// Defaults plus whatever project values were passed on the command line.
fn render(args: &InitArgs) -> CliResult<String> {
    let mut config = AppConfig::default();
    config.project.name = args.project_name.clone();
    config.project.repository = args.repository.clone();

    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prefills_project_values() {
        let args = InitArgs {
            local: true,
            project_name: Some("guestbook".into()),
            repository: None,
            force: false,
        };
        let text = render(&args).unwrap();
        assert!(text.contains("name = \"guestbook\""));
        assert!(text.contains("conflict_policy = \"error\""));
        assert!(!text.contains("repository"));
    }
}
