//! `plinth config`: inspect the effective configuration.

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            println!("{}", value.unwrap_or_default());
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                output.json(&config)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                println!("{serialised}");
            }
        }

        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path().display());
        }
    }

    Ok(())
}

/// `None` means the key is known but unset.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<Option<String>> {
    let path = |p: &Option<std::path::PathBuf>| p.as_ref().map(|p| p.display().to_string());

    let value = match key {
        "project.name" => config.project.name.clone(),
        "project.repository" => config.project.repository.clone(),
        "project.boilerplate" => config.project.boilerplate.clone(),
        "project.boilerplate_file" => path(&config.project.boilerplate_file),
        "scaffold.conflict_policy" => Some(config.scaffold.conflict_policy.to_string()),
        "scaffold.root" => path(&config.scaffold.root),
        "scaffold.templates_dir" => path(&config.scaffold.templates_dir),
        "output.no_color" => Some(config.output.no_color.to_string()),
        "output.format" => Some(config.output.format.clone()),
        other => match other.strip_prefix("project.variables.") {
            Some(var) => config.project.variables.get(var).cloned(),
            None => {
                return Err(CliError::ConfigError {
                    message: format!("Unknown config key: '{key}'"),
                    source: None,
                });
            }
        },
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(
            get_config_value(&cfg, "scaffold.conflict_policy").unwrap().as_deref(),
            Some("error")
        );
    }

    #[test]
    fn unset_key_is_none() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "project.repository").unwrap(), None);
    }

    #[test]
    fn variables_are_addressable() {
        let mut cfg = AppConfig::default();
        cfg.project.variables.insert("Owner".into(), "platform".into());
        assert_eq!(
            get_config_value(&cfg, "project.variables.Owner").unwrap().as_deref(),
            Some("platform")
        );
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
