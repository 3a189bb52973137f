//! `graphwire config`: inspect the effective configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::List => {
            let text = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: "effective settings cannot be shown as TOML".into(),
                source: Some(Box::new(e)),
            })?;
            output.header(&format!("# {}", AppConfig::config_path().display()))?;
            output.print(text.trim_end())?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

/// Render one dotted key the way it would be written in an env override.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "loader.search_paths" => Ok(config
            .loader
            .search_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",")),
        "loader.max_import_depth" => Ok(config.loader.max_import_depth.to_string()),
        "wiring.prefix" => Ok(config.wiring.prefix.clone()),
        "wiring.capabilities" => Ok(config
            .wiring
            .capabilities
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        "extensions.parameter_namespaces" => Ok(config.extensions.parameter_namespaces.join(",")),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn get_known_keys() {
        let mut cfg = AppConfig::default();
        cfg.loader.search_paths = vec![PathBuf::from("a"), PathBuf::from("b")];

        assert_eq!(get_config_value(&cfg, "wiring.prefix").unwrap(), "common");
        assert_eq!(get_config_value(&cfg, "loader.max_import_depth").unwrap(), "32");
        assert_eq!(get_config_value(&cfg, "loader.search_paths").unwrap(), "a,b");
        assert_eq!(get_config_value(&cfg, "wiring.capabilities").unwrap(), "");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn default_config_serialises_to_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[wiring]"));
        assert!(text.contains("prefix = \"common\""));
        assert!(!text.contains("capabilities"));
    }
}
