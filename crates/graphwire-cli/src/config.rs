//! Settings layered from built-in defaults, a TOML file (`--config FILE` or
//! the platform config dir), then `GRAPHWIRE__SECTION__KEY` variables, each
//! layer overriding the one before. Command-line flags are applied on top in
//! `commands::build_compiler`. The core crate never sees this type.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use graphwire_core::application::{DEFAULT_MAX_IMPORT_DEPTH, DEFAULT_PREFIX};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Import resolution settings.
    pub loader: LoaderConfig,
    /// Tag wiring settings.
    pub wiring: WiringConfig,
    /// Extension handlers registered on every compilation.
    pub extensions: ExtensionsConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub search_paths: Vec<PathBuf>,
    pub max_import_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    /// Namespaces handled by the parameters extension.
    pub parameter_namespaces: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }
}

impl Default for WiringConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.into(),
            capabilities: None,
        }
    }
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
    /// Load configuration, layering file and environment over defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("GRAPHWIRE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("loader.search_paths")
                    .with_list_parse_key("extensions.parameter_namespaces")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// `config.toml` in the platform config dir, or `.graphwire.toml` in the
    /// working directory when no home directory is known.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "graphwire", "graphwire")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".graphwire.toml"))
    }
}
