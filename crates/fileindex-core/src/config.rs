use config::{Config, ConfigError, Environment, File as ConfigFile, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

pub const ENV_PREFIX: &str = "FILEINDEX";

/// Settings shared by the `scan`, `load` and `service` commands.
///
/// Sources, lowest priority first: built-in defaults, an optional
/// `Config.toml` in the working directory, then `FILEINDEX_*` environment
/// variables. Command-line flags are applied on top by the CLI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub volume_name: Option<String>,
    #[serde(default)]
    pub root_path: Option<String>,
    #[serde(default = "default_json_file_name")]
    pub output_file_name: String,
    #[serde(default = "default_json_file_name")]
    pub json_file_name: String,
    #[serde(default = "default_sqlite_file_name")]
    pub sqlite_file_name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_json_file_name() -> String {
    "fileindex.json".to_string()
}

fn default_sqlite_file_name() -> String {
    "fileindex.db".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            volume_name: None,
            root_path: None,
            output_file_name: default_json_file_name(),
            json_file_name: default_json_file_name(),
            sqlite_file_name: default_sqlite_file_name(),
            host: default_host(),
            port: default_port(),
            ignore_patterns: Vec::new(),
        }
    }
}

/// Load `Config.toml` from the working directory if present, then the
/// environment.
pub fn load_configuration() -> std::result::Result<AppConfig, ConfigError> {
    layered(ConfigFile::with_name("Config").required(false))
}

/// Load a file that must exist, then the environment.
pub fn load_configuration_from(path: &Path) -> std::result::Result<AppConfig, ConfigError> {
    layered(ConfigFile::from(path))
}

fn layered(
    file: ConfigFile<FileSourceFile, FileFormat>,
) -> std::result::Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?
        .try_deserialize::<AppConfig>()
}

impl AppConfig {
    pub fn require_volume_name(&self) -> Result<&str> {
        require(self.volume_name.as_deref(), "volume_name")
    }

    pub fn require_root_path(&self) -> Result<&str> {
        require(self.root_path.as_deref(), "root_path")
    }
}

fn require<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Config(ConfigError::NotFound(key.to_string()))),
    }
}
