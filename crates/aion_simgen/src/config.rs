//! Configuration for simulation-model emission.
//!
//! Settings live in the `[sim_model]` table of `aion.toml`. Every field has a
//! default, so a project without the table gets single-file output with one
//! shared preamble.

use serde::Deserialize;
use std::path::Path;

/// Errors that can occur when loading the emission configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),
}

/// Options recognized by the module lowerer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimModelConfig {
    /// Whether the runtime preamble (`#![allow]` + `use` lines) is written.
    ///
    /// When `module_path_prefix` is unset the preamble is written before the
    /// first module only.
    pub emit_shared_preamble: bool,
    /// Module path under which each generated model lives in its own file.
    ///
    /// When set, instantiated sub-modules are imported from
    /// `<prefix>::<module>` instead of being expected in the same file.
    pub module_path_prefix: Option<String>,
}

impl Default for SimModelConfig {
    fn default() -> Self {
        Self {
            emit_shared_preamble: true,
            module_path_prefix: None,
        }
    }
}

impl SimModelConfig {
    /// Configuration for one file per module under `prefix`.
    pub fn with_module_path_prefix(prefix: impl Into<String>) -> Self {
        Self {
            module_path_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    sim_model: SimModelConfig,
}

/// Loads the `[sim_model]` table from `<project_dir>/aion.toml`.
pub fn load_config(project_dir: &Path) -> Result<SimModelConfig, ConfigError> {
    let config_path = project_dir.join("aion.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses the `[sim_model]` table from TOML text. Other tables are ignored.
pub fn load_config_from_str(content: &str) -> Result<SimModelConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    Ok(file.sim_model)
}
