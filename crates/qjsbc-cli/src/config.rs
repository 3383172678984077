//! Configuration file parsing for qjsbc.toml.

use qjsbc_runtime::CompileConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file names, in lookup order
const CONFIG_NAMES: &[&str] = &["qjsbc.toml", ".qjsbcrc.toml"];

/// Main configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Defaults for `compile` and `dump --source`
    #[serde(default)]
    pub compile: CompileConfig,

    /// Placeholder module settings
    #[serde(default)]
    pub modules: ModulesConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Placeholder module configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ModulesConfig {
    /// Specifiers pre-registered on every engine, before any `--module`
    #[serde(default)]
    pub preload: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// Default filter directive, e.g. `debug` or `qjsbc_runtime=trace`
    pub level: Option<String>,
}

impl Config {
    /// Preloaded modules followed by `extra`, without duplicates
    pub fn modules_with(&self, extra: &[String]) -> Vec<String> {
        let mut names = self.modules.preload.clone();
        for name in extra {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// Load configuration from a file or search for default config files.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file {} not found", path.display());
            }
            Some(path.to_path_buf())
        }
        None => std::env::current_dir()
            .ok()
            .and_then(|cwd| find_config_file(&cwd)),
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Search for a configuration file in `start` and its parent directories.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        for name in CONFIG_NAMES {
            let path = current.join(name);
            if path.exists() {
                return Some(path);
            }
        }
        dir = current.parent();
    }

    None
}
