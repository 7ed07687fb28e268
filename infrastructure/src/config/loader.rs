//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "RAGCHAT_";

const PROJECT_FILES: [&str; 2] = ["ragchat.toml", ".ragchat.toml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Values given on the command line.
///
/// Only fields that are `Some` override the lower-priority sources.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    pub ollama: OllamaOverrides,
    pub vector_store: VectorStoreOverrides,
    pub chat: ChatOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OllamaOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VectorStoreOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag: Option<bool>,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Command line overrides
    /// 2. `RAGCHAT_*` environment variables (`__` separates sections)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./ragchat.toml` or `./.ragchat.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/ragchat/config.toml`
    /// 6. Default values
    pub fn load(
        config_path: Option<&PathBuf>,
        overrides: &ConfigOverrides,
    ) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment, overrides)
    }

    /// Load without reading any file (for --no-config).
    ///
    /// Environment variables and command line overrides still apply.
    pub fn load_without_files(overrides: &ConfigOverrides) -> Result<FileConfig, ConfigError> {
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        Self::extract(figment, overrides)
    }

    fn extract(figment: Figment, overrides: &ConfigOverrides) -> Result<FileConfig, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/ragchat/config.toml` if set,
    /// otherwise the platform's config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ragchat").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [  *  ] Command line flags");

        let env_vars: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();
        if env_vars.is_empty() {
            println!("  [     ] Environment: {}*", ENV_PREFIX);
        } else {
            println!("  [FOUND] Environment: {}", env_vars.join(", "));
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:^5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./ragchat.toml or ./.ragchat.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [  *  ] Default: built-in defaults");
    }
}
