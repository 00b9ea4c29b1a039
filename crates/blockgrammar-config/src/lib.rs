use blockgrammar_engine::raw::RawMode;
use blockgrammar_engine::{BlockError, BlockRegistry, RawHandlerOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Names of the blocks that take content no other type claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub freeform: Option<String>,
    pub unregistered: Option<String>,
    pub default: Option<String>,
}

/// Defaults for pasted HTML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub mode: RawMode,
    pub allow_unfiltered_html: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub handlers: HandlerConfig,
    pub raw: RawConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/blockgrammar");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Point the registry's handler names at the configured blocks. Each
    /// configured name must already be registered.
    pub fn apply_to(&self, registry: &mut BlockRegistry) -> Result<(), BlockError> {
        let handlers = &self.handlers;
        if let Some(name) = registry_name(registry, handlers.freeform.as_deref())? {
            registry.set_freeform_content_handler_name(&name);
        }
        if let Some(name) = registry_name(registry, handlers.unregistered.as_deref())? {
            registry.set_unregistered_type_handler_name(&name);
        }
        if let Some(name) = registry_name(registry, handlers.default.as_deref())? {
            registry.set_default_block_name(&name);
        }
        Ok(())
    }

    /// Raw handler options for `html` with the configured paste defaults.
    pub fn raw_options<'a>(&self, html: &'a str) -> RawHandlerOptions<'a> {
        RawHandlerOptions {
            html,
            mode: self.raw.mode,
            can_user_use_unfiltered_html: self.raw.allow_unfiltered_html,
        }
    }
}

fn registry_name(registry: &BlockRegistry, name: Option<&str>) -> Result<Option<String>, BlockError> {
    match name {
        None => Ok(None),
        Some(name) if registry.get_block_type(name).is_some() => Ok(Some(name.to_string())),
        Some(name) => Err(BlockError::NotRegistered(name.to_string())),
    }
}
