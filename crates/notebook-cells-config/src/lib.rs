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

    #[error("Config file at {config_path} lists no notebook extensions")]
    NoExtensions { config_path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Folder scanned for notebook sources.
    pub notebooks_path: PathBuf,
    /// File extensions treated as notebooks, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Where shadow `.ipynb` files are written; unset keeps them in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_dir: Option<PathBuf>,
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

impl Config {
    pub fn new(notebooks_path: PathBuf) -> Self {
        Self {
            notebooks_path,
            extensions: default_extensions(),
            shadow_dir: None,
        }
    }

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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.extensions = config
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        if config.extensions.is_empty() {
            return Err(ConfigError::NoExtensions {
                config_path: config_path.to_path_buf(),
            });
        }

        config.notebooks_path =
            Self::expand_path(&config.notebooks_path).unwrap_or(config.notebooks_path);
        config.shadow_dir = config
            .shadow_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

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
        let config_dir = shellexpand::tilde("~/.config/notebook-cells");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// A notebooks folder given on the command line wins over the file.
    pub fn with_override(mut self, notebooks_path: Option<PathBuf>) -> Self {
        if let Some(path) = notebooks_path {
            self.notebooks_path = Self::expand_path(&path).unwrap_or(path);
        }
        self
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
