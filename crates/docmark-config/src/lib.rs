use docmark_engine::{CodeBlockStyle, CodeStyleError};
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

    #[error("Invalid [code_block] in config file at {config_path}: {source}")]
    InvalidCodeBlock {
        config_path: PathBuf,
        source: CodeStyleError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub code_block: CodeBlockConfig,
}

/// How fenced code is drawn in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeBlockConfig {
    pub font_family: String,
    pub font_size_pt: f64,
    /// Gray level of the paragraph background, 0.0 (black) to 1.0 (white).
    pub background: f64,
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        Self {
            font_family: "Roboto Mono".to_string(),
            font_size_pt: 9.0,
            background: 0.95,
        }
    }
}

impl CodeBlockConfig {
    /// The renderer's code-block treatment with these settings applied.
    pub fn to_style(&self) -> CodeBlockStyle {
        CodeBlockStyle {
            font_family: self.font_family.clone(),
            font_size_pt: self.font_size_pt,
            background: self.background,
            ..CodeBlockStyle::default()
        }
    }
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

        config
            .code_block
            .to_style()
            .validate()
            .map_err(|source| ConfigError::InvalidCodeBlock {
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

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/docmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` and environment variables in a user-supplied path, leaving
    /// it untouched when a variable is undefined.
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => path.to_path_buf(),
        }
    }
}
