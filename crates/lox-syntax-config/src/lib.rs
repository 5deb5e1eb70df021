use lox_syntax::ParserOptions;
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

/// Settings for `lox-syntax`, stored as TOML.
///
/// ```toml
/// [parser]
/// max_input_bytes = 1048576
/// max_diagnostics = 64
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parser: ParserSection,
}

/// The `[parser]` table. Missing keys take the parser's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_input_bytes: Option<usize>,
    pub max_diagnostics: usize,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self::from(ParserOptions::default())
    }
}

impl From<ParserOptions> for ParserSection {
    fn from(options: ParserOptions) -> Self {
        Self {
            max_input_bytes: options.max_input_bytes,
            max_diagnostics: options.max_diagnostics,
        }
    }
}

impl From<&ParserSection> for ParserOptions {
    fn from(section: &ParserSection) -> Self {
        ParserOptions {
            max_input_bytes: section.max_input_bytes,
            max_diagnostics: section.max_diagnostics,
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

        let config =
            Self::from_toml_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
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

    pub fn parser(&self) -> &ParserSection {
        &self.parser
    }

    /// Options for [`lox_syntax::Parser::with_options`].
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::from(&self.parser)
    }
}
