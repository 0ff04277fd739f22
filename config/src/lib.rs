//! # Configuration Management for QueryCraft
//!
//! This crate provides centralized configuration structures for the query
//! compiler: the target dialect's reserved keywords, compiler tuning and the
//! diagnostics channel.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{AppConfig, CompilerConfig, DialectConfig, DiagnosticsConfig};
//!
//! let config = AppConfig {
//!     dialect: DialectConfig::new(true, vec!["window".to_string()], None),
//!     compiler: CompilerConfig::new(2, true),
//!     diagnostics: DiagnosticsConfig::new(true, 16),
//! };
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [dialect]
//! use_builtin_keywords = true
//! extra_reserved_keywords = ["window", "filter"]
//! reserved_keywords_file = "keywords/postgres.txt"
//!
//! [compiler]
//! join_pass_factor = 2
//! terminate_statements = true
//!
//! [diagnostics]
//! log_warnings = true
//! max_callbacks = 32
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from QUERYCRAFT_CONFIG, ./querycraft.toml or built-in defaults
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./querycraft.toml";
const CONFIG_ENV_VAR: &str = "QUERYCRAFT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dialect: DialectConfig,
    pub compiler: CompilerConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Reserved keyword sources for the target dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Start from the built-in PostgreSQL reserved keyword list
    pub use_builtin_keywords: bool,
    pub extra_reserved_keywords: Vec<String>,
    /// One keyword per line, `#` starts a comment
    pub reserved_keywords_file: Option<String>,
}

/// Compiler tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Graph join ordering gives up after `join_pass_factor * join count` passes
    pub join_pass_factor: usize,
    /// Append `;` to top-level statements
    pub terminate_statements: bool,
}

/// Diagnostics channel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log every diagnostic through `tracing::warn!`
    pub log_warnings: bool,
    pub max_callbacks: usize,
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env, the default path,
    /// or fall back to built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err.into());
            }
        }

        match env::var(CONFIG_ENV_VAR) {
            Ok(config_path) => Self::from_file(config_path),
            Err(env::VarError::NotPresent) => {
                if Path::new(DEFAULT_CONFIG_PATH).exists() {
                    Self::from_file(DEFAULT_CONFIG_PATH)
                } else {
                    Ok(Self::default())
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compiler.join_pass_factor == 0 {
            return Err(ConfigError::Invalid(
                "Compiler join_pass_factor must be greater than 0".to_string(),
            ));
        }
        if self.diagnostics.max_callbacks == 0 {
            return Err(ConfigError::Invalid(
                "Diagnostics max_callbacks must be greater than 0".to_string(),
            ));
        }
        if let Some(path) = &self.dialect.reserved_keywords_file {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Dialect reserved_keywords_file cannot be empty".to_string(),
                ));
            }
        }
        if self
            .dialect
            .extra_reserved_keywords
            .iter()
            .any(|keyword| keyword.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "Dialect extra_reserved_keywords cannot contain empty entries".to_string(),
            ));
        }

        Ok(())
    }
}

impl DialectConfig {
    /// Create a new dialect configuration
    pub fn new(
        use_builtin_keywords: bool,
        extra_reserved_keywords: Vec<String>,
        reserved_keywords_file: Option<String>,
    ) -> Self {
        Self {
            use_builtin_keywords,
            extra_reserved_keywords,
            reserved_keywords_file,
        }
    }

    /// Keywords from the configured file, empty when no file is configured
    pub fn file_keywords(&self) -> Result<Vec<String>, ConfigError> {
        match &self.reserved_keywords_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(parse_keyword_list(&content))
            }
            None => Ok(Vec::new()),
        }
    }
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::new(true, Vec::new(), None)
    }
}

impl CompilerConfig {
    /// Create a new compiler configuration
    pub fn new(join_pass_factor: usize, terminate_statements: bool) -> Self {
        Self {
            join_pass_factor,
            terminate_statements,
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::new(2, true)
    }
}

impl DiagnosticsConfig {
    /// Create a new diagnostics configuration
    pub fn new(log_warnings: bool, max_callbacks: usize) -> Self {
        Self {
            log_warnings,
            max_callbacks,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self::new(true, 32)
    }
}

/// Split a keyword file into keywords: one per line, blank lines and `#`
/// comments skipped
pub fn parse_keyword_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
