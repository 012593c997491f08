//! Configuration management
//!
//! This module handles loading and validation of the StudyCoder
//! configuration. Configuration is stored in TOML format at
//! `~/.studycoder/config.toml`.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **llm**: Backend endpoint, model identifier, sampling temperature
//!
//! The API credential is deliberately NOT part of the file; it is read
//! from the `STUDYCODER_API_KEY` environment variable when the provider is
//! constructed. `STUDYCODER_BASE_URL` and `STUDYCODER_MODEL` environment
//! variables override the corresponding file values.
//!
//! # Examples
//!
//! ```no_run
//! use studycoder_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Model: {}", config.llm.model);
//! # Ok(())
//! # }
//! ```

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `llm.base_url`
pub const BASE_URL_ENV: &str = "STUDYCODER_BASE_URL";

/// Environment variable overriding `llm.model`
pub const MODEL_ENV: &str = "STUDYCODER_MODEL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Text generator backend settings
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Text generator backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible completion endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    // Note: credential comes from STUDYCODER_API_KEY, not from the file
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:4000/v1".to_string()
}

fn default_model() -> String {
    "qwen3-32b".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration file location: `~/.studycoder/config.toml`.
    pub fn default_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("cannot determine home directory".to_string()))?;
        Ok(home.join(".studycoder").join("config.toml"))
    }

    /// Load the configuration from the default location, writing a default
    /// file first if none exists. Environment overrides are applied last.
    pub fn load_or_create() -> Result<Self, EngineError> {
        let path = Self::default_path()?;
        if !path.exists() {
            let config = Self::default();
            config.save(&path)?;
            tracing::info!("created default configuration at {}", path.display());
            return Ok(config.with_env_overrides());
        }
        Self::load_from_path(&path)
    }

    /// Load the configuration from an explicit path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| EngineError::Config(format!("failed to parse config: {e}")))?;
        Ok(config.with_env_overrides())
    }

    /// Serialize the configuration to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("failed to render config: {e}")))?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Apply `STUDYCODER_BASE_URL` / `STUDYCODER_MODEL` from the environment.
    fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
        )
    }

    /// Apply explicit overrides; `None` keeps the configured value.
    fn with_overrides(mut self, base_url: Option<String>, model: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.llm.base_url = base_url;
        }
        if let Some(model) = model {
            self.llm.model = model;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.llm.base_url, "http://localhost:4000/v1");
        assert_eq!(config.llm.model, "qwen3-32b");
        assert!((config.llm.temperature - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.llm.model = "llama3.1:8b".to_string();
        config.llm.temperature = 0.7;
        config.save(&path).expect("save");

        let loaded = Config::load_from_path(&path).expect("load");
        assert_eq!(loaded.llm.model, "llama3.1:8b");
        assert!((loaded.llm.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[llm]\nmodel = \"custom-model\"\n").expect("write");

        let loaded = Config::load_from_path(&path).expect("load");
        assert_eq!(loaded.llm.model, "custom-model");
        assert_eq!(loaded.llm.base_url, "http://localhost:4000/v1");
        assert_eq!(loaded.core.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[llm\nnot toml").expect("write");

        let err = Config::load_from_path(&path).expect_err("should fail");
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_overrides_replace_configured_values() {
        let config = Config::default().with_overrides(
            Some("http://llm.internal:8080/v1".to_string()),
            Some("qwen3-coder".to_string()),
        );
        assert_eq!(config.llm.base_url, "http://llm.internal:8080/v1");
        assert_eq!(config.llm.model, "qwen3-coder");

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched.llm.base_url, "http://localhost:4000/v1");
    }
}
