//! Configuration management for evaluation runs.
//!
//! Configuration is layered: defaults, then an optional `.json`/`.toml`
//! file, then `TC_EVAL_*` environment variables, then whatever the caller
//! (typically the command line) sets explicitly.

pub mod core;

pub use self::core::{ConfigBuilder, EvaluationConfig, DEFAULT_PRECISION, MAX_PRECISION};

use crate::core::error::Result;
use std::path::Path;

/// Configuration file looked up by the command line tool when none is given
pub const DEFAULT_CONFIG_FILE: &str = "tc-eval.toml";

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default configuration values
    Default,
    /// Configuration from file
    File(String),
    /// `TC_EVAL_*` variables overriding the defaults or a file
    Environment {
        /// File the overrides were applied to, if any
        file: Option<String>,
    },
}

/// Holds a configuration together with its source
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: EvaluationConfig,
    source: ConfigSource,
}

impl ConfigManager {
    /// Create a new configuration manager with default configuration
    pub fn new() -> Self {
        Self {
            config: EvaluationConfig::default(),
            source: ConfigSource::Default,
        }
    }

    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            config: EvaluationConfig::load_from_file(path)?,
            source: ConfigSource::File(path.to_string_lossy().to_string()),
        })
    }


    /// Defaults, overlaid by `path` (if any), overlaid by the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        Self::resolve_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`ConfigManager::resolve`], reading overrides through `lookup`.
    ///
    /// The source becomes [`ConfigSource::Environment`] when at least one
    /// variable was applied.
    pub fn resolve_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut manager = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::new(),
        };
        if manager.config.apply_overrides_from(lookup)? > 0 {
            let file = match manager.source {
                ConfigSource::File(ref file) => Some(file.clone()),
                _ => None,
            };
            manager.source = ConfigSource::Environment { file };
        }
        log::debug!("Configuration resolved: {}", manager.summary());
        Ok(manager)
    }

    /// Get the current configuration
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Get a mutable reference to the current configuration
    pub fn config_mut(&mut self) -> &mut EvaluationConfig {
        &mut self.config
    }

    /// Consume the manager, returning the configuration
    pub fn into_config(self) -> EvaluationConfig {
        self.config
    }

    /// Get the configuration source
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// One-line description of the active configuration
    pub fn summary(&self) -> String {
        let mut params: Vec<(String, String)> = self.config.as_parameter_map().into_iter().collect();
        params.sort();
        let params: Vec<String> = params.into_iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("[{:?}] {}", self.source, params.join(" "))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
