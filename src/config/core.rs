//! Evaluation configuration and its builder.
//!
//! The configuration controls which measures the evaluator reports beyond
//! the defaults of each learning mode, how many worker threads batch
//! evaluation uses, and how reports are rendered.

use crate::core::constants::*;
use crate::core::error::{EvaluationError, Result};
use crate::core::types::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default number of decimals in text reports
pub const DEFAULT_PRECISION: usize = 4;

/// Largest accepted `precision`
pub const MAX_PRECISION: usize = 17;

/// Main configuration structure for evaluation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Learning mode used when parsing outcome logs
    pub learning_mode: LearningMode,
    /// Also compute supplementary measures (confusion-matrix based P/R/F1
    /// for single-label, Hamming loss and Jaccard accuracy for multi-label)
    pub extended_measures: bool,
    /// Emit per-label precision, recall and F1
    pub per_label_measures: bool,
    /// Worker threads for batch evaluation, 0 means all cores
    pub num_threads: usize,
    /// Report rendering format
    pub output_format: OutputFormat,
    /// Decimals in text reports
    pub precision: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            learning_mode: LearningMode::default(),
            extended_measures: false,
            per_label_measures: false,
            num_threads: 0,
            output_format: OutputFormat::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl EvaluationConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(EvaluationError::invalid_parameter(
                "precision",
                self.precision.to_string(),
                format!("must be at most {}", MAX_PRECISION),
            ));
        }
        Ok(())
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EvaluationError::config(format!("Failed to read config file: {}", e)))?;

        let config: EvaluationConfig = match extension(path) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| EvaluationError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| EvaluationError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(EvaluationError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| EvaluationError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| EvaluationError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(EvaluationError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| EvaluationError::config(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Override fields from an arbitrary key lookup (keys carry the
    /// `TC_EVAL_` prefix). Returns the number of overridden fields.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut applied = 0;

        if let Some(val) = var("LEARNING_MODE") {
            self.learning_mode = val.parse()?;
            applied += 1;
        }
        if let Some(val) = var("NUM_THREADS") {
            self.num_threads = val
                .trim()
                .parse()
                .map_err(|_| EvaluationError::config("Invalid TC_EVAL_NUM_THREADS"))?;
            applied += 1;
        }
        if let Some(val) = var("EXTENDED_MEASURES") {
            self.extended_measures = parse_flag(&val)
                .ok_or_else(|| EvaluationError::config("Invalid TC_EVAL_EXTENDED_MEASURES"))?;
            applied += 1;
        }
        if let Some(val) = var("OUTPUT_FORMAT") {
            self.output_format = val.parse()?;
            applied += 1;
        }

        self.validate()?;
        Ok(applied)
    }

    /// Get the effective number of threads (0 means use all available cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    /// Flatten into string parameters, e.g. for report headers
    pub fn as_parameter_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("learning_mode".to_string(), self.learning_mode.to_string());
        map.insert("extended_measures".to_string(), self.extended_measures.to_string());
        map.insert("per_label_measures".to_string(), self.per_label_measures.to_string());
        map.insert("num_threads".to_string(), self.num_threads.to_string());
        map.insert("output_format".to_string(), self.output_format.to_string());
        map.insert("precision".to_string(), self.precision.to_string());
        map
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder pattern for evaluation configuration
#[derive(Debug)]
pub struct ConfigBuilder {
    config: EvaluationConfig,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: EvaluationConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the learning mode
    pub fn learning_mode(mut self, mode: LearningMode) -> Self {
        self.config.learning_mode = mode;
        self
    }

    /// Enable or disable supplementary measures
    pub fn extended_measures(mut self, enabled: bool) -> Self {
        self.config.extended_measures = enabled;
        self
    }

    /// Enable or disable per-label measures
    pub fn per_label_measures(mut self, enabled: bool) -> Self {
        self.config.per_label_measures = enabled;
        self
    }

    /// Set number of threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Set the report format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set decimals for text reports
    pub fn precision(mut self, precision: usize) -> Self {
        if precision > MAX_PRECISION {
            self.validation_errors
                .push(format!("precision must be at most {}", MAX_PRECISION));
        }
        self.config.precision = precision;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EvaluationConfig> {
        if !self.validation_errors.is_empty() {
            return Err(EvaluationError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
