//! Core data types shared across the evaluation engine.

use crate::core::error::{EvaluationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Metric name to value. Ordered so that reports are reproducible.
pub type MetricMap = BTreeMap<String, f64>;

/// Index into the global label universe.
pub type LabelIndex = usize;

/// Learning mode an outcome log was produced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningMode {
    /// Exactly one label per instance
    SingleLabel,
    /// Any subset of labels per instance
    MultiLabel,
    /// One continuous target value per instance
    Regression,
}

impl Default for LearningMode {
    fn default() -> Self {
        LearningMode::SingleLabel
    }
}

impl LearningMode {
    /// Name as written by the experiment harness.
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningMode::SingleLabel => "singleLabel",
            LearningMode::MultiLabel => "multiLabel",
            LearningMode::Regression => "regression",
        }
    }
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningMode {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "singleLabel" | "single_label" | "single-label" => Ok(LearningMode::SingleLabel),
            "multiLabel" | "multi_label" | "multi-label" => Ok(LearningMode::MultiLabel),
            "regression" => Ok(LearningMode::Regression),
            other => Err(EvaluationError::mode(other)),
        }
    }
}

/// A raw prediction or gold-standard value as produced upstream.
///
/// Learners report numbers, booleans or nominal strings; all of them are
/// coerced to `f64` once, at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutcomeValue {
    /// Plain numeric value
    Numeric(f64),
    /// Boolean flag, `true` coerces to `1.0`
    Boolean(bool),
    /// Textual value which must itself be a number
    Nominal(String),
}

impl OutcomeValue {
    /// Classify a serialized token.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Ok(value) = token.parse::<f64>() {
            return OutcomeValue::Numeric(value);
        }
        match token {
            "true" | "TRUE" | "True" => OutcomeValue::Boolean(true),
            "false" | "FALSE" | "False" => OutcomeValue::Boolean(false),
            _ => OutcomeValue::Nominal(token.to_string()),
        }
    }

    /// Coerce to `f64`. `NaN` and infinities are rejected.
    pub fn to_f64(&self) -> Result<f64> {
        let value = match self {
            OutcomeValue::Numeric(value) => *value,
            OutcomeValue::Boolean(true) => 1.0,
            OutcomeValue::Boolean(false) => 0.0,
            OutcomeValue::Nominal(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| EvaluationError::format(format!("not a numeric value: '{}'", text)))?,
        };
        if !value.is_finite() {
            return Err(EvaluationError::format(format!("non-finite value: {}", value)));
        }
        Ok(value)
    }
}

impl From<f64> for OutcomeValue {
    fn from(value: f64) -> Self {
        OutcomeValue::Numeric(value)
    }
}

impl From<bool> for OutcomeValue {
    fn from(value: bool) -> Self {
        OutcomeValue::Boolean(value)
    }
}

/// Report rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty-printed JSON document
    Json,
    /// `metric,value` rows
    Csv,
    /// Aligned plain text
    Text,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(EvaluationError::invalid_parameter(
                "output_format",
                other,
                "expected one of json, csv, text",
            )),
        }
    }
}
