//! Evaluation reports and their rendering.

use crate::core::error::{EvaluationError, Result};
use crate::core::types::{LearningMode, MetricMap, OutputFormat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Metrics of one evaluated outcome log (or one set of merged folds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// File name, or a description of the merged inputs
    pub source: String,
    /// Learning mode of the evaluated collection
    pub learning_mode: LearningMode,
    /// Number of outcome records
    pub num_outcomes: usize,
    /// Size of the global label universe
    pub num_labels: usize,
    /// Metric name to value
    pub metrics: MetricMap,
    /// Creation time
    pub generated_at: DateTime<Utc>,
}

impl EvaluationReport {
    /// Create a report stamped with the current time.
    pub fn new(
        source: impl Into<String>,
        learning_mode: LearningMode,
        num_outcomes: usize,
        num_labels: usize,
        metrics: MetricMap,
    ) -> Self {
        Self {
            source: source.into(),
            learning_mode,
            num_outcomes,
            num_labels,
            metrics,
            generated_at: Utc::now(),
        }
    }

    /// Value of a named metric.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `metric,value` rows under a header line.
    #[cfg(feature = "csv")]
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["metric", "value"])?;
        for (name, value) in &self.metrics {
            let value = value.to_string();
            writer.write_record([name.as_str(), value.as_str()])?;
        }
        finish_csv(writer)
    }

    /// Human-readable table with `precision` decimals.
    pub fn to_text(&self, precision: usize) -> String {
        let width = self.metrics.keys().map(String::len).max().unwrap_or(0);
        let mut text = format!(
            "Evaluation of {} ({}, {} outcomes, {} labels)\n",
            self.source, self.learning_mode, self.num_outcomes, self.num_labels
        );
        for (name, value) in &self.metrics {
            text.push_str(&format!(
                "  {:<width$}  {:.precision$}\n",
                name,
                value,
                width = width,
                precision = precision
            ));
        }
        text
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat, precision: usize) -> Result<String> {
        match format {
            OutputFormat::Json => self.to_json(),
            OutputFormat::Text => Ok(self.to_text(precision)),
            OutputFormat::Csv => csv_report(self),
        }
    }

    /// Render and write to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W, format: OutputFormat, precision: usize) -> Result<()> {
        writer.write_all(self.render(format, precision)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Render several reports into one document.
///
/// JSON yields an array, CSV one `source,metric,value` table, text the
/// individual reports separated by blank lines.
pub fn render_reports(reports: &[EvaluationReport], format: OutputFormat, precision: usize) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => Ok(reports
            .iter()
            .map(|r| r.to_text(precision))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Csv => csv_reports(reports),
    }
}

#[cfg(feature = "csv")]
fn csv_report(report: &EvaluationReport) -> Result<String> {
    report.to_csv()
}

#[cfg(feature = "csv")]
fn csv_reports(reports: &[EvaluationReport]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["source", "metric", "value"])?;
    for report in reports {
        for (name, value) in &report.metrics {
            let value = value.to_string();
            writer.write_record([report.source.as_str(), name.as_str(), value.as_str()])?;
        }
    }
    finish_csv(writer)
}

#[cfg(feature = "csv")]
fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| EvaluationError::internal(format!("failed to flush CSV output: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| EvaluationError::internal(e.to_string()))
}

#[cfg(not(feature = "csv"))]
fn csv_report(_report: &EvaluationReport) -> Result<String> {
    Err(csv_disabled())
}

#[cfg(not(feature = "csv"))]
fn csv_reports(_reports: &[EvaluationReport]) -> Result<String> {
    Err(csv_disabled())
}

#[cfg(not(feature = "csv"))]
fn csv_disabled() -> EvaluationError {
    EvaluationError::config("CSV output requires the `csv` feature")
}
