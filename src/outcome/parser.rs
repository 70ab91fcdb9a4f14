//! Outcome log parser.
//!
//! The log is line oriented:
//!
//! ```text
//! #ID=PREDICTION;GOLDSTANDARD;THRESHOLD
//! #labels 0=politics 1=sports 2=talk+shows
//! doc_17=2;1;-1
//! doc_18=0.8,0.1,0.6;1,0,1;0.5
//! ```
//!
//! Instance identifiers may contain `=`, so data lines are split at the last
//! one. A data line whose prediction and gold fields are both a single
//! integer is a single-label record (indices into the `#labels` mapping);
//! any other data line carries one comma-separated value per label.

use crate::core::constants::*;
use crate::core::encoding::decode_label;
use crate::core::error::{EvaluationError, Result};
use crate::core::types::{LearningMode, OutcomeValue};
use crate::format_error;
use crate::outcome::collection::OutcomeCollection;
use crate::outcome::record::OutcomeRecord;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Decoded `#labels` header: label names ordered by their declared index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelHeader {
    labels: Vec<String>,
    positions: HashMap<usize, usize>,
}

impl LabelHeader {
    /// Parse a `#labels <idx>=<name> ...` line.
    pub fn parse(line: &str) -> Result<Self> {
        let body = line.strip_prefix(LABELS_HEADER).ok_or_else(|| {
            EvaluationError::format(format!("not a label header: '{}'", line))
        })?;

        let mut entries = Vec::new();
        for entry in body.split_whitespace() {
            let (index, name) = entry.split_once(ID_SEPARATOR).ok_or_else(|| {
                EvaluationError::format(format!("malformed label entry '{}' in header", entry))
            })?;
            let index: usize = index.parse().map_err(|_| {
                EvaluationError::format(format!("label index '{}' is not an integer", index))
            })?;
            entries.push((index, decode_label(name)?));
        }
        entries.sort_by_key(|(index, _)| *index);

        let mut positions = HashMap::with_capacity(entries.len());
        let mut labels = Vec::with_capacity(entries.len());
        for (position, (index, name)) in entries.into_iter().enumerate() {
            if positions.insert(index, position).is_some() {
                return Err(EvaluationError::format(format!(
                    "label index {} declared twice",
                    index
                )));
            }
            labels.push(name);
        }
        Ok(Self { labels, positions })
    }

    /// Label names in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position in [`LabelHeader::labels`] of the label declared as `index`.
    pub fn position(&self, index: usize) -> Option<usize> {
        self.positions.get(&index).copied()
    }

    /// Number of declared labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no labels were declared.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Parser for serialized outcome logs.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeParser {
    learning_mode: LearningMode,
}

impl OutcomeParser {
    /// Create a parser for logs written under `learning_mode`.
    pub fn new(learning_mode: LearningMode) -> Self {
        Self { learning_mode }
    }

    /// Learning mode assigned to parsed collections.
    pub fn learning_mode(&self) -> LearningMode {
        self.learning_mode
    }

    /// Parse a whole log from a buffered reader.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<OutcomeCollection> {
        let mut collection = OutcomeCollection::new(self.learning_mode);
        let mut header: Option<LabelHeader> = None;
        let mut data_lines = 0usize;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);

            if line.starts_with(LABELS_HEADER) {
                if header.is_some() {
                    log::warn!(
                        "Label header redeclared on line {}, later records use the new mapping",
                        line_number + 1
                    );
                }
                header = Some(LabelHeader::parse(line)?);
                continue;
            }
            if line.starts_with(COMMENT_PREFIX) || line.trim().is_empty() {
                continue;
            }

            let labels = header.as_ref().ok_or_else(|| {
                EvaluationError::format(format!(
                    "data on line {} precedes the #labels header",
                    line_number + 1
                ))
            })?;
            let record = self
                .parse_data_line(line, labels)
                .map_err(|e| match e {
                    EvaluationError::Format { message } => EvaluationError::format(format!(
                        "line {}: {}",
                        line_number + 1,
                        message
                    )),
                    other => other,
                })?;
            data_lines += 1;
            if !collection.insert(record) {
                log::warn!("Duplicate outcome on line {} ignored", line_number + 1);
            }
        }

        if collection.is_empty() {
            return Err(EvaluationError::format("outcome log contains no outcomes"));
        }
        log::debug!(
            "Parsed {} {} outcomes from {} data lines",
            collection.len(),
            self.learning_mode,
            data_lines
        );
        Ok(collection)
    }

    /// Parse a log held in memory.
    pub fn parse_str(&self, content: &str) -> Result<OutcomeCollection> {
        self.parse(content.as_bytes())
    }

    /// Parse a log file; files ending in `.gz` are decompressed on the fly.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<OutcomeCollection> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        log::debug!("Reading outcome log {}", path.display());
        self.parse(BufReader::new(reader)).map_err(|e| match e {
            EvaluationError::Format { message } => {
                EvaluationError::format(format!("{} [{}]", message, path.display()))
            }
            other => other,
        })
    }

    /// Parse one `<id>=<prediction>;<gold>;<threshold>` line.
    pub fn parse_data_line(&self, line: &str, header: &LabelHeader) -> Result<OutcomeRecord> {
        let split = line.rfind(ID_SEPARATOR).ok_or_else(|| {
            EvaluationError::format(format!("missing '{}' in data line '{}'", ID_SEPARATOR, line))
        })?;
        let id = &line[..split];
        let evaluation_data = &line[split + ID_SEPARATOR.len_utf8()..];

        let mut fields = evaluation_data.split(FIELD_SEPARATOR);
        let prediction_field = fields.next().unwrap_or_default();
        let gold_field = fields.next().ok_or_else(|| {
            EvaluationError::format(format!("missing gold standard in '{}'", evaluation_data))
        })?;
        let threshold = match fields.next().map(str::trim) {
            Some(field) if !field.is_empty() => field
                .parse::<f64>()
                .ok()
                .filter(|t| t.is_finite())
                .ok_or_else(|| {
                    EvaluationError::format(format!("threshold '{}' is not a finite number", field))
                })?,
            _ => NO_THRESHOLD,
        };

        let prediction_tokens: Vec<&str> = prediction_field.split(VALUE_SEPARATOR).collect();
        let gold_tokens: Vec<&str> = gold_field.split(VALUE_SEPARATOR).collect();

        match self.learning_mode {
            LearningMode::Regression => {
                let gold = parse_value(gold_tokens[0])?;
                let prediction = parse_value(prediction_tokens[0])?;
                OutcomeRecord::new(
                    id,
                    vec![gold],
                    vec![prediction],
                    threshold,
                    vec![REGRESSION_TARGET.to_string()],
                )
            }
            _ => {
                let single = match (prediction_tokens.as_slice(), gold_tokens.as_slice()) {
                    ([p], [g]) => p.trim().parse::<usize>().ok().zip(g.trim().parse::<usize>().ok()),
                    _ => None,
                };
                match single {
                    Some((predicted, gold)) => {
                        single_label_record(id, predicted, gold, threshold, header)
                    }
                    None => multi_label_record(id, &prediction_tokens, &gold_tokens, threshold, header),
                }
            }
        }
    }
}

impl Default for OutcomeParser {
    fn default() -> Self {
        Self::new(LearningMode::default())
    }
}

/// Parse an outcome log read from `reader`.
pub fn parse<R: BufRead>(reader: R, learning_mode: LearningMode) -> Result<OutcomeCollection> {
    OutcomeParser::new(learning_mode).parse(reader)
}

/// Parse an outcome log file.
pub fn parse_file<P: AsRef<Path>>(path: P, learning_mode: LearningMode) -> Result<OutcomeCollection> {
    OutcomeParser::new(learning_mode).parse_file(path)
}

fn parse_value(token: &str) -> Result<f64> {
    OutcomeValue::parse(token).to_f64()
}

fn single_label_record(
    id: &str,
    predicted: usize,
    gold: usize,
    threshold: f64,
    header: &LabelHeader,
) -> Result<OutcomeRecord> {
    let lookup = |index: usize| {
        header
            .position(index)
            .ok_or_else(|| format_error!("label index {} is not declared in the header", index))
    };
    let predicted = lookup(predicted)?;
    let gold = lookup(gold)?;

    let mut gold_vector = vec![0.0; header.len()];
    let mut prediction_vector = vec![0.0; header.len()];
    gold_vector[gold] = 1.0;
    prediction_vector[predicted] = 1.0;
    OutcomeRecord::new(id, gold_vector, prediction_vector, threshold, header.labels().to_vec())
}

fn multi_label_record(
    id: &str,
    prediction_tokens: &[&str],
    gold_tokens: &[&str],
    threshold: f64,
    header: &LabelHeader,
) -> Result<OutcomeRecord> {
    crate::ensure!(
        prediction_tokens.len() == header.len() && gold_tokens.len() == header.len(),
        format_error!(
            "expected {} values per field, got {} predictions and {} gold values",
            header.len(),
            prediction_tokens.len(),
            gold_tokens.len()
        )
    );
    let prediction = prediction_tokens
        .iter()
        .map(|t| parse_value(t))
        .collect::<Result<Vec<_>>>()?;
    let gold = gold_tokens
        .iter()
        .map(|t| parse_value(t))
        .collect::<Result<Vec<_>>>()?;
    OutcomeRecord::new(id, gold, prediction, threshold, header.labels().to_vec())
}
