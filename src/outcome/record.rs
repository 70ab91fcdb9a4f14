//! A single instance's gold standard, prediction and label list.

use crate::core::constants::NO_THRESHOLD;
use crate::core::error::{EvaluationError, Result};
use crate::core::types::OutcomeValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Outcome of one classified (or regressed) instance.
///
/// `gold`, `prediction` and `labels` are index-aligned: position `i` holds
/// the values for label `labels[i]`. Records are immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    id: String,
    gold: Vec<f64>,
    prediction: Vec<f64>,
    threshold: f64,
    labels: Vec<String>,
}

impl OutcomeRecord {
    /// Create a record, checking that all three vectors have the same length.
    pub fn new(
        id: impl Into<String>,
        gold: Vec<f64>,
        prediction: Vec<f64>,
        threshold: f64,
        labels: Vec<String>,
    ) -> Result<Self> {
        let id = id.into();
        if gold.len() != prediction.len() || gold.len() != labels.len() {
            return Err(EvaluationError::dimension_mismatch(
                format!("{} labels", labels.len()),
                format!(
                    "gold: {}, prediction: {} (instance '{}')",
                    gold.len(),
                    prediction.len(),
                    id
                ),
            ));
        }
        Ok(Self {
            id,
            gold,
            prediction,
            threshold,
            labels,
        })
    }

    /// Create a record without a bipartition threshold.
    pub fn without_threshold(
        id: impl Into<String>,
        gold: Vec<f64>,
        prediction: Vec<f64>,
        labels: Vec<String>,
    ) -> Result<Self> {
        Self::new(id, gold, prediction, NO_THRESHOLD, labels)
    }

    /// Create a record from raw upstream values, coercing each to `f64`.
    pub fn from_values(
        id: impl Into<String>,
        gold: &[OutcomeValue],
        prediction: &[OutcomeValue],
        threshold: f64,
        labels: Vec<String>,
    ) -> Result<Self> {
        let gold = gold.iter().map(OutcomeValue::to_f64).collect::<Result<Vec<_>>>()?;
        let prediction = prediction
            .iter()
            .map(OutcomeValue::to_f64)
            .collect::<Result<Vec<_>>>()?;
        Self::new(id, gold, prediction, threshold, labels)
    }

    /// Instance identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gold-standard values, one per local label.
    pub fn gold(&self) -> &[f64] {
        &self.gold
    }

    /// Predicted values, one per local label.
    pub fn prediction(&self) -> &[f64] {
        &self.prediction
    }

    /// Bipartition threshold, [`NO_THRESHOLD`] if not applicable.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether the record was serialized with a threshold.
    pub fn has_threshold(&self) -> bool {
        self.threshold != NO_THRESHOLD
    }

    /// Label names local to this record.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of local labels.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Position of `label` in the local label list.
    pub fn local_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Gold and predicted label names of a one-hot (single-label) record.
    pub fn single_label_pair(&self) -> Result<(&str, &str)> {
        let gold = one_hot_index(&self.gold).ok_or_else(|| self.wrong_layout("gold standard"))?;
        let predicted =
            one_hot_index(&self.prediction).ok_or_else(|| self.wrong_layout("prediction"))?;
        Ok((&self.labels[gold], &self.labels[predicted]))
    }

    /// Names of the labels whose value meets the record's threshold.
    pub fn labels_at_threshold<'a>(&'a self, values: &'a [f64]) -> impl Iterator<Item = &'a str> + 'a {
        let threshold = self.threshold;
        values
            .iter()
            .zip(self.labels.iter())
            .filter(move |(value, _)| **value >= threshold)
            .map(|(_, label)| label.as_str())
    }

    /// Scalar gold value of a regression record.
    pub fn gold_scalar(&self) -> Option<f64> {
        self.gold.first().copied()
    }

    /// Scalar predicted value of a regression record.
    pub fn prediction_scalar(&self) -> Option<f64> {
        self.prediction.first().copied()
    }

    fn wrong_layout(&self, field: &str) -> EvaluationError {
        EvaluationError::format(format!(
            "{} of instance '{}' is not a one-hot vector; wrong file format and/or learning mode",
            field, self.id
        ))
    }
}

/// Index of the single `1.0` entry, `None` if there is none or more than one.
fn one_hot_index(values: &[f64]) -> Option<usize> {
    let mut found = None;
    for (i, &value) in values.iter().enumerate() {
        if value == 1.0 {
            if found.is_some() {
                return None;
            }
            found = Some(i);
        }
    }
    found
}

fn cmp_values(a: &[f64], b: &[f64]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.total_cmp(y))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}

impl PartialEq for OutcomeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OutcomeRecord {}

impl PartialOrd for OutcomeRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OutcomeRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.labels.cmp(&other.labels))
            .then_with(|| cmp_values(&self.gold, &other.gold))
            .then_with(|| cmp_values(&self.prediction, &other.prediction))
            .then_with(|| self.threshold.total_cmp(&other.threshold))
    }
}

impl Hash for OutcomeRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.labels.hash(state);
        for value in self.gold.iter().chain(self.prediction.iter()) {
            value.to_bits().hash(state);
        }
        self.threshold.to_bits().hash(state);
    }
}
