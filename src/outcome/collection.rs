//! Set of outcome records sharing one learning mode.

use crate::core::error::{EvaluationError, Result};
use crate::core::types::LearningMode;
use crate::outcome::record::OutcomeRecord;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// All outcomes of one evaluation run (one file, or several merged folds).
///
/// A collection created with [`OutcomeCollection::empty`] has no learning
/// mode until the first merge adopts one. Records are kept with set
/// semantics and iterate in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCollection {
    outcomes: BTreeSet<OutcomeRecord>,
    learning_mode: Option<LearningMode>,
}

impl OutcomeCollection {
    /// Create an empty collection with a fixed learning mode.
    pub fn new(learning_mode: LearningMode) -> Self {
        Self {
            outcomes: BTreeSet::new(),
            learning_mode: Some(learning_mode),
        }
    }

    /// Create an empty collection whose mode is set by the first merge.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a collection from records.
    pub fn from_records<I>(learning_mode: LearningMode, records: I) -> Self
    where
        I: IntoIterator<Item = OutcomeRecord>,
    {
        Self {
            outcomes: records.into_iter().collect(),
            learning_mode: Some(learning_mode),
        }
    }

    /// Declared learning mode, `None` for a collection that was never filled.
    pub fn learning_mode(&self) -> Option<LearningMode> {
        self.learning_mode
    }

    /// Insert a record. Returns `false` if an identical record was present.
    pub fn insert(&mut self, record: OutcomeRecord) -> bool {
        self.outcomes.insert(record)
    }

    /// Iterate over the records.
    pub fn outcomes(&self) -> impl Iterator<Item = &OutcomeRecord> + '_ {
        self.outcomes.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Add all outcomes of `other`, adopting its mode if this collection has none.
    pub fn add(&mut self, other: &OutcomeCollection) -> Result<()> {
        match (self.learning_mode, other.learning_mode) {
            (Some(mine), Some(theirs)) if mine != theirs => {
                return Err(EvaluationError::mode_mismatch(mine.as_str(), theirs.as_str()));
            }
            (None, theirs) => self.learning_mode = theirs,
            _ => {}
        }
        self.outcomes.extend(other.outcomes.iter().cloned());
        Ok(())
    }

    /// Merge two collections into a new one.
    pub fn merge(first: &OutcomeCollection, second: &OutcomeCollection) -> Result<Self> {
        let mut merged = first.clone();
        merged.add(second)?;
        log::debug!(
            "Merged {} + {} outcomes into {}",
            first.len(),
            second.len(),
            merged.len()
        );
        Ok(merged)
    }

    /// First gold value of every record, in iteration order.
    pub fn gold_values(&self) -> Array1<f64> {
        self.outcomes
            .iter()
            .map(|o| o.gold_scalar().unwrap_or(0.0))
            .collect()
    }

    /// First predicted value of every record, in iteration order.
    pub fn predicted_values(&self) -> Array1<f64> {
        self.outcomes
            .iter()
            .map(|o| o.prediction_scalar().unwrap_or(0.0))
            .collect()
    }

    /// Write a binary snapshot of the collection.
    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Read a snapshot written by [`OutcomeCollection::save_binary`].
    pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let collection: OutcomeCollection = bincode::deserialize_from(reader)?;
        Ok(collection)
    }
}
