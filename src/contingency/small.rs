//! Per-label (one-vs-rest) contingency tables.

use crate::metrics::{f_measure, safe_ratio};
use crate::outcome::OutcomeCollection;
use crate::universe::ResolvedOutcomes;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Binary confusion counts for one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallContingencyTable {
    /// Gold and prediction both positive
    pub tp: usize,
    /// Predicted positive, gold negative
    pub fp: usize,
    /// Gold and prediction both negative
    pub tn: usize,
    /// Gold positive, predicted negative
    pub fn_: usize,
}

impl SmallContingencyTable {
    /// Build a table from explicit counts.
    pub fn new(tp: usize, fp: usize, tn: usize, fn_: usize) -> Self {
        Self { tp, fp, tn, fn_ }
    }

    /// Count one decision.
    pub fn record(&mut self, gold_positive: bool, predicted_positive: bool) {
        match (predicted_positive, gold_positive) {
            (true, true) => self.tp += 1,
            (true, false) => self.fp += 1,
            (false, false) => self.tn += 1,
            (false, true) => self.fn_ += 1,
        }
    }

    /// Sum of all four cells.
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// `tp / (tp + fp)`, `0.0` when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        safe_ratio(self.tp as f64, (self.tp + self.fp) as f64)
    }

    /// `tp / (tp + fn)`, `0.0` when no gold positives exist.
    pub fn recall(&self) -> f64 {
        safe_ratio(self.tp as f64, (self.tp + self.fn_) as f64)
    }

    /// Harmonic mean of precision and recall.
    pub fn f_measure(&self) -> f64 {
        f_measure(self.precision(), self.recall())
    }

    /// `(tp + tn) / total`.
    pub fn accuracy(&self) -> f64 {
        safe_ratio((self.tp + self.tn) as f64, self.total() as f64)
    }
}

impl Add for SmallContingencyTable {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            tp: self.tp + other.tp,
            fp: self.fp + other.fp,
            tn: self.tn + other.tn,
            fn_: self.fn_ + other.fn_,
        }
    }
}

impl AddAssign for SmallContingencyTable {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for SmallContingencyTable {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a SmallContingencyTable> for SmallContingencyTable {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// One small table per global label, in universe order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmallContingencyTables {
    labels: Vec<String>,
    tables: Vec<SmallContingencyTable>,
}

impl SmallContingencyTables {
    /// Assemble from labels and their tables.
    pub fn from_parts(labels: Vec<String>, tables: Vec<SmallContingencyTable>) -> Self {
        debug_assert_eq!(labels.len(), tables.len());
        Self { labels, tables }
    }

    /// Count every record once per global label.
    ///
    /// A record lacking a label contributes gold and prediction `0.0` for
    /// it, compared against the record's own threshold.
    pub fn from_resolved(resolved: &ResolvedOutcomes<'_>) -> Self {
        let labels = resolved.universe().labels().to_vec();
        let tables: Vec<SmallContingencyTable> = (0..labels.len())
            .into_par_iter()
            .map(|global| {
                let mut table = SmallContingencyTable::default();
                for (record, mapping) in resolved.entries() {
                    let (gold, prediction) = mapping.values(record, global);
                    let threshold = record.threshold();
                    table.record(gold >= threshold, prediction >= threshold);
                }
                table
            })
            .collect();
        log::debug!(
            "Built {} small contingency tables over {} outcomes",
            tables.len(),
            resolved.len()
        );
        Self { labels, tables }
    }

    /// Resolve `collection` and count it.
    pub fn from_collection(collection: &OutcomeCollection) -> Self {
        Self::from_resolved(&ResolvedOutcomes::resolve(collection))
    }

    /// Global labels, one per table.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Tables in label order.
    pub fn tables(&self) -> &[SmallContingencyTable] {
        &self.tables
    }

    /// Table of a global label index.
    pub fn table(&self, index: usize) -> Option<&SmallContingencyTable> {
        self.tables.get(index)
    }

    /// Table of a label name.
    pub fn table_for(&self, label: &str) -> Option<&SmallContingencyTable> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.tables.get(i))
    }

    /// `(label, table)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SmallContingencyTable)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.tables.iter())
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether there are no labels.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Element-wise sum of all tables (the micro aggregate).
    pub fn combined(&self) -> SmallContingencyTable {
        self.tables.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LearningMode;
    use crate::outcome::OutcomeRecord;

    fn two_label_collection() -> OutcomeCollection {
        let labels = vec!["X".to_string(), "Y".to_string()];
        OutcomeCollection::from_records(
            LearningMode::MultiLabel,
            vec![
                OutcomeRecord::new("1", vec![1.0, 0.0], vec![1.0, 0.0], 0.5, labels.clone()).unwrap(),
                OutcomeRecord::new("2", vec![0.0, 1.0], vec![1.0, 1.0], 0.5, labels).unwrap(),
            ],
        )
    }

    #[test]
    fn test_record_counts() {
        let mut table = SmallContingencyTable::default();
        table.record(true, true);
        table.record(false, true);
        table.record(false, false);
        table.record(true, false);
        table.record(true, true);
        assert_eq!(table, SmallContingencyTable::new(2, 1, 1, 1));
        assert_eq!(table.total(), 5);
    }

    #[test]
    fn test_ratios() {
        let table = SmallContingencyTable::new(2, 2, 5, 0);
        assert!((table.precision() - 0.5).abs() < 1e-10);
        assert!((table.recall() - 1.0).abs() < 1e-10);
        assert!((table.f_measure() - 2.0 / 3.0).abs() < 1e-10);
        assert!((table.accuracy() - 7.0 / 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_table_ratios_are_zero() {
        let table = SmallContingencyTable::default();
        assert_eq!(table.precision(), 0.0);
        assert_eq!(table.recall(), 0.0);
        assert_eq!(table.f_measure(), 0.0);
        assert_eq!(table.accuracy(), 0.0);
    }

    #[test]
    fn test_tables_from_collection() {
        let tables = SmallContingencyTables::from_collection(&two_label_collection());
        assert_eq!(tables.labels(), &["X", "Y"]);
        assert_eq!(tables.table_for("X"), Some(&SmallContingencyTable::new(1, 1, 0, 0)));
        assert_eq!(tables.table_for("Y"), Some(&SmallContingencyTable::new(1, 0, 1, 0)));
        assert_eq!(tables.combined(), SmallContingencyTable::new(2, 1, 1, 0));
    }

    #[test]
    fn test_absent_label_counts_as_zero() {
        let collection = OutcomeCollection::from_records(
            LearningMode::MultiLabel,
            vec![
                OutcomeRecord::new("1", vec![1.0], vec![1.0], 0.5, vec!["A".into()]).unwrap(),
                OutcomeRecord::new("2", vec![1.0], vec![0.0], 0.5, vec!["B".into()]).unwrap(),
            ],
        );
        let tables = SmallContingencyTables::from_collection(&collection);
        // record 2 lacks A (both 0 -> tn); record 1 lacks B (tn)
        assert_eq!(tables.table_for("A"), Some(&SmallContingencyTable::new(1, 0, 1, 0)));
        assert_eq!(tables.table_for("B"), Some(&SmallContingencyTable::new(0, 0, 1, 1)));
    }

    #[test]
    fn test_combined_is_elementwise_sum() {
        let tables = SmallContingencyTables::from_parts(
            vec!["a".into(), "b".into()],
            vec![
                SmallContingencyTable::new(1, 2, 3, 4),
                SmallContingencyTable::new(10, 20, 30, 40),
            ],
        );
        assert_eq!(tables.combined(), SmallContingencyTable::new(11, 22, 33, 44));
    }
}
