//! Label-combination contingency table for multi-label outcomes.
//!
//! Every distinct combination string (gold or predicted) is interned once
//! into an arena and addressed by its id; counts live in a dense
//! `combinations × combinations` matrix with gold on the rows.

use crate::core::constants::{COMBINATION_SEPARATOR, EMPTY_PREDICTION};
use crate::core::encoding::encode_label;
use crate::metrics::safe_ratio;
use crate::outcome::{OutcomeCollection, OutcomeRecord};
use crate::universe::{LabelMapping, LabelUniverse, ResolvedOutcomes};
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};

/// Interned combination strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationArena {
    combinations: Vec<String>,
    ids: HashMap<String, usize>,
}

impl CombinationArena {
    /// Id of `combination`, interning it on first sight.
    pub fn intern(&mut self, combination: String) -> usize {
        if let Some(&id) = self.ids.get(&combination) {
            return id;
        }
        let id = self.combinations.len();
        self.ids.insert(combination.clone(), id);
        self.combinations.push(combination);
        id
    }

    /// Id of an already interned combination.
    pub fn id(&self, combination: &str) -> Option<usize> {
        self.ids.get(combination).copied()
    }

    /// Combination string of an id.
    pub fn get(&self, id: usize) -> Option<&str> {
        self.combinations.get(id).map(String::as_str)
    }

    /// All combinations in interning order.
    pub fn combinations(&self) -> &[String] {
        &self.combinations
    }

    /// Number of interned combinations.
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    /// Whether nothing was interned.
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }
}

/// Build the combination string from label names already in sorted order.
pub fn label_combination<'a, I>(labels: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let encoded: Vec<String> = labels.into_iter().map(encode_label).collect();
    if encoded.is_empty() {
        EMPTY_PREDICTION.to_string()
    } else {
        encoded.join(&COMBINATION_SEPARATOR.to_string())
    }
}

/// Gold and predicted label combinations of one record over the universe.
pub fn record_combinations(
    universe: &LabelUniverse,
    record: &OutcomeRecord,
    mapping: &LabelMapping,
) -> (String, String) {
    let threshold = record.threshold();
    let mut gold = Vec::new();
    let mut predicted = Vec::new();
    for (global, label) in universe.labels().iter().enumerate() {
        let (g, p) = mapping.values(record, global);
        if g >= threshold {
            gold.push(label.as_str());
        }
        if p >= threshold {
            predicted.push(label.as_str());
        }
    }
    (label_combination(gold), label_combination(predicted))
}

/// Gold combination × predicted combination counts.
#[derive(Debug, Clone, PartialEq)]
pub struct LargeContingencyTable {
    arena: CombinationArena,
    counts: Array2<usize>,
    gold_seen: Vec<bool>,
    predicted_seen: Vec<bool>,
    total: usize,
}

impl LargeContingencyTable {
    /// Count the combination pair of every record.
    pub fn from_resolved(resolved: &ResolvedOutcomes<'_>) -> Self {
        let mut arena = CombinationArena::default();
        let pairs: Vec<(usize, usize)> = resolved
            .entries()
            .iter()
            .map(|(record, mapping)| {
                let (gold, predicted) = record_combinations(resolved.universe(), record, mapping);
                (arena.intern(gold), arena.intern(predicted))
            })
            .collect();

        let n = arena.len();
        let mut counts = Array2::<usize>::zeros((n, n));
        let mut gold_seen = vec![false; n];
        let mut predicted_seen = vec![false; n];
        for &(gold, predicted) in &pairs {
            counts[[gold, predicted]] += 1;
            gold_seen[gold] = true;
            predicted_seen[predicted] = true;
        }
        log::debug!(
            "Large contingency table: {} combinations over {} outcomes",
            n,
            pairs.len()
        );

        Self {
            arena,
            counts,
            gold_seen,
            predicted_seen,
            total: pairs.len(),
        }
    }

    /// Resolve `collection` and count it.
    pub fn from_collection(collection: &OutcomeCollection) -> Self {
        Self::from_resolved(&ResolvedOutcomes::resolve(collection))
    }

    /// The combination arena.
    pub fn arena(&self) -> &CombinationArena {
        &self.arena
    }

    /// Dense count matrix, rows are gold ids and columns predicted ids.
    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Count of a (gold, predicted) combination pair; `0` for unseen pairs.
    pub fn count(&self, gold: &str, predicted: &str) -> usize {
        match (self.arena.id(gold), self.arena.id(predicted)) {
            (Some(g), Some(p)) => self.counts[[g, p]],
            _ => 0,
        }
    }

    /// Number of records counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Records whose predicted combination equals the gold one.
    pub fn exact_matches(&self) -> usize {
        self.counts.diag().sum()
    }

    /// `exact_matches / total`, `0.0` for an empty table.
    pub fn subset_accuracy(&self) -> f64 {
        safe_ratio(self.exact_matches() as f64, self.total as f64)
    }

    /// Combinations observed on the gold side.
    pub fn gold_combinations(&self) -> impl Iterator<Item = &str> + '_ {
        self.seen(&self.gold_seen)
    }

    /// Combinations observed on the predicted side.
    pub fn predicted_combinations(&self) -> impl Iterator<Item = &str> + '_ {
        self.seen(&self.predicted_seen)
    }

    /// Nested `gold -> predicted -> count` view over every observed gold and
    /// predicted combination, zero cells included.
    pub fn to_nested_map(&self) -> BTreeMap<String, BTreeMap<String, usize>> {
        self.gold_combinations()
            .map(|gold| {
                let row = self
                    .predicted_combinations()
                    .map(|predicted| (predicted.to_string(), self.count(gold, predicted)))
                    .collect();
                (gold.to_string(), row)
            })
            .collect()
    }

    fn seen<'a>(&'a self, flags: &'a [bool]) -> impl Iterator<Item = &'a str> + 'a {
        self.arena
            .combinations()
            .iter()
            .zip(flags.iter())
            .filter(|(_, seen)| **seen)
            .map(|(combination, _)| combination.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LearningMode;

    fn multi(records: Vec<(&str, Vec<f64>, Vec<f64>)>, labels: &[&str]) -> OutcomeCollection {
        let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        OutcomeCollection::from_records(
            LearningMode::MultiLabel,
            records.into_iter().map(|(id, gold, prediction)| {
                OutcomeRecord::new(id, gold, prediction, 0.5, labels.clone()).unwrap()
            }),
        )
    }

    #[test]
    fn test_label_combination() {
        assert_eq!(label_combination(Vec::<&str>::new()), EMPTY_PREDICTION);
        assert_eq!(label_combination(["a b", "c,d"]), "a+b,c%2Cd");
    }

    #[test]
    fn test_arena_interning() {
        let mut arena = CombinationArena::default();
        assert_eq!(arena.intern("x".into()), 0);
        assert_eq!(arena.intern("y".into()), 1);
        assert_eq!(arena.intern("x".into()), 0);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(1), Some("y"));
    }

    #[test]
    fn test_subset_accuracy() {
        let collection = multi(
            vec![
                ("1", vec![1.0, 0.0], vec![1.0, 0.0]),
                ("2", vec![0.0, 1.0], vec![1.0, 1.0]),
            ],
            &["X", "Y"],
        );
        let table = LargeContingencyTable::from_collection(&collection);
        assert_eq!(table.total(), 2);
        assert_eq!(table.count("X", "X"), 1);
        assert_eq!(table.count("Y", "X,Y"), 1);
        assert_eq!(table.count("Y", "Y"), 0);
        assert!((table.subset_accuracy() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_combination_is_counted() {
        let collection = multi(vec![("1", vec![0.0, 0.0], vec![0.2, 0.1])], &["X", "Y"]);
        let table = LargeContingencyTable::from_collection(&collection);
        assert_eq!(table.count(EMPTY_PREDICTION, EMPTY_PREDICTION), 1);
        assert_eq!(table.subset_accuracy(), 1.0);
    }

    #[test]
    fn test_nested_map_has_zero_cells() {
        let collection = multi(
            vec![
                ("1", vec![1.0, 0.0], vec![0.0, 1.0]),
                ("2", vec![0.0, 1.0], vec![0.0, 1.0]),
            ],
            &["X", "Y"],
        );
        let nested = LargeContingencyTable::from_collection(&collection).to_nested_map();
        assert_eq!(nested["X"]["Y"], 1);
        assert_eq!(nested["Y"]["Y"], 1);
        assert_eq!(nested["X"].len(), 1);
        assert_eq!(nested.len(), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = LargeContingencyTable::from_collection(&OutcomeCollection::new(LearningMode::MultiLabel));
        assert_eq!(table.total(), 0);
        assert_eq!(table.subset_accuracy(), 0.0);
    }
}
