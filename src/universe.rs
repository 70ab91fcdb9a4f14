//! Global label universe.
//!
//! Records parsed from different files (or folds) may carry different local
//! label lists. The universe is the sorted, deduplicated union of all of
//! them, and every record gets a mapping between its local positions and
//! the global indices. Resolution is a pure function of the collection.

use crate::core::types::LabelIndex;
use crate::outcome::{OutcomeCollection, OutcomeRecord};
use std::collections::{BTreeSet, HashMap};

/// Sorted union of all label names in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelUniverse {
    labels: Vec<String>,
    index: HashMap<String, LabelIndex>,
}

impl LabelUniverse {
    /// Build the universe from arbitrary label names.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        let labels: Vec<String> = sorted.into_iter().collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self { labels, index }
    }

    /// Build the universe of a collection.
    pub fn from_collection(collection: &OutcomeCollection) -> Self {
        Self::from_labels(
            collection
                .outcomes()
                .flat_map(|o| o.labels().iter().map(String::as_str)),
        )
    }

    /// Labels in ascending lexicographic order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of global labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Global index of a label name.
    pub fn index_of(&self, label: &str) -> Option<LabelIndex> {
        self.index.get(label).copied()
    }

    /// Label name at a global index.
    pub fn label(&self, index: LabelIndex) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Map a record's local label positions onto this universe.
    ///
    /// Local labels unknown to the universe map to `None`; this only happens
    /// when the universe was built from a different collection.
    pub fn map_record(&self, record: &OutcomeRecord) -> LabelMapping {
        let mut global_to_local = vec![None; self.labels.len()];
        let local_to_global: Vec<Option<LabelIndex>> = record
            .labels()
            .iter()
            .enumerate()
            .map(|(local, label)| {
                let global = self.index_of(label);
                match global {
                    Some(g) => global_to_local[g] = Some(local),
                    None => log::warn!(
                        "Label '{}' of instance '{}' is not part of the label universe",
                        label,
                        record.id()
                    ),
                }
                global
            })
            .collect();
        LabelMapping {
            local_to_global,
            global_to_local,
        }
    }
}

/// Index mapping between one record's local labels and the global universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMapping {
    local_to_global: Vec<Option<LabelIndex>>,
    global_to_local: Vec<Option<usize>>,
}

impl LabelMapping {
    /// Global index of a local position.
    pub fn global(&self, local: usize) -> Option<LabelIndex> {
        self.local_to_global.get(local).copied().flatten()
    }

    /// Local position of a global label, `None` if the record lacks it.
    pub fn local(&self, global: LabelIndex) -> Option<usize> {
        self.global_to_local.get(global).copied().flatten()
    }

    /// Local to global mapping, indexed by local position.
    pub fn local_to_global(&self) -> &[Option<LabelIndex>] {
        &self.local_to_global
    }

    /// Gold and predicted value of a global label; both `0.0` if the record
    /// does not carry it.
    pub fn values(&self, record: &OutcomeRecord, global: LabelIndex) -> (f64, f64) {
        match self.local(global) {
            Some(local) => (record.gold()[local], record.prediction()[local]),
            None => (0.0, 0.0),
        }
    }

    /// Gold and prediction vectors reprojected onto the whole universe.
    pub fn reproject(&self, record: &OutcomeRecord) -> (Vec<f64>, Vec<f64>) {
        (0..self.global_to_local.len())
            .map(|g| self.values(record, g))
            .unzip()
    }
}

/// A collection together with its universe and per-record mappings.
#[derive(Debug, Clone)]
pub struct ResolvedOutcomes<'a> {
    universe: LabelUniverse,
    entries: Vec<(&'a OutcomeRecord, LabelMapping)>,
}

impl<'a> ResolvedOutcomes<'a> {
    /// Resolve every record of `collection` against its label universe.
    pub fn resolve(collection: &'a OutcomeCollection) -> Self {
        let universe = LabelUniverse::from_collection(collection);
        let entries = collection
            .outcomes()
            .map(|record| (record, universe.map_record(record)))
            .collect();
        log::debug!(
            "Resolved {} outcomes against {} global labels",
            collection.len(),
            universe.len()
        );
        Self { universe, entries }
    }

    /// The global label universe.
    pub fn universe(&self) -> &LabelUniverse {
        &self.universe
    }

    /// Records paired with their mappings.
    pub fn entries(&self) -> &[(&'a OutcomeRecord, LabelMapping)] {
        &self.entries
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LearningMode;

    fn record(id: &str, labels: &[&str], gold: Vec<f64>, prediction: Vec<f64>) -> OutcomeRecord {
        OutcomeRecord::new(
            id,
            gold,
            prediction,
            0.5,
            labels.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_universe_is_sorted_union() {
        let collection = OutcomeCollection::from_records(
            LearningMode::MultiLabel,
            vec![
                record("1", &["b", "a"], vec![1.0, 0.0], vec![1.0, 0.0]),
                record("2", &["c", "a"], vec![0.0, 1.0], vec![0.0, 1.0]),
            ],
        );
        let universe = LabelUniverse::from_collection(&collection);
        assert_eq!(universe.labels(), &["a", "b", "c"]);
        assert_eq!(universe.index_of("c"), Some(2));
        assert_eq!(universe.index_of("d"), None);
    }

    #[test]
    fn test_mapping_and_reprojection() {
        let universe = LabelUniverse::from_labels(["a", "b", "c"]);
        let r = record("1", &["c", "a"], vec![1.0, 0.0], vec![0.3, 0.8]);
        let mapping = universe.map_record(&r);

        assert_eq!(mapping.local_to_global(), &[Some(2), Some(0)]);
        assert_eq!(mapping.local(1), None);
        assert_eq!(mapping.values(&r, 0), (0.0, 0.8));
        assert_eq!(mapping.values(&r, 1), (0.0, 0.0));

        let (gold, prediction) = mapping.reproject(&r);
        assert_eq!(gold, vec![0.0, 0.0, 1.0]);
        assert_eq!(prediction, vec![0.8, 0.0, 0.3]);
    }

    #[test]
    fn test_unknown_local_label_maps_to_none() {
        let universe = LabelUniverse::from_labels(["a"]);
        let r = record("1", &["a", "z"], vec![1.0, 1.0], vec![1.0, 1.0]);
        let mapping = universe.map_record(&r);
        assert_eq!(mapping.global(0), Some(0));
        assert_eq!(mapping.global(1), None);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let collection = OutcomeCollection::from_records(
            LearningMode::MultiLabel,
            vec![
                record("1", &["y", "x"], vec![1.0, 0.0], vec![1.0, 0.0]),
                record("2", &["x", "y"], vec![0.0, 1.0], vec![1.0, 1.0]),
            ],
        );
        let first = ResolvedOutcomes::resolve(&collection);
        let second = ResolvedOutcomes::resolve(&collection);
        assert_eq!(first.universe(), second.universe());
        assert_eq!(first.len(), 2);
    }
}
