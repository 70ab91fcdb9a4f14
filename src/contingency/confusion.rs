//! Gold × predicted confusion matrix for single-label outcomes.

use crate::contingency::small::{SmallContingencyTable, SmallContingencyTables};
use crate::core::error::{EvaluationError, Result};
use crate::metrics::safe_ratio;
use crate::universe::ResolvedOutcomes;
use ndarray::{Array2, Axis};

/// Square count matrix over the global labels, gold on the rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    matrix: Array2<usize>,
}

impl ConfusionMatrix {
    /// Count the (gold, predicted) label pair of every one-hot record.
    ///
    /// Fails with a format error if a record does not carry exactly one
    /// gold and one predicted label.
    pub fn from_resolved(resolved: &ResolvedOutcomes<'_>) -> Result<Self> {
        let universe = resolved.universe();
        let n = universe.len();
        let mut matrix = Array2::<usize>::zeros((n, n));
        for (record, _) in resolved.entries() {
            let (gold, predicted) = record.single_label_pair()?;
            let lookup = |label: &str| {
                universe.index_of(label).ok_or_else(|| {
                    EvaluationError::internal(format!("label '{}' missing from universe", label))
                })
            };
            matrix[[lookup(gold)?, lookup(predicted)?]] += 1;
        }
        Ok(Self {
            labels: universe.labels().to_vec(),
            matrix,
        })
    }

    /// Global labels indexing rows and columns.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The raw matrix.
    pub fn matrix(&self) -> &Array2<usize> {
        &self.matrix
    }

    /// Number of records counted.
    pub fn total(&self) -> usize {
        self.matrix.sum()
    }

    /// Records whose predicted label equals the gold label.
    pub fn correct(&self) -> usize {
        self.matrix.diag().sum()
    }

    /// `correct / total`, `0.0` for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        safe_ratio(self.correct() as f64, self.total() as f64)
    }

    /// Count of a (gold, predicted) pair by label name.
    pub fn count(&self, gold: &str, predicted: &str) -> usize {
        let position = |label: &str| self.labels.iter().position(|l| l == label);
        match (position(gold), position(predicted)) {
            (Some(g), Some(p)) => self.matrix[[g, p]],
            _ => 0,
        }
    }

    /// One-vs-rest small tables, one per label.
    pub fn decompose(&self) -> SmallContingencyTables {
        let total = self.total();
        let gold_totals = self.matrix.sum_axis(Axis(1));
        let predicted_totals = self.matrix.sum_axis(Axis(0));
        let tables = (0..self.labels.len())
            .map(|k| {
                let tp = self.matrix[[k, k]];
                let fp = predicted_totals[k] - tp;
                let fn_ = gold_totals[k] - tp;
                SmallContingencyTable::new(tp, fp, total - tp - fp - fn_, fn_)
            })
            .collect();
        SmallContingencyTables::from_parts(self.labels.clone(), tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LearningMode;
    use crate::outcome::OutcomeParser;

    fn matrix(log: &str) -> ConfusionMatrix {
        let collection = OutcomeParser::new(LearningMode::SingleLabel).parse_str(log).unwrap();
        ConfusionMatrix::from_resolved(&ResolvedOutcomes::resolve(&collection)).unwrap()
    }

    #[test]
    fn test_counts_and_accuracy() {
        // gold A,B,C predicted A,C,C
        let cm = matrix("#labels 0=A 1=B 2=C\nd1=0;0\nd2=2;1\nd3=2;2\n");
        assert_eq!(cm.total(), 3);
        assert_eq!(cm.correct(), 2);
        assert_eq!(cm.count("B", "C"), 1);
        assert!((cm.accuracy() - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_decompose_one_vs_rest() {
        let cm = matrix("#labels 0=A 1=B 2=C\nd1=0;0\nd2=2;1\nd3=2;2\n");
        let tables = cm.decompose();
        assert_eq!(tables.table_for("A"), Some(&SmallContingencyTable::new(1, 0, 2, 0)));
        assert_eq!(tables.table_for("B"), Some(&SmallContingencyTable::new(0, 0, 2, 1)));
        assert_eq!(tables.table_for("C"), Some(&SmallContingencyTable::new(1, 1, 1, 0)));
        for (_, table) in tables.iter() {
            assert_eq!(table.total(), 3);
        }
    }

    #[test]
    fn test_multi_hot_record_is_rejected() {
        let collection = OutcomeParser::new(LearningMode::SingleLabel)
            .parse_str("#labels 0=A 1=B\nd1=1,1;1,0;0.5\n")
            .unwrap();
        let err = ConfusionMatrix::from_resolved(&ResolvedOutcomes::resolve(&collection)).unwrap_err();
        assert!(matches!(err, EvaluationError::Format { .. }));
    }
}
