//! Accuracy and precision/recall/F1 measures.
//!
//! Macro averages compute each measure per label and take the arithmetic
//! mean over all global labels. Micro averages apply the same formulas to
//! the combined table.

use crate::contingency::{ConfusionMatrix, SmallContingencyTable, SmallContingencyTables};
use crate::core::constants::*;
use crate::core::types::MetricMap;
use serde::{Deserialize, Serialize};

/// Precision, recall and F1 of one table or one averaging scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMeasures {
    /// Precision
    pub precision: f64,
    /// Recall
    pub recall: f64,
    /// F1
    pub f_measure: f64,
}

impl ClassificationMeasures {
    /// Measures of a single table.
    pub fn from_table(table: &SmallContingencyTable) -> Self {
        Self {
            precision: table.precision(),
            recall: table.recall(),
            f_measure: table.f_measure(),
        }
    }

    fn insert_into(&self, metrics: &mut MetricMap, precision: &str, recall: &str, f_measure: &str) {
        metrics.insert(precision.to_string(), self.precision);
        metrics.insert(recall.to_string(), self.recall);
        metrics.insert(f_measure.to_string(), self.f_measure);
    }
}

/// Fraction of records whose predicted label equals the gold label.
pub fn accuracy(matrix: &ConfusionMatrix) -> f64 {
    matrix.accuracy()
}

/// Per-label measures averaged over all labels; zeros for no labels.
pub fn macro_averaged(tables: &SmallContingencyTables) -> ClassificationMeasures {
    if tables.is_empty() {
        return ClassificationMeasures::default();
    }
    let n = tables.len() as f64;
    let sum = tables
        .tables()
        .iter()
        .map(ClassificationMeasures::from_table)
        .fold(ClassificationMeasures::default(), |acc, m| ClassificationMeasures {
            precision: acc.precision + m.precision,
            recall: acc.recall + m.recall,
            f_measure: acc.f_measure + m.f_measure,
        });
    ClassificationMeasures {
        precision: sum.precision / n,
        recall: sum.recall / n,
        f_measure: sum.f_measure / n,
    }
}

/// Measures of the combined table.
pub fn micro_averaged(tables: &SmallContingencyTables) -> ClassificationMeasures {
    ClassificationMeasures::from_table(&tables.combined())
}

/// `Macro Precision`, `Macro Recall` and `Macro FMeasure`.
pub fn macro_measures(tables: &SmallContingencyTables) -> MetricMap {
    let mut metrics = MetricMap::new();
    macro_averaged(tables).insert_into(&mut metrics, MACRO_PRECISION, MACRO_RECALL, MACRO_FMEASURE);
    metrics
}

/// `Micro Precision`, `Micro Recall` and `Micro FMeasure`.
pub fn micro_measures(tables: &SmallContingencyTables) -> MetricMap {
    let mut metrics = MetricMap::new();
    micro_averaged(tables).insert_into(&mut metrics, MICRO_PRECISION, MICRO_RECALL, MICRO_FMEASURE);
    metrics
}

/// `Precision <label>`, `Recall <label>` and `FMeasure <label>` for every label.
pub fn per_label_measures(tables: &SmallContingencyTables) -> MetricMap {
    let mut metrics = MetricMap::new();
    for (label, table) in tables.iter() {
        ClassificationMeasures::from_table(table).insert_into(
            &mut metrics,
            &format!("{} {}", PRECISION_PREFIX, label),
            &format!("{} {}", RECALL_PREFIX, label),
            &format!("{} {}", FMEASURE_PREFIX, label),
        );
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(parts: Vec<(&str, SmallContingencyTable)>) -> SmallContingencyTables {
        let (labels, tables): (Vec<String>, Vec<SmallContingencyTable>) =
            parts.into_iter().map(|(l, t)| (l.to_string(), t)).unzip();
        SmallContingencyTables::from_parts(labels, tables)
    }

    #[test]
    fn test_macro_and_micro() {
        let t = tables(vec![
            ("X", SmallContingencyTable::new(1, 1, 0, 0)),
            ("Y", SmallContingencyTable::new(1, 0, 1, 0)),
        ]);
        let macro_avg = macro_averaged(&t);
        assert!((macro_avg.precision - 0.75).abs() < 1e-10);
        assert!((macro_avg.recall - 1.0).abs() < 1e-10);
        assert!((macro_avg.f_measure - (2.0 / 3.0 + 1.0) / 2.0).abs() < 1e-10);

        let micro_avg = micro_averaged(&t);
        assert!((micro_avg.precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((micro_avg.recall - 1.0).abs() < 1e-10);
        assert!((micro_avg.f_measure - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_unpredicted_label_contributes_zero() {
        let t = tables(vec![
            ("A", SmallContingencyTable::new(2, 0, 0, 0)),
            ("B", SmallContingencyTable::new(0, 0, 0, 0)),
        ]);
        let metrics = macro_measures(&t);
        assert_eq!(metrics[MACRO_PRECISION], 0.5);
        assert_eq!(metrics[MACRO_RECALL], 0.5);
        assert_eq!(metrics[MACRO_FMEASURE], 0.5);
        assert!(metrics.values().all(|v| v.is_finite()));
    }

    #[test]
    fn test_single_label_macro_equals_micro() {
        let t = tables(vec![("only", SmallContingencyTable::new(3, 2, 4, 1))]);
        assert_eq!(macro_averaged(&t), micro_averaged(&t));
    }

    #[test]
    fn test_per_label_names() {
        let t = tables(vec![("talk shows", SmallContingencyTable::new(1, 0, 0, 1))]);
        let metrics = per_label_measures(&t);
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics["Precision talk shows"], 1.0);
        assert_eq!(metrics["Recall talk shows"], 0.5);
        assert!((metrics["FMeasure talk shows"] - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_no_labels() {
        let t = SmallContingencyTables::default();
        assert_eq!(macro_averaged(&t), ClassificationMeasures::default());
        assert_eq!(micro_averaged(&t), ClassificationMeasures::default());
    }
}
