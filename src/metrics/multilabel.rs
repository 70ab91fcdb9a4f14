//! Example-based multi-label measures.

use crate::contingency::{LargeContingencyTable, SmallContingencyTables};
use crate::metrics::safe_ratio;
use crate::universe::ResolvedOutcomes;

/// Fraction of records whose predicted label combination equals the gold one.
pub fn subset_accuracy(table: &LargeContingencyTable) -> f64 {
    table.subset_accuracy()
}

/// Fraction of mismatched (record, label) slots.
///
/// Equals `(fp + fn) / total` of the combined table, since every record
/// contributes one slot per global label.
pub fn hamming_loss(tables: &SmallContingencyTables) -> f64 {
    let combined = tables.combined();
    safe_ratio((combined.fp + combined.fn_) as f64, combined.total() as f64)
}

/// Mean Jaccard overlap `|gold ∩ predicted| / |gold ∪ predicted|` per record.
///
/// A record with neither gold nor predicted labels scores `1.0`.
pub fn multilabel_accuracy(resolved: &ResolvedOutcomes<'_>) -> f64 {
    let labels = resolved.universe().len();
    let sum: f64 = resolved
        .entries()
        .iter()
        .map(|(record, mapping)| {
            let threshold = record.threshold();
            let (mut intersection, mut union) = (0usize, 0usize);
            for global in 0..labels {
                let (gold, prediction) = mapping.values(record, global);
                let (gold, predicted) = (gold >= threshold, prediction >= threshold);
                if gold && predicted {
                    intersection += 1;
                }
                if gold || predicted {
                    union += 1;
                }
            }
            if union == 0 {
                1.0
            } else {
                intersection as f64 / union as f64
            }
        })
        .sum();
    safe_ratio(sum, resolved.len() as f64)
}
