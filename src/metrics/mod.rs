//! Metric calculators.
//!
//! Pure functions from contingency tables (or raw regression scalars) to
//! named scalar measures. Every division is guarded: a zero denominator
//! yields `0.0`, never `NaN` or an infinity, so averages over labels the
//! learner never predicted stay well defined.
//!
//! ```rust
//! use tc_evaluation::contingency::SmallContingencyTable;
//! use tc_evaluation::metrics::classification::ClassificationMeasures;
//!
//! let table = SmallContingencyTable::new(3, 1, 5, 1);
//! let measures = ClassificationMeasures::from_table(&table);
//! assert_eq!(measures.precision, 0.75);
//! assert_eq!(measures.recall, 0.75);
//! ```

pub mod classification;
pub mod multilabel;
pub mod regression;

pub use classification::{
    accuracy, macro_averaged, macro_measures, micro_averaged, micro_measures, per_label_measures,
    ClassificationMeasures,
};
pub use multilabel::{hamming_loss, multilabel_accuracy, subset_accuracy};
pub use regression::{
    mean_absolute_error, mean_squared_error, pearson_correlation, regression_measures,
    spearman_correlation, RegressionMeasures,
};

/// `numerator / denominator`, or `0.0` when the denominator is zero.
#[inline]
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Harmonic mean of precision and recall, `0.0` if both are zero.
#[inline]
pub fn f_measure(precision: f64, recall: f64) -> f64 {
    safe_ratio(2.0 * precision * recall, precision + recall)
}
