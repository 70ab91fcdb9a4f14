//! Regression measures over raw gold and predicted scalars.
//!
//! These bypass the contingency machinery entirely. Inputs are index
//! aligned views: position `i` of `gold` and `predicted` belong to the same
//! instance.

use crate::core::constants::*;
use crate::core::error::{EvaluationError, Result};
use crate::core::types::MetricMap;
use crate::metrics::safe_ratio;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Correlation and error measures of one regression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionMeasures {
    /// Pearson product-moment correlation
    pub pearson: f64,
    /// Spearman rank correlation
    pub spearman: f64,
    /// Mean squared error
    pub mean_squared_error: f64,
    /// Mean absolute error
    pub mean_absolute_error: f64,
}

impl RegressionMeasures {
    /// Compute all measures, checking that both views have the same length.
    pub fn calculate(gold: &ArrayView1<'_, f64>, predicted: &ArrayView1<'_, f64>) -> Result<Self> {
        if gold.len() != predicted.len() {
            return Err(EvaluationError::dimension_mismatch(
                format!("gold: {}", gold.len()),
                format!("predicted: {}", predicted.len()),
            ));
        }
        Ok(Self {
            pearson: pearson_correlation(gold, predicted),
            spearman: spearman_correlation(gold, predicted),
            mean_squared_error: mean_squared_error(gold, predicted),
            mean_absolute_error: mean_absolute_error(gold, predicted),
        })
    }

    /// Named entries for a metric map.
    pub fn to_metric_map(&self) -> MetricMap {
        let mut metrics = MetricMap::new();
        metrics.insert(PEARSON_CORRELATION.to_string(), self.pearson);
        metrics.insert(SPEARMAN_CORRELATION.to_string(), self.spearman);
        metrics.insert(MEAN_SQUARED_ERROR.to_string(), self.mean_squared_error);
        metrics.insert(MEAN_ABSOLUTE_ERROR.to_string(), self.mean_absolute_error);
        metrics
    }
}

/// All regression measures as a metric map.
pub fn regression_measures(gold: &ArrayView1<'_, f64>, predicted: &ArrayView1<'_, f64>) -> Result<MetricMap> {
    Ok(RegressionMeasures::calculate(gold, predicted)?.to_metric_map())
}

/// Pearson correlation; `0.0` if either side has zero variance.
pub fn pearson_correlation(x: &ArrayView1<'_, f64>, y: &ArrayView1<'_, f64>) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = x.iter().take(n).sum::<f64>() / n as f64;
    let mean_y = y.iter().take(n).sum::<f64>() / n as f64;

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    safe_ratio(covariance, (var_x * var_y).sqrt())
}

/// Spearman rank correlation: Pearson over average ranks.
pub fn spearman_correlation(x: &ArrayView1<'_, f64>, y: &ArrayView1<'_, f64>) -> f64 {
    let rx = average_ranks(x);
    let ry = average_ranks(y);
    pearson_correlation(&rx.view(), &ry.view())
}

/// Mean of squared differences, `0.0` for empty input.
pub fn mean_squared_error(gold: &ArrayView1<'_, f64>, predicted: &ArrayView1<'_, f64>) -> f64 {
    let sum: f64 = gold
        .iter()
        .zip(predicted.iter())
        .map(|(g, p)| (g - p).powi(2))
        .sum();
    safe_ratio(sum, gold.len().min(predicted.len()) as f64)
}

/// Mean of absolute differences, `0.0` for empty input.
pub fn mean_absolute_error(gold: &ArrayView1<'_, f64>, predicted: &ArrayView1<'_, f64>) -> f64 {
    let sum: f64 = gold
        .iter()
        .zip(predicted.iter())
        .map(|(g, p)| (g - p).abs())
        .sum();
    safe_ratio(sum, gold.len().min(predicted.len()) as f64)
}

/// 1-based ranks; tied values share the mean of the ranks they span.
pub fn average_ranks(values: &ArrayView1<'_, f64>) -> Array1<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = Array1::<f64>::zeros(values.len());
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_pearson_perfect() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let y = array![2.0, 4.0, 6.0, 8.0];
        assert!((pearson_correlation(&x.view(), &y.view()) - 1.0).abs() < 1e-10);
        let z = array![8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&x.view(), &z.view()) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pearson_constant_is_zero() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![5.0, 5.0, 5.0];
        assert_eq!(pearson_correlation(&x.view(), &y.view()), 0.0);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let values = array![10.0, 20.0, 10.0, 30.0];
        let ranks = average_ranks(&values.view());
        assert_eq!(ranks.to_vec(), vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_average_ranks_unsorted_with_negatives() {
        let values = array![-1.0, 0.0, -3.0, 2.0, 0.0];
        let ranks = average_ranks(&values.view());
        assert_eq!(ranks.to_vec(), vec![2.0, 3.5, 1.0, 5.0, 3.5]);
    }

    #[test]
    fn test_spearman_monotone() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![1.0, 4.0, 9.0, 16.0, 100.0];
        assert!((spearman_correlation(&x.view(), &y.view()) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_errors() {
        let gold = array![1.0, 2.0, 3.0];
        let predicted = array![1.5, 2.0, 2.0];
        let mse = mean_squared_error(&gold.view(), &predicted.view());
        let mae = mean_absolute_error(&gold.view(), &predicted.view());
        assert!((mse - (0.25 + 0.0 + 1.0) / 3.0).abs() < 1e-10);
        assert!((mae - 1.5 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_input() {
        let empty = Array1::<f64>::zeros(0);
        let measures = RegressionMeasures::calculate(&empty.view(), &empty.view()).unwrap();
        assert_eq!(measures, RegressionMeasures::default());
    }

    #[test]
    fn test_length_mismatch() {
        let a = array![1.0, 2.0];
        let b = array![1.0];
        assert!(regression_measures(&a.view(), &b.view()).is_err());
    }

    #[test]
    fn test_metric_names() {
        let gold = array![1.0, 2.0, 3.0];
        let metrics = regression_measures(&gold.view(), &gold.view()).unwrap();
        assert_eq!(metrics.len(), 4);
        assert_eq!(metrics[MEAN_SQUARED_ERROR], 0.0);
        assert!((metrics[PEARSON_CORRELATION] - 1.0).abs() < 1e-10);
    }
}
