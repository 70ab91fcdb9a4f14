//! Evaluator dispatcher.
//!
//! [`Evaluator::evaluate`] inspects the collection's learning mode and runs
//! the matching calculators:
//!
//! - single-label: `Accuracy`
//! - multi-label: macro and micro precision/recall/F1 plus `Subset Accuracy`
//! - regression: correlation and error measures
//!
//! The configuration can add supplementary and per-label measures. Results
//! of all calculators go into one map; on a name collision the calculator
//! run last wins.
//!
//! The evaluator holds no state between calls, so one instance can serve
//! many threads. Batch evaluation over files runs on a dedicated rayon pool.

use crate::config::EvaluationConfig;
use crate::contingency::{ConfusionMatrix, LargeContingencyTable, SmallContingencyTables};
use crate::core::constants::*;
use crate::core::error::{EvaluationError, Result};
use crate::core::types::{LearningMode, MetricMap};
use crate::metrics;
use crate::outcome::{OutcomeCollection, OutcomeParser};
use crate::report::EvaluationReport;
use crate::universe::ResolvedOutcomes;
use rayon::prelude::*;
use std::path::Path;

/// Computes metric maps and reports from outcome collections.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    /// Create an evaluator with the given configuration.
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Compute all measures for the collection's learning mode.
    ///
    /// Fails with a mode error if the collection never received a learning
    /// mode (an empty collection that was never merged into).
    pub fn evaluate(&self, collection: &OutcomeCollection) -> Result<MetricMap> {
        self.dispatch(collection).map(|(metrics, _)| metrics)
    }

    /// Evaluate and wrap the result in a report.
    pub fn report(&self, source: impl Into<String>, collection: &OutcomeCollection) -> Result<EvaluationReport> {
        let (metrics, num_labels) = self.dispatch(collection)?;
        let mode = learning_mode(collection)?;
        Ok(EvaluationReport::new(
            source,
            mode,
            collection.len(),
            num_labels,
            metrics,
        ))
    }

    /// Parse one log with the configured learning mode and evaluate it.
    pub fn evaluate_file<P: AsRef<Path>>(&self, path: P) -> Result<EvaluationReport> {
        let path = path.as_ref();
        let collection = self.parser().parse_file(path)?;
        self.report(path.display().to_string(), &collection)
    }

    /// Evaluate every file independently, in parallel.
    ///
    /// Reports come back in input order. The first failure aborts the batch.
    pub fn evaluate_files<P>(&self, paths: &[P]) -> Result<Vec<EvaluationReport>>
    where
        P: AsRef<Path> + Sync,
    {
        let pool = self.thread_pool()?;
        log::info!(
            "Evaluating {} outcome logs on {} threads",
            paths.len(),
            pool.current_num_threads()
        );
        pool.install(|| {
            paths
                .par_iter()
                .map(|path| self.evaluate_file(path))
                .collect::<Result<Vec<_>>>()
        })
    }

    /// Parse all fold logs in parallel and merge them into one collection.
    pub fn combine_folds<P>(&self, paths: &[P]) -> Result<OutcomeCollection>
    where
        P: AsRef<Path> + Sync,
    {
        let parser = self.parser();
        let pool = self.thread_pool()?;
        let folds = pool.install(|| {
            paths
                .par_iter()
                .map(|path| parser.parse_file(path))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut combined = OutcomeCollection::empty();
        for fold in &folds {
            combined.add(fold)?;
        }
        log::debug!("Combined {} folds into {} outcomes", folds.len(), combined.len());
        Ok(combined)
    }

    /// Merge all fold logs and evaluate the combined result.
    pub fn evaluate_folds<P>(&self, paths: &[P]) -> Result<EvaluationReport>
    where
        P: AsRef<Path> + Sync,
    {
        let combined = self.combine_folds(paths)?;
        let source = paths
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        self.report(source, &combined)
    }

    fn parser(&self) -> OutcomeParser {
        OutcomeParser::new(self.config.learning_mode)
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.effective_num_threads())
            .build()
            .map_err(|e| EvaluationError::internal(format!("Failed to create thread pool: {}", e)))
    }

    fn dispatch(&self, collection: &OutcomeCollection) -> Result<(MetricMap, usize)> {
        let mode = learning_mode(collection)?;
        log::info!("Evaluating {} {} outcomes", collection.len(), mode);

        if mode == LearningMode::Regression {
            let gold = collection.gold_values();
            let predicted = collection.predicted_values();
            let metrics = metrics::regression_measures(&gold.view(), &predicted.view())?;
            return Ok((metrics, 1));
        }

        let resolved = ResolvedOutcomes::resolve(collection);
        let metrics = match mode {
            LearningMode::SingleLabel => self.single_label(&resolved)?,
            _ => self.multi_label(&resolved),
        };
        Ok((metrics, resolved.universe().len()))
    }

    fn single_label(&self, resolved: &ResolvedOutcomes<'_>) -> Result<MetricMap> {
        let matrix = ConfusionMatrix::from_resolved(resolved)?;
        let mut metrics = MetricMap::new();
        metrics.insert(ACCURACY.to_string(), metrics::accuracy(&matrix));

        if self.config.extended_measures {
            let tables = matrix.decompose();
            merge_into(&mut metrics, metrics::macro_measures(&tables));
            merge_into(&mut metrics, metrics::micro_measures(&tables));
            if self.config.per_label_measures {
                merge_into(&mut metrics, metrics::per_label_measures(&tables));
            }
        }
        Ok(metrics)
    }

    fn multi_label(&self, resolved: &ResolvedOutcomes<'_>) -> MetricMap {
        let tables = SmallContingencyTables::from_resolved(resolved);
        let large = LargeContingencyTable::from_resolved(resolved);

        let mut metrics = metrics::macro_measures(&tables);
        merge_into(&mut metrics, metrics::micro_measures(&tables));
        metrics.insert(SUBSET_ACCURACY.to_string(), metrics::subset_accuracy(&large));

        if self.config.extended_measures {
            metrics.insert(HAMMING_LOSS.to_string(), metrics::hamming_loss(&tables));
            metrics.insert(
                MULTILABEL_ACCURACY.to_string(),
                metrics::multilabel_accuracy(resolved),
            );
        }
        if self.config.per_label_measures {
            merge_into(&mut metrics, metrics::per_label_measures(&tables));
        }
        metrics
    }
}

/// Evaluate a collection with the default configuration.
pub fn evaluate(collection: &OutcomeCollection) -> Result<MetricMap> {
    Evaluator::default().evaluate(collection)
}

fn learning_mode(collection: &OutcomeCollection) -> Result<LearningMode> {
    collection
        .learning_mode()
        .ok_or_else(|| EvaluationError::mode("undefined (collection has no learning mode)"))
}

/// Last write wins.
fn merge_into(target: &mut MetricMap, source: MetricMap) {
    for (name, value) in source {
        if let Some(previous) = target.insert(name.clone(), value) {
            log::debug!("Metric '{}' overwritten ({} -> {})", name, previous, value);
        }
    }
}
