//! # TC Evaluation
//!
//! Evaluation engine for text-classification experiment results.
//!
//! Learners serialize one line per classified instance into an *outcome
//! log*. This crate parses those logs, merges the logs of several
//! cross-validation folds, reconciles their label sets into one global
//! label universe, builds contingency tables, and computes the standard
//! measures of each learning mode.
//!
//! ## Features
//!
//! - **Single-label**: accuracy, plus confusion-matrix based one-vs-rest
//!   precision/recall/F1 on request.
//! - **Multi-label**: macro and micro precision/recall/F1 and subset
//!   accuracy, plus Hamming loss and Jaccard accuracy on request.
//! - **Regression**: Pearson and Spearman correlation, mean squared and
//!   mean absolute error.
//! - **Batch evaluation**: many logs evaluated in parallel with Rayon.
//! - **Reports**: JSON, CSV and plain-text rendering.
//!
//! ## Quick Start
//!
//! ```rust
//! use tc_evaluation::{evaluate, LearningMode, OutcomeParser};
//!
//! # fn main() -> tc_evaluation::Result<()> {
//! let log = "#ID=PREDICTION;GOLDSTANDARD;THRESHOLD\n\
//!            #labels 0=X 1=Y\n\
//!            doc1=1,0;1,0;0.5\n\
//!            doc2=1,1;0,1;0.5\n";
//!
//! let collection = OutcomeParser::new(LearningMode::MultiLabel).parse_str(log)?;
//! let metrics = evaluate(&collection)?;
//!
//! assert_eq!(metrics["Subset Accuracy"], 0.5);
//! # Ok(())
//! # }
//! ```
//!
//! ### Combining folds
//!
//! ```rust,no_run
//! use tc_evaluation::{ConfigBuilder, Evaluator, LearningMode, OutputFormat};
//!
//! # fn main() -> tc_evaluation::Result<()> {
//! let config = ConfigBuilder::new()
//!     .learning_mode(LearningMode::MultiLabel)
//!     .extended_measures(true)
//!     .build()?;
//!
//! let evaluator = Evaluator::new(config);
//! let report = evaluator.evaluate_folds(&["fold0.txt", "fold1.txt", "fold2.txt"])?;
//! println!("{}", report.render(OutputFormat::Text, 4)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error type, learning modes, format constants, label encoding
//! - [`config`]: evaluation configuration, builder, file and environment loading
//! - [`outcome`]: outcome records and collections, log parser and writer
//! - [`universe`]: global label universe and per-record label mappings
//! - [`contingency`]: per-label, label-combination and confusion tables
//! - [`metrics`]: measure calculators
//! - [`evaluator`]: mode dispatch, batch and fold evaluation
//! - [`report`]: evaluation reports

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Outcome log model and I/O
pub mod outcome;

// Label universe resolution
pub mod universe;

// Contingency table engine
pub mod contingency;

// Metric calculators
pub mod metrics;

// Dispatcher
pub mod evaluator;

// Reports
pub mod report;

pub use self::core::{
    error::{EvaluationError, Result},
    types::{LabelIndex, LearningMode, MetricMap, OutcomeValue, OutputFormat},
};

pub use config::{ConfigBuilder, ConfigManager, EvaluationConfig};

pub use outcome::{
    homogenize, parse, parse_file, write_outcomes, write_outcomes_file, LabelHeader,
    OutcomeCollection, OutcomeParser, OutcomeRecord,
};

pub use universe::{LabelMapping, LabelUniverse, ResolvedOutcomes};

pub use contingency::{
    ConfusionMatrix, LargeContingencyTable, SmallContingencyTable, SmallContingencyTables,
};

pub use evaluator::{evaluate, Evaluator};

pub use report::{render_reports, EvaluationReport};

pub use self::core::constants::TC_EVALUATION_VERSION as VERSION;

/// Merge two collections into a new one.
///
/// Fails with [`EvaluationError::ModeMismatch`] if their learning modes
/// differ; neither input is modified.
pub fn merge(first: &OutcomeCollection, second: &OutcomeCollection) -> Result<OutcomeCollection> {
    OutcomeCollection::merge(first, second)
}

/// Initialize logging.
///
/// Installs the `env_logger` backend once per process; `RUST_LOG` is
/// honoured and defaults to `info`. Calling it is optional.
///
/// # Examples
///
/// ```rust
/// fn main() -> tc_evaluation::Result<()> {
///     tc_evaluation::init()?;
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    self::core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    self::core::is_core_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_initialization() {
        assert!(init().is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .learning_mode(LearningMode::Regression)
            .per_label_measures(true)
            .build()
            .unwrap();

        assert_eq!(config.learning_mode, LearningMode::Regression);
        assert!(config.per_label_measures);
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_integration() {
        let err = EvaluationError::format("test error");
        assert_eq!(err.category(), "format");
        assert!(err.is_data_error());
    }

    #[test]
    fn test_merge_entry_point() {
        let a = OutcomeParser::new(LearningMode::SingleLabel)
            .parse_str("#labels 0=A 1=B\nd1=0;0\n")
            .unwrap();
        let b = OutcomeParser::new(LearningMode::SingleLabel)
            .parse_str("#labels 0=B 1=C\nd2=0;1\n")
            .unwrap();
        let merged = merge(&a, &b).unwrap();
        assert_eq!(merged.len(), 2);

        let universe = LabelUniverse::from_collection(&merged);
        assert_eq!(universe.labels(), &["A", "B", "C"]);
    }
}
