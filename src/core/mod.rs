//! Core infrastructure module for the evaluation engine.
//!
//! # Organization
//!
//! - [`types`]: learning modes, raw outcome values, metric maps
//! - [`constants`]: outcome log format constants and metric names
//! - [`error`]: error handling and error types
//! - [`encoding`]: label name encoding used in headers and label combinations
//!
//! ```rust
//! use tc_evaluation::core::{
//!     types::{LearningMode, OutcomeValue},
//!     constants::EMPTY_PREDICTION,
//!     error::{Result, EvaluationError},
//! };
//!
//! let mode: LearningMode = "multiLabel".parse()?;
//! assert_eq!(mode, LearningMode::MultiLabel);
//! assert_eq!(OutcomeValue::parse("true").to_f64()?, 1.0);
//! assert!(EMPTY_PREDICTION.starts_with('$'));
//! # Ok::<(), EvaluationError>(())
//! ```

pub mod constants;
pub mod encoding;
pub mod error;
pub mod types;

pub use constants::*;
pub use encoding::{decode_label, encode_label};
pub use error::{EvaluationError, Result};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static LOGGING_INIT: Once = Once::new();
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the `env_logger` backend once per process.
///
/// `RUST_LOG` is honoured when set; otherwise the level defaults to `info`.
pub fn initialize_core() -> Result<()> {
    LOGGING_INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        // Another logger may already be installed by the host application.
        let _ = env_logger::Builder::from_env(env).try_init();
        INITIALIZED.store(true, Ordering::SeqCst);
        log::debug!("tc-evaluation {} initialized", TC_EVALUATION_VERSION);
    });
    Ok(())
}

/// Check if the core module is initialized
pub fn is_core_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}
