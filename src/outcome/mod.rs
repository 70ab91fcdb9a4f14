//! Outcome records, collections and the outcome log format.
//!
//! ```rust
//! use tc_evaluation::outcome::OutcomeParser;
//! use tc_evaluation::LearningMode;
//!
//! let log = "#labels 0=A 1=B\nd1=0;0\nd2=1;0\n";
//! let collection = OutcomeParser::new(LearningMode::SingleLabel).parse_str(log)?;
//! assert_eq!(collection.len(), 2);
//! # Ok::<(), tc_evaluation::EvaluationError>(())
//! ```

pub mod collection;
pub mod parser;
pub mod record;
pub mod writer;

pub use collection::OutcomeCollection;
pub use parser::{parse, parse_file, LabelHeader, OutcomeParser};
pub use record::OutcomeRecord;
pub use writer::{homogenize, write_outcomes, write_outcomes_file};
