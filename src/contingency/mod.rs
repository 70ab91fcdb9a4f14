//! Contingency table engine.
//!
//! - [`small`]: per-label `tp/fp/tn/fn` counts and their combined (micro) sum
//! - [`large`]: multi-label gold × predicted label-combination counts
//! - [`confusion`]: single-label gold × predicted matrix

pub mod confusion;
pub mod large;
pub mod small;

pub use confusion::ConfusionMatrix;
pub use large::{label_combination, record_combinations, CombinationArena, LargeContingencyTable};
pub use small::{SmallContingencyTable, SmallContingencyTables};
