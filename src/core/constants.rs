//! Format constants and metric names.

/// Separates prediction, gold standard and threshold in a data line.
pub const FIELD_SEPARATOR: char = ';';

/// Separates the per-label values of a multi-label field.
pub const VALUE_SEPARATOR: char = ',';

/// Separates the instance identifier from the evaluation data.
pub const ID_SEPARATOR: char = '=';

/// Prefix of the header line declaring the label mapping.
pub const LABELS_HEADER: &str = "#labels";

/// Prefix of comment lines.
pub const COMMENT_PREFIX: char = '#';

/// First line written on top of every outcome log.
pub const FORMAT_HEADER: &str = "#ID=PREDICTION;GOLDSTANDARD;THRESHOLD";

/// Threshold sentinel for records serialized without a threshold field.
pub const NO_THRESHOLD: f64 = -1.0;

/// Reserved label combination for "no label meets the threshold".
pub const EMPTY_PREDICTION: &str = "$NO_PREDICTION$";

/// Label name carried by regression records.
pub const REGRESSION_TARGET: &str = "$TARGET$";

/// Separator between the encoded labels of a label combination.
pub const COMBINATION_SEPARATOR: char = ',';

/// Version of this library
pub const TC_EVALUATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TC_EVAL_";

// Metric names
/// Single-label accuracy
pub const ACCURACY: &str = "Accuracy";
/// Macro-averaged precision
pub const MACRO_PRECISION: &str = "Macro Precision";
/// Macro-averaged recall
pub const MACRO_RECALL: &str = "Macro Recall";
/// Macro-averaged F1
pub const MACRO_FMEASURE: &str = "Macro FMeasure";
/// Micro-averaged precision
pub const MICRO_PRECISION: &str = "Micro Precision";
/// Micro-averaged recall
pub const MICRO_RECALL: &str = "Micro Recall";
/// Micro-averaged F1
pub const MICRO_FMEASURE: &str = "Micro FMeasure";
/// Exact-match ratio over label combinations
pub const SUBSET_ACCURACY: &str = "Subset Accuracy";
/// Fraction of mismatched label slots
pub const HAMMING_LOSS: &str = "Hamming Loss";
/// Mean Jaccard overlap between gold and predicted label sets
pub const MULTILABEL_ACCURACY: &str = "Multilabel Accuracy";
/// Pearson product-moment correlation
pub const PEARSON_CORRELATION: &str = "Pearson Correlation";
/// Spearman rank correlation
pub const SPEARMAN_CORRELATION: &str = "Spearman Correlation";
/// Mean squared error
pub const MEAN_SQUARED_ERROR: &str = "Mean Squared Error";
/// Mean absolute error
pub const MEAN_ABSOLUTE_ERROR: &str = "Mean Absolute Error";

/// Prefix of per-label precision entries
pub const PRECISION_PREFIX: &str = "Precision";
/// Prefix of per-label recall entries
pub const RECALL_PREFIX: &str = "Recall";
/// Prefix of per-label F1 entries
pub const FMEASURE_PREFIX: &str = "FMeasure";
