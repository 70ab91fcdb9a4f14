//! Error handling and error types for the evaluation engine.
//!
//! Every failure the engine can raise is a variant of [`EvaluationError`].
//! Errors are always returned to the immediate caller; the engine never
//! retries and never hands back partial metric maps.

use std::io;
use thiserror::Error;

/// Main error type for the evaluation library.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Malformed outcome log: missing `#labels` header, unparsable numeric
    /// field, inconsistent vector lengths or an empty log.
    #[error("Format error: {message}")]
    Format {
        /// What was malformed, with line or file context
        message: String,
    },

    /// Two collections with different learning modes were merged.
    #[error("Learning modes do not match: expected {expected}, got {actual}")]
    ModeMismatch {
        /// Mode of the receiving collection
        expected: String,
        /// Mode of the collection being merged in
        actual: String,
    },

    /// Unknown or unsupported learning mode.
    #[error("Unsupported learning mode: {mode}")]
    Mode {
        /// The offending mode value
        mode: String,
    },

    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected shape
        expected: String,
        /// Actual shape
        actual: String,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        /// Underlying error
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        /// Underlying error
        #[from]
        source: serde_json::Error,
    },

    /// Bincode serialization errors
    #[error("Bincode error: {source}")]
    Bincode {
        /// Underlying error
        #[from]
        source: bincode::Error,
    },

    /// CSV writing errors
    #[cfg(feature = "csv")]
    #[error("CSV error: {source}")]
    Csv {
        /// Underlying error
        #[from]
        source: csv::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {source}")]
    Toml {
        /// Underlying error
        #[from]
        source: toml::de::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

/// Type alias for Results using EvaluationError
pub type Result<T> = std::result::Result<T, EvaluationError>;

impl EvaluationError {
    /// Create a format error
    pub fn format<S: Into<String>>(message: S) -> Self {
        EvaluationError::Format {
            message: message.into(),
        }
    }

    /// Create a mode mismatch error
    pub fn mode_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        EvaluationError::ModeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an unsupported learning mode error
    pub fn mode<S: Into<String>>(mode: S) -> Self {
        EvaluationError::Mode { mode: mode.into() }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        EvaluationError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        EvaluationError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        EvaluationError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        EvaluationError::Internal {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            EvaluationError::Format { .. } => "format",
            EvaluationError::ModeMismatch { .. } => "mode_mismatch",
            EvaluationError::Mode { .. } => "mode",
            EvaluationError::Config { .. } => "config",
            EvaluationError::InvalidParameter { .. } => "invalid_parameter",
            EvaluationError::DimensionMismatch { .. } => "dimension_mismatch",
            EvaluationError::Io { .. } => "io",
            EvaluationError::Json { .. } => "json",
            EvaluationError::Bincode { .. } => "bincode",
            #[cfg(feature = "csv")]
            EvaluationError::Csv { .. } => "csv",
            EvaluationError::Toml { .. } => "toml",
            EvaluationError::Internal { .. } => "internal",
        }
    }

    /// Whether the error describes corrupted or inconsistent input data, as
    /// opposed to an environment or configuration problem.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            EvaluationError::Format { .. }
                | EvaluationError::ModeMismatch { .. }
                | EvaluationError::DimensionMismatch { .. }
        )
    }
}

/// Convenience macro for format errors
#[macro_export]
macro_rules! format_error {
    ($msg:expr) => {
        $crate::core::error::EvaluationError::format($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::EvaluationError::format(format!($fmt, $($arg)*))
    };
}

/// Return early with `$err` unless `$cond` holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
