//! Error handling and error types for classeval.
//!
//! Every scorer is a deterministic computation over an immutable prediction
//! store, so errors here are caller configuration mistakes: an out-of-range
//! class index, a store with the wrong number of classes for the requested
//! operation, or a mismatched learner count. Numeric degeneracy (a fold
//! with no positive instances, a zero denominator) is not an error and is
//! resolved to a sentinel value by the scorers themselves.

use std::io;
use thiserror::Error;

/// Main error type for the classeval library.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// What is misconfigured
        message: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Offending value
        value: String,
        /// Constraint the value violates
        reason: String,
    },

    /// A class index outside `[0, num_classes)`
    #[error("Class index {index} out of range for {num_classes} classes")]
    ClassIndexOutOfRange {
        /// Requested class index
        index: usize,
        /// Number of class values in the store
        num_classes: usize,
    },

    /// The store has the wrong number of classes for the requested operation
    #[error("Class cardinality mismatch: expected {expected}, got {actual}")]
    ClassCardinality {
        /// Required class count, e.g. "exactly 2 classes"
        expected: String,
        /// Class count of the store
        actual: usize,
    },

    /// Per-record learner count does not match the store's classifier list
    #[error("Learner count mismatch: expected {expected}, got {actual}")]
    LearnerCountMismatch {
        /// Classifiers named by the store
        expected: usize,
        /// Predictions found
        actual: usize,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected shape
        expected: String,
        /// Shape found
        actual: String,
    },

    /// Scoring requested on a store without any records
    #[error("Test results contain no records")]
    EmptyResults,

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        /// Underlying serde_json error
        #[from]
        source: serde_json::Error,
    },

    /// TOML (de)serialization errors
    #[error("TOML error: {message}")]
    Toml {
        /// Parser or serializer message
        message: String,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

/// Type alias for Results using EvalError
pub type Result<T> = std::result::Result<T, EvalError>;

impl EvalError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        EvalError::Config {
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
        EvalError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a class index error
    pub fn class_index_out_of_range(index: usize, num_classes: usize) -> Self {
        EvalError::ClassIndexOutOfRange { index, num_classes }
    }

    /// Create a class cardinality error
    pub fn class_cardinality<E: Into<String>>(expected: E, actual: usize) -> Self {
        EvalError::ClassCardinality {
            expected: expected.into(),
            actual,
        }
    }

    /// Create a learner count error
    pub fn learner_count_mismatch(expected: usize, actual: usize) -> Self {
        EvalError::LearnerCountMismatch { expected, actual }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        EvalError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a TOML error
    pub fn toml<S: Into<String>>(message: S) -> Self {
        EvalError::Toml {
            message: message.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        EvalError::Internal {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the configuration class: the call was
    /// made with arguments or a store shape that cannot yield a meaningful score.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EvalError::Config { .. }
                | EvalError::InvalidParameter { .. }
                | EvalError::ClassIndexOutOfRange { .. }
                | EvalError::ClassCardinality { .. }
                | EvalError::LearnerCountMismatch { .. }
                | EvalError::DimensionMismatch { .. }
                | EvalError::EmptyResults
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            EvalError::Config { .. } => "config",
            EvalError::InvalidParameter { .. } => "invalid_parameter",
            EvalError::ClassIndexOutOfRange { .. } => "class_index_out_of_range",
            EvalError::ClassCardinality { .. } => "class_cardinality",
            EvalError::LearnerCountMismatch { .. } => "learner_count_mismatch",
            EvalError::DimensionMismatch { .. } => "dimension_mismatch",
            EvalError::EmptyResults => "empty_results",
            EvalError::Io { .. } => "io",
            EvalError::Json { .. } => "json",
            EvalError::Toml { .. } => "toml",
            EvalError::Internal { .. } => "internal",
        }
    }
}

impl From<toml::de::Error> for EvalError {
    fn from(err: toml::de::Error) -> Self {
        EvalError::toml(err.to_string())
    }
}

impl From<toml::ser::Error> for EvalError {
    fn from(err: toml::ser::Error) -> Self {
        EvalError::toml(err.to_string())
    }
}

/// Convenience macro for configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::EvalError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::EvalError::config(format!($fmt, $($arg)*))
    };
}

/// Return early with the given error when the condition does not hold.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EvalError::config("test configuration error");
        assert_eq!(err.category(), "config");
        assert!(err.is_configuration_error());

        let err = EvalError::internal("boom");
        assert_eq!(err.category(), "internal");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_error_macros() {
        let err = config_error!("test error");
        assert!(matches!(err, EvalError::Config { .. }));

        let err = config_error!("bad class {}", 7);
        assert!(err.to_string().contains("bad class 7"));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(n: usize) -> Result<usize> {
            ensure!(n >= 2, EvalError::class_cardinality("at least 2", n));
            Ok(n)
        }
        assert!(check(3).is_ok());
        assert!(matches!(
            check(1),
            Err(EvalError::ClassCardinality { actual: 1, .. })
        ));
    }

    #[test]
    fn test_class_index_error_display() {
        let err = EvalError::class_index_out_of_range(5, 3);
        let error_string = format!("{}", err);
        assert!(error_string.contains("5"));
        assert!(error_string.contains("3 classes"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: EvalError = io_err.into();
        assert!(matches!(err, EvalError::Io { .. }));
        assert_eq!(err.category(), "io");
        assert!(!err.is_configuration_error());
    }
}
