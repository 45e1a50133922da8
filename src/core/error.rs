//! Error handling and error types for Pure Rust CART.
//!
//! This module provides comprehensive error handling using Rust's Result
//! type system. Input validation failures are reported eagerly at the start
//! of `fit` and never leave a partially built tree behind; per-node
//! degeneracies (no valid split, leaf-size constraints) are not errors and
//! are handled by the builders directly.

use std::io;
use thiserror::Error;

/// Main error type for the CART library.
#[derive(Error, Debug)]
pub enum CartError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Dataset-related errors (empty input, malformed targets)
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Row-count mismatch between the feature matrix and the target vector
    #[error("Data dimension mismatch: {message}")]
    DataDimensionMismatch { message: String },

    /// Generic dimension mismatch (e.g. sample weight length)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Invalid hyperparameter values
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Tree construction errors
    #[error("Tree construction error: {message}")]
    TreeConstruction { message: String },

    /// Prediction errors
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// Operation requires a fitted model
    #[error("Model is not fitted: {operation} requires a successful fit() first")]
    NotFitted { operation: String },

    /// Model serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Bincode serialization errors
    #[error("Bincode error: {source}")]
    Bincode {
        #[from]
        source: bincode::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using CartError
pub type Result<T> = std::result::Result<T, CartError>;

impl CartError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        CartError::Config {
            message: message.into(),
        }
    }

    /// Create a dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        CartError::Dataset {
            message: message.into(),
        }
    }

    /// Create a data dimension mismatch error
    pub fn data_dimension_mismatch<S: Into<String>>(message: S) -> Self {
        CartError::DataDimensionMismatch {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        CartError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        CartError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a tree construction error
    pub fn tree_construction<S: Into<String>>(message: S) -> Self {
        CartError::TreeConstruction {
            message: message.into(),
        }
    }

    /// Create a prediction error
    pub fn prediction<S: Into<String>>(message: S) -> Self {
        CartError::Prediction {
            message: message.into(),
        }
    }

    /// Create a not-fitted error
    pub fn not_fitted<S: Into<String>>(operation: S) -> Self {
        CartError::NotFitted {
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        CartError::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        CartError::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable by adjusting the inputs
    pub fn is_recoverable(&self) -> bool {
        match self {
            CartError::Config { .. } => false,
            CartError::Dataset { .. } => false,
            CartError::DataDimensionMismatch { .. } => false,
            CartError::DimensionMismatch { .. } => false,
            CartError::InvalidParameter { .. } => false,
            CartError::TreeConstruction { .. } => true,
            CartError::Prediction { .. } => true,
            CartError::NotFitted { .. } => true,
            CartError::Serialization { .. } => false,
            CartError::Io { .. } => false,
            CartError::Json { .. } => false,
            CartError::Bincode { .. } => false,
            CartError::Internal { .. } => false,
        }
    }

    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            CartError::Config { .. } => "config",
            CartError::Dataset { .. } => "dataset",
            CartError::DataDimensionMismatch { .. } => "data_dimension_mismatch",
            CartError::DimensionMismatch { .. } => "dimension_mismatch",
            CartError::InvalidParameter { .. } => "invalid_parameter",
            CartError::TreeConstruction { .. } => "tree_construction",
            CartError::Prediction { .. } => "prediction",
            CartError::NotFitted { .. } => "not_fitted",
            CartError::Serialization { .. } => "serialization",
            CartError::Io { .. } => "io",
            CartError::Json { .. } => "json",
            CartError::Bincode { .. } => "bincode",
            CartError::Internal { .. } => "internal",
        }
    }
}

/// Creates a [`CartError::Config`] with an optional format string.
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::CartError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::CartError::config(format!($fmt, $($arg)*))
    };
}

/// Creates a [`CartError::Dataset`] with an optional format string.
#[macro_export]
macro_rules! dataset_error {
    ($msg:expr) => {
        $crate::core::error::CartError::dataset($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::CartError::dataset(format!($fmt, $($arg)*))
    };
}

/// Returns early with the given error when the condition does not hold.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
