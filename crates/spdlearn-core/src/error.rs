//! Error types for manifold primitives and the MDM classifier.
//!
//! This module defines the error taxonomy used throughout the library:
//! geometry-level failures from the SPD primitives, and classifier-level
//! failures from fitting, prediction and cross-validation.

use thiserror::Error;

/// Errors that can occur inside the SPD manifold primitives.
#[derive(Debug, Clone, Error)]
pub enum GeometryError {
    /// Dimension mismatch between matrices.
    ///
    /// This error occurs when an operation involves matrices with
    /// incompatible dimensions, or a non-square matrix where a square
    /// one is required.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A matrix is not symmetric positive definite.
    ///
    /// Manifold operations are only well-defined on the SPD cone; inputs
    /// with non-positive eigenvalues surface this error.
    #[error("Matrix is not positive definite: {reason}")]
    NotPositiveDefinite {
        /// Description of the violation
        reason: String,
    },

    /// An operation received an empty matrix collection.
    #[error("Empty matrix collection: {operation} requires at least one matrix")]
    EmptyCollection {
        /// Name of the operation that failed
        operation: String,
    },

    /// An argument is outside its valid range.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the invalid parameter
        reason: String,
    },

    /// Numerical instability detected.
    ///
    /// This error occurs when a numerical operation fails, such as the
    /// inversion of a near-singular matrix.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl GeometryError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NotPositiveDefinite error with a custom reason.
    pub fn not_positive_definite<S: Into<String>>(reason: S) -> Self {
        Self::NotPositiveDefinite {
            reason: reason.into(),
        }
    }

    /// Create an EmptyCollection error for a named operation.
    pub fn empty_collection<S: Into<String>>(operation: S) -> Self {
        Self::EmptyCollection {
            operation: operation.into(),
        }
    }

    /// Create an InvalidParameter error with a custom reason.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur in the MDM classifier and its cross-validation
/// engine.
#[derive(Debug, Clone, Error)]
pub enum ClassifyError {
    /// Training data and labels have different lengths, or matrices within
    /// a collection have different dimensions.
    ///
    /// The failing call is aborted with no partial state constructed.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// An iterative mean failed to reach the requested tolerance.
    ///
    /// Only the offending mean computation is aborted; the caller decides
    /// whether to retry with a relaxed tolerance or propagate the failure.
    #[error(
        "{metric} mean did not converge: residual {residual:.3e} after {iterations} iterations \
         exceeds the {tolerance_origin} tolerance {tolerance:.3e}; retry with a larger tolerance"
    )]
    Convergence {
        /// Human name of the metric whose mean failed
        metric: String,
        /// Iterations performed before the solver's internal cap
        iterations: usize,
        /// Final relative residual
        residual: f64,
        /// Effective tolerance the residual was compared against
        tolerance: f64,
        /// Either "default" or "user-chosen"
        tolerance_origin: &'static str,
    },

    /// An argument is outside its valid range (zero labels, degenerate
    /// fold counts, empty training sets).
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid argument
        reason: String,
    },

    /// Propagated geometry error from the manifold primitives.
    #[error("Manifold operation failed: {0}")]
    Geometry(#[from] GeometryError),
}

impl ClassifyError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a Convergence error with full diagnostic context.
    pub fn convergence<S: Into<String>>(
        metric: S,
        iterations: usize,
        residual: f64,
        tolerance: f64,
        default_tolerance: bool,
    ) -> Self {
        Self::Convergence {
            metric: metric.into(),
            iterations,
            residual,
            tolerance,
            tolerance_origin: if default_tolerance {
                "default"
            } else {
                "user-chosen"
            },
        }
    }

    /// Create an InvalidArgument error with a custom reason.
    pub fn invalid_argument<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce GeometryError.
pub type GeometryResult<T> = std::result::Result<T, GeometryError>;

/// Result type alias for classifier operations.
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;
