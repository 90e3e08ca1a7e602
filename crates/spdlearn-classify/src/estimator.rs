//! Mean estimation with tolerance enforcement.
//!
//! Thin wrapper over the geometry solvers: closed-form metrics delegate
//! directly; iterative metrics run the fixed-point solver and the residual
//! it reports is judged against the effective tolerance here. The
//! iteration/residual diagnostics are discarded on success.

use nalgebra::DMatrix;
use spdlearn_core::{
    error::{ClassifyError, ClassifyResult},
    types::Scalar,
};
use spdlearn_geometry::{closed_form_mean, iterative_mean, normalize_weights, Metric};

/// Resolves the effective tolerance: the user's choice when positive,
/// otherwise √machine-epsilon of `T`. Returns the tolerance and whether
/// the default was used.
pub(crate) fn effective_tolerance<T: Scalar>(tolerance: Option<T>) -> (T, bool) {
    match tolerance {
        Some(t) if t > T::zero() => (t, false),
        _ => (T::default_tolerance(), true),
    }
}

/// Computes the weighted mean of a collection under `metric`.
///
/// Weights default to uniform; with `check_weights` set they are
/// validated and normalized to sum 1 before use. `tolerance` applies only
/// to iterative metrics and defaults to √machine-epsilon when `None` or
/// zero.
///
/// # Errors
///
/// [`ClassifyError::Convergence`] when an iterative solver's residual
/// exceeds the effective tolerance at its internal iteration cap; geometry
/// errors propagate for malformed input.
pub fn compute_mean<T: Scalar>(
    metric: Metric,
    matrices: &[DMatrix<T>],
    weights: Option<&[T]>,
    check_weights: bool,
    tolerance: Option<T>,
) -> ClassifyResult<DMatrix<T>> {
    let w = normalize_weights(weights, matrices.len(), check_weights)?;

    if !metric.is_iterative() {
        return Ok(closed_form_mean(metric, matrices, &w)?);
    }

    let (tol, default_used) = effective_tolerance(tolerance);
    let outcome = iterative_mean(metric, matrices, &w, tol)?;
    check_convergence(metric, outcome, tol, default_used)
}

/// Judges an iterative solver's outcome against the effective tolerance,
/// unwrapping the mean on success.
fn check_convergence<T: Scalar>(
    metric: Metric,
    outcome: spdlearn_geometry::MeanOutcome<T>,
    tolerance: T,
    default_used: bool,
) -> ClassifyResult<DMatrix<T>> {
    if outcome.residual > tolerance {
        return Err(ClassifyError::convergence(
            metric.to_string(),
            outcome.iterations,
            outcome.residual.to_f64(),
            tolerance.to_f64(),
            default_used,
        ));
    }
    Ok(outcome.mean)
}
