//! Weighted means of SPD matrix collections.
//!
//! Five metrics admit closed-form means; the Fisher, logdet-zero and
//! Wasserstein families require iterative fixed-point solvers. The solvers
//! own an internal iteration cap and never fail on non-convergence
//! themselves: they report the iteration count and final residual in a
//! [`MeanOutcome`], and the caller decides whether the residual is
//! acceptable.
//!
//! # Algorithms
//!
//! - Fisher (Karcher mean): P ← P^{1/2} exp(Σ wᵢ log(P^{-1/2} Cᵢ P^{-1/2})) P^{1/2},
//!   seeded with the log-Euclidean mean.
//! - LogDet zero: P ← (Σ wᵢ ((Cᵢ+P)/2)⁻¹)⁻¹, seeded with the arithmetic mean.
//! - Wasserstein: P ← P^{-1/2} (Σ wᵢ (P^{1/2} Cᵢ P^{1/2})^{1/2})² P^{-1/2},
//!   seeded with the arithmetic mean.
//!
//! The residual is the relative change ‖P_{k+1}−P_k‖_F / ‖P_k‖_F between
//! successive iterates, uniform across the three solvers.

use nalgebra::{DMatrix, DVector};
use num_traits::Float;
use spdlearn_core::{
    error::{GeometryError, GeometryResult},
    types::Scalar,
};

use crate::functions::{check_square, cholesky_lower, expm, invm, inv_sqrtm, logm, sqrtm, sym_part};
use crate::metric::Metric;

/// Internal iteration cap for the fixed-point solvers.
pub const MAX_MEAN_ITERATIONS: usize = 500;

/// Result of an iterative mean computation.
///
/// The candidate mean together with convergence diagnostics; callers that
/// only want the mean can discard the rest.
#[derive(Debug, Clone)]
pub struct MeanOutcome<T: Scalar> {
    /// The candidate mean.
    pub mean: DMatrix<T>,
    /// Number of fixed-point iterations performed.
    pub iterations: usize,
    /// Final relative change between the last two iterates.
    pub residual: T,
}

/// Checks a collection is non-empty with identical square dimensions,
/// returning the common dimension.
pub fn check_collection<T: Scalar>(matrices: &[DMatrix<T>]) -> GeometryResult<usize> {
    let first = matrices
        .first()
        .ok_or_else(|| GeometryError::empty_collection("mean"))?;
    let n = check_square(first)?;
    for m in &matrices[1..] {
        let k = check_square(m)?;
        if k != n {
            return Err(GeometryError::dimension_mismatch(
                format!("{}x{}", n, n),
                format!("{}x{}", k, k),
            ));
        }
    }
    Ok(n)
}

fn check_weight_len<T: Scalar>(weights: &DVector<T>, len: usize) -> GeometryResult<()> {
    if weights.len() != len {
        return Err(GeometryError::dimension_mismatch(
            format!("{} weights", len),
            format!("{} weights", weights.len()),
        ));
    }
    Ok(())
}

/// Weighted arithmetic mean Σ wᵢ Cᵢ.
fn arithmetic_mean<T: Scalar>(matrices: &[DMatrix<T>], weights: &DVector<T>, n: usize) -> DMatrix<T> {
    let mut acc = DMatrix::zeros(n, n);
    for (c, &w) in matrices.iter().zip(weights.iter()) {
        acc += c * w;
    }
    acc
}

/// Weighted harmonic mean (Σ wᵢ Cᵢ⁻¹)⁻¹.
fn harmonic_mean<T: Scalar>(
    matrices: &[DMatrix<T>],
    weights: &DVector<T>,
    n: usize,
) -> GeometryResult<DMatrix<T>> {
    let mut acc = DMatrix::zeros(n, n);
    for (c, &w) in matrices.iter().zip(weights.iter()) {
        acc += invm(c)? * w;
    }
    invm(&acc)
}

/// Weighted log-Euclidean mean exp(Σ wᵢ log Cᵢ).
fn log_euclidean_mean<T: Scalar>(
    matrices: &[DMatrix<T>],
    weights: &DVector<T>,
    n: usize,
) -> GeometryResult<DMatrix<T>> {
    let mut acc = DMatrix::zeros(n, n);
    for (c, &w) in matrices.iter().zip(weights.iter()) {
        acc += logm(c)? * w;
    }
    expm(&acc)
}

/// Computes the closed-form weighted mean under a non-iterative metric.
///
/// `weights` must already be normalized (see
/// [`crate::weights::normalize_weights`]).
///
/// # Errors
///
/// `InvalidParameter` when called with an iterative metric;
/// `EmptyCollection` / `DimensionMismatch` on malformed input.
pub fn closed_form_mean<T: Scalar>(
    metric: Metric,
    matrices: &[DMatrix<T>],
    weights: &DVector<T>,
) -> GeometryResult<DMatrix<T>> {
    let n = check_collection(matrices)?;
    check_weight_len(weights, matrices.len())?;

    match metric {
        Metric::Euclidean => Ok(arithmetic_mean(matrices, weights, n)),
        Metric::InvEuclidean => harmonic_mean(matrices, weights, n),
        Metric::ChoEuclidean => {
            // Mean of lower Cholesky factors, squared back onto the cone.
            let mut acc = DMatrix::zeros(n, n);
            for (c, &w) in matrices.iter().zip(weights.iter()) {
                acc += cholesky_lower(c)? * w;
            }
            Ok(&acc * acc.transpose())
        }
        Metric::LogEuclidean => log_euclidean_mean(matrices, weights, n),
        Metric::Jeffrey => {
            // Geodesic midpoint of the arithmetic mean A and harmonic mean
            // H: A^{1/2} (A^{-1/2} H A^{-1/2})^{1/2} A^{1/2}.
            let a = arithmetic_mean(matrices, weights, n);
            let h = harmonic_mean(matrices, weights, n)?;
            let a_sqrt = sqrtm(&a)?;
            let a_isqrt = inv_sqrtm(&a)?;
            let whitened = &a_isqrt * h * &a_isqrt;
            let root = sqrtm(&whitened)?;
            Ok(sym_part(&(&a_sqrt * root * &a_sqrt)))
        }
        Metric::Fisher | Metric::LogDet0 | Metric::Wasserstein => {
            Err(GeometryError::invalid_parameter(format!(
                "{} mean is iterative; call iterative_mean",
                metric
            )))
        }
    }
}

/// Drives a fixed-point map until the relative change drops below
/// `tolerance` or the internal cap is reached.
fn fixed_point<T, F>(mut p: DMatrix<T>, tolerance: T, step: F) -> GeometryResult<MeanOutcome<T>>
where
    T: Scalar,
    F: Fn(&DMatrix<T>) -> GeometryResult<DMatrix<T>>,
{
    let mut iterations = 0;
    let mut residual = T::infinity();
    while iterations < MAX_MEAN_ITERATIONS {
        let next = sym_part(&step(&p)?);
        iterations += 1;
        let denom = p.norm();
        residual = if denom > T::zero() {
            (&next - &p).norm() / denom
        } else {
            (&next - &p).norm()
        };
        p = next;
        if residual <= tolerance {
            break;
        }
    }
    Ok(MeanOutcome {
        mean: p,
        iterations,
        residual,
    })
}

/// Computes the weighted mean under an iterative metric.
///
/// `weights` must already be normalized. The solver stops when the
/// relative change between iterates drops to `tolerance`, or after
/// [`MAX_MEAN_ITERATIONS`] steps; in the latter case the returned
/// [`MeanOutcome::residual`] exceeds the tolerance and the caller decides
/// how to react. A single-matrix collection short-circuits to a copy of
/// that matrix.
///
/// # Errors
///
/// `InvalidParameter` when called with a closed-form metric;
/// `EmptyCollection` / `DimensionMismatch` / `NotPositiveDefinite` on
/// malformed input.
pub fn iterative_mean<T: Scalar>(
    metric: Metric,
    matrices: &[DMatrix<T>],
    weights: &DVector<T>,
    tolerance: T,
) -> GeometryResult<MeanOutcome<T>> {
    let n = check_collection(matrices)?;
    check_weight_len(weights, matrices.len())?;
    if tolerance <= T::zero() {
        return Err(GeometryError::invalid_parameter(
            "tolerance must be positive",
        ));
    }

    if matrices.len() == 1 {
        return Ok(MeanOutcome {
            mean: matrices[0].clone(),
            iterations: 0,
            residual: T::zero(),
        });
    }

    match metric {
        Metric::Fisher => {
            let seed = log_euclidean_mean(matrices, weights, n)?;
            fixed_point(seed, tolerance, |p| {
                let p_sqrt = sqrtm(p)?;
                let p_isqrt = inv_sqrtm(p)?;
                let mut tangent = DMatrix::zeros(n, n);
                for (c, &w) in matrices.iter().zip(weights.iter()) {
                    let whitened = &p_isqrt * c * &p_isqrt;
                    tangent += logm(&whitened)? * w;
                }
                Ok(&p_sqrt * expm(&tangent)? * &p_sqrt)
            })
        }
        Metric::LogDet0 => {
            let seed = arithmetic_mean(matrices, weights, n);
            let half = <T as Scalar>::from_f64(0.5);
            fixed_point(seed, tolerance, |p| {
                let mut acc = DMatrix::zeros(n, n);
                for (c, &w) in matrices.iter().zip(weights.iter()) {
                    let resolvent = invm(&((c + p) * half))?;
                    acc += resolvent * w;
                }
                invm(&acc)
            })
        }
        Metric::Wasserstein => {
            let seed = arithmetic_mean(matrices, weights, n);
            fixed_point(seed, tolerance, |p| {
                let p_sqrt = sqrtm(p)?;
                let p_isqrt = inv_sqrtm(p)?;
                let mut acc = DMatrix::zeros(n, n);
                for (c, &w) in matrices.iter().zip(weights.iter()) {
                    let inner = &p_sqrt * c * &p_sqrt;
                    acc += sqrtm(&inner)? * w;
                }
                let squared = &acc * &acc;
                Ok(&p_isqrt * squared * &p_isqrt)
            })
        }
        _ => Err(GeometryError::invalid_parameter(format!(
            "{} mean has a closed form; call closed_form_mean",
            metric
        ))),
    }
}

/// Scalar geometric mean exp(mean of ln vᵢ).
///
/// This is the scalar special case of the Fisher mean, kept as an explicit
/// helper; the classifier's discriminant (`functions`) output divides each
/// squared-distance column by it.
///
/// # Errors
///
/// `EmptyCollection` for empty input, `InvalidParameter` for non-positive
/// values.
pub fn geometric_mean<T: Scalar>(values: &[T]) -> GeometryResult<T> {
    if values.is_empty() {
        return Err(GeometryError::empty_collection("geometric mean"));
    }
    let mut acc = T::zero();
    for &v in values {
        if v <= T::zero() {
            return Err(GeometryError::invalid_parameter(format!(
                "geometric mean requires positive values, got {}",
                v
            )));
        }
        acc += <T as Float>::ln(v);
    }
    Ok(<T as Float>::exp(acc / <T as Scalar>::from_usize(values.len())))
}
