//! Symmetric matrix functions on the SPD cone.
//!
//! All functions here act through the eigendecomposition of a symmetric
//! matrix: for P = V Λ V^T, f(P) = V f(Λ) V^T with f applied entrywise to
//! the eigenvalues. Non-positive eigenvalues make the maps below undefined
//! and surface as `NotPositiveDefinite`.

use nalgebra::{DMatrix, DVector};
use num_traits::Float;
use spdlearn_core::{
    error::{GeometryError, GeometryResult},
    types::Scalar,
};

/// Checks that a matrix is square, returning its dimension.
pub fn check_square<T: Scalar>(m: &DMatrix<T>) -> GeometryResult<usize> {
    if m.nrows() != m.ncols() {
        return Err(GeometryError::dimension_mismatch(
            "square matrix",
            format!("{}x{}", m.nrows(), m.ncols()),
        ));
    }
    Ok(m.nrows())
}

/// Applies a spectral map f to a symmetric matrix: P = V Λ V^T ↦ V f(Λ) V^T.
///
/// `operation` names the map in the error raised when an eigenvalue
/// violates the domain predicate.
fn spectral_map<T, F, D>(
    p: &DMatrix<T>,
    f: F,
    domain: D,
    operation: &str,
) -> GeometryResult<DMatrix<T>>
where
    T: Scalar,
    F: Fn(T) -> T,
    D: Fn(T) -> bool,
{
    let n = check_square(p)?;
    let eigen = p.clone().symmetric_eigen();
    let mut mapped = DVector::zeros(n);
    for (i, &eval) in eigen.eigenvalues.iter().enumerate() {
        if !domain(eval) {
            return Err(GeometryError::not_positive_definite(format!(
                "cannot compute {} with eigenvalue {}",
                operation, eval
            )));
        }
        mapped[i] = f(eval);
    }
    let diag = DMatrix::from_diagonal(&mapped);
    Ok(&eigen.eigenvectors * diag * eigen.eigenvectors.transpose())
}

/// Computes the matrix square root P^{1/2}.
pub fn sqrtm<T: Scalar>(p: &DMatrix<T>) -> GeometryResult<DMatrix<T>> {
    spectral_map(
        p,
        |x| <T as Float>::sqrt(x),
        |x| x > T::zero(),
        "square root",
    )
}

/// Computes the inverse matrix square root P^{-1/2}.
pub fn inv_sqrtm<T: Scalar>(p: &DMatrix<T>) -> GeometryResult<DMatrix<T>> {
    spectral_map(
        p,
        |x| T::one() / <T as Float>::sqrt(x),
        |x| x > T::zero(),
        "inverse square root",
    )
}

/// Computes the principal matrix logarithm log(P).
pub fn logm<T: Scalar>(p: &DMatrix<T>) -> GeometryResult<DMatrix<T>> {
    spectral_map(p, |x| <T as Float>::ln(x), |x| x > T::zero(), "logarithm")
}

/// Computes the matrix exponential exp(X) of a symmetric matrix.
pub fn expm<T: Scalar>(x: &DMatrix<T>) -> GeometryResult<DMatrix<T>> {
    spectral_map(x, |v| <T as Float>::exp(v), |_| true, "exponential")
}

/// Computes the inverse P^{-1} of an SPD matrix.
pub fn invm<T: Scalar>(p: &DMatrix<T>) -> GeometryResult<DMatrix<T>> {
    check_square(p)?;
    p.clone()
        .try_inverse()
        .ok_or_else(|| GeometryError::numerical_error("matrix is not invertible"))
}

/// Computes the lower Cholesky factor L with P = L L^T.
pub fn cholesky_lower<T: Scalar>(p: &DMatrix<T>) -> GeometryResult<DMatrix<T>> {
    check_square(p)?;
    let chol = p.clone().cholesky().ok_or_else(|| {
        GeometryError::not_positive_definite("Cholesky factorization failed")
    })?;
    Ok(chol.l())
}

/// Computes log det P through the Cholesky factorization.
pub fn log_det<T: Scalar>(p: &DMatrix<T>) -> GeometryResult<T> {
    let l = cholesky_lower(p)?;
    let mut acc = T::zero();
    for i in 0..l.nrows() {
        acc += <T as Float>::ln(l[(i, i)]);
    }
    Ok(acc + acc)
}

/// Returns the symmetric part (M + M^T)/2.
///
/// Spectral reconstructions accumulate asymmetric roundoff; iterated maps
/// call this between steps to stay on the symmetric cone.
pub fn sym_part<T: Scalar>(m: &DMatrix<T>) -> DMatrix<T> {
    (m + m.transpose()) * <T as Scalar>::from_f64(0.5)
}
