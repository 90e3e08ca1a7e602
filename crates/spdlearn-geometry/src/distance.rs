//! Squared geodesic distances between SPD matrices.
//!
//! Every formula returns the *squared* distance; downstream softmax and
//! discriminant computations rely on that convention. The plain distance
//! is the square root, clamped at zero against roundoff.

use nalgebra::DMatrix;
use num_traits::Float;
use spdlearn_core::{
    error::{GeometryError, GeometryResult},
    types::Scalar,
};

use crate::functions::{check_square, cholesky_lower, invm, inv_sqrtm, log_det, logm, sqrtm};
use crate::metric::Metric;

/// Checks that two matrices are square with identical dimension.
fn check_pair<T: Scalar>(a: &DMatrix<T>, b: &DMatrix<T>) -> GeometryResult<usize> {
    let n = check_square(a)?;
    let m = check_square(b)?;
    if n != m {
        return Err(GeometryError::dimension_mismatch(
            format!("{}x{}", n, n),
            format!("{}x{}", m, m),
        ));
    }
    Ok(n)
}

/// Computes the squared distance between two SPD matrices under `metric`.
///
/// # Mathematical Formulas
///
/// - Euclidean: ‖A−B‖²_F
/// - Inverse Euclidean: ‖A⁻¹−B⁻¹‖²_F
/// - Cholesky-Euclidean: ‖L_A−L_B‖²_F
/// - Log-Euclidean: ‖log A − log B‖²_F
/// - Fisher: ‖log(A^{-1/2} B A^{-1/2})‖²_F
/// - LogDet zero: log det((A+B)/2) − ½ log det A − ½ log det B
/// - Jeffrey: ½ tr(A⁻¹B + B⁻¹A) − n
/// - Wasserstein: tr A + tr B − 2 tr((A^{1/2} B A^{1/2})^{1/2})
///
/// # Errors
///
/// `DimensionMismatch` for incompatible shapes, `NotPositiveDefinite`
/// when a formula leaves its domain.
pub fn distance_squared<T: Scalar>(
    metric: Metric,
    a: &DMatrix<T>,
    b: &DMatrix<T>,
) -> GeometryResult<T> {
    let n = check_pair(a, b)?;

    let d2 = match metric {
        Metric::Euclidean => (a - b).norm_squared(),
        Metric::InvEuclidean => (invm(a)? - invm(b)?).norm_squared(),
        Metric::ChoEuclidean => (cholesky_lower(a)? - cholesky_lower(b)?).norm_squared(),
        Metric::LogEuclidean => (logm(a)? - logm(b)?).norm_squared(),
        Metric::Fisher => {
            let a_isqrt = inv_sqrtm(a)?;
            let whitened = &a_isqrt * b * &a_isqrt;
            logm(&whitened)?.norm_squared()
        }
        Metric::LogDet0 => {
            let midpoint = (a + b) * <T as Scalar>::from_f64(0.5);
            let half = <T as Scalar>::from_f64(0.5);
            log_det(&midpoint)? - half * log_det(a)? - half * log_det(b)?
        }
        Metric::Jeffrey => {
            let half = <T as Scalar>::from_f64(0.5);
            let cross = (invm(a)? * b).trace() + (invm(b)? * a).trace();
            half * cross - <T as Scalar>::from_usize(n)
        }
        Metric::Wasserstein => {
            let a_sqrt = sqrtm(a)?;
            let middle = &a_sqrt * b * &a_sqrt;
            let middle_sqrt = sqrtm(&middle)?;
            a.trace() + b.trace() - <T as Scalar>::from_f64(2.0) * middle_sqrt.trace()
        }
    };

    // Trace-based formulas can dip below zero by roundoff near d = 0.
    Ok(<T as Float>::max(d2, T::zero()))
}

/// Computes the geodesic distance under `metric` (square root of
/// [`distance_squared`]).
pub fn distance<T: Scalar>(metric: Metric, a: &DMatrix<T>, b: &DMatrix<T>) -> GeometryResult<T> {
    Ok(<T as Float>::sqrt(distance_squared(metric, a, b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn spd_pair() -> (DMatrix<f64>, DMatrix<f64>) {
        let a = DMatrix::from_row_slice(3, 3, &[2.0, 0.3, 0.1, 0.3, 1.5, 0.2, 0.1, 0.2, 1.8]);
        let b = DMatrix::from_row_slice(3, 3, &[1.2, 0.1, 0.0, 0.1, 2.5, 0.4, 0.0, 0.4, 1.1]);
        (a, b)
    }

    #[test]
    fn test_self_distance_zero_all_metrics() {
        let (a, _) = spd_pair();
        for metric in Metric::ALL {
            let d2 = distance_squared(metric, &a, &a).unwrap();
            assert!(
                d2.abs() < 1e-9,
                "{} self-distance was {}",
                metric,
                d2
            );
        }
    }

    #[test]
    fn test_symmetry_of_symmetric_metrics() {
        let (a, b) = spd_pair();
        // All supported metrics happen to be symmetric in their arguments.
        for metric in Metric::ALL {
            let dab = distance_squared(metric, &a, &b).unwrap();
            let dba = distance_squared(metric, &b, &a).unwrap();
            assert_relative_eq!(dab, dba, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fisher_distance_identity_to_scaled_identity() {
        let identity = DMatrix::<f64>::identity(2, 2);
        let scaled = &identity * 4.0;
        // d²(I, 4I) = Σ ln²(4) over two eigenvalues.
        let expected = 2.0 * (4.0f64).ln().powi(2);
        let d2 = distance_squared(Metric::Fisher, &identity, &scaled).unwrap();
        assert_relative_eq!(d2, expected, epsilon = 1e-10);
    }

    #[test]
    fn test_euclidean_matches_frobenius() {
        let (a, b) = spd_pair();
        let d2 = distance_squared(Metric::Euclidean, &a, &b).unwrap();
        assert_relative_eq!(d2, (&a - &b).norm_squared(), epsilon = 1e-14);
    }

    #[test]
    fn test_jeffrey_on_commuting_pair() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]);
        let b = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 6.0]);
        // ½ (2/1 + 3/6 + 1/2 + 6/3) − 2 = ½ · 5 − 2 = 0.5
        let d2 = distance_squared(Metric::Jeffrey, &a, &b).unwrap();
        assert_relative_eq!(d2, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = DMatrix::<f64>::identity(2, 2);
        let b = DMatrix::<f64>::identity(3, 3);
        assert!(matches!(
            distance_squared(Metric::Euclidean, &a, &b),
            Err(GeometryError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_distance_is_sqrt_of_squared() {
        let (a, b) = spd_pair();
        let d = distance(Metric::LogEuclidean, &a, &b).unwrap();
        let d2 = distance_squared(Metric::LogEuclidean, &a, &b).unwrap();
        assert_relative_eq!(d * d, d2, epsilon = 1e-12);
    }
}
