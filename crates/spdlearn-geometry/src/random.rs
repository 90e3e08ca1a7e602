//! Random SPD matrix generation for tests and demos.

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use spdlearn_core::types::Scalar;

/// Generates a random SPD matrix as A^T A / n + εI with A standard normal.
///
/// The εI shift keeps the result comfortably inside the cone even when
/// A^T A is nearly singular.
pub fn random_spd<T: Scalar, R: Rng + ?Sized>(n: usize, rng: &mut R) -> DMatrix<T> {
    let normal = StandardNormal;
    let a = DMatrix::from_fn(n, n, |_, _| {
        <T as Scalar>::from_f64(normal.sample(rng))
    });
    let ata = a.transpose() * &a / <T as Scalar>::from_usize(n);
    ata + DMatrix::identity(n, n) * <T as Scalar>::from_f64(1e-2)
}

/// Generates `count` SPD matrices scattered around a common random seed
/// matrix.
///
/// Each member is seed + dispersion·Sᵢ with Sᵢ a fresh [`random_spd`]
/// draw; sums of SPD matrices stay SPD, so the cloud never leaves the
/// cone. Smaller `dispersion` produces a tighter class.
pub fn random_spd_cloud<T: Scalar, R: Rng + ?Sized>(
    n: usize,
    count: usize,
    dispersion: f64,
    rng: &mut R,
) -> Vec<DMatrix<T>> {
    let seed = random_spd::<T, R>(n, rng);
    let scale = <T as Scalar>::from_f64(dispersion);
    (0..count)
        .map(|_| &seed + random_spd::<T, R>(n, rng) * scale)
        .collect()
}
