//! Squared-distance evaluation between query matrices and class means.

use nalgebra::DMatrix;
use rayon::prelude::*;
use spdlearn_core::{error::ClassifyResult, types::Scalar};
use spdlearn_geometry::{distance_squared, Metric};

/// Computes the z×k matrix of squared distances between `matrices` (k
/// queries, one per column) and `means` (z class means, one per row).
///
/// `D[(i, j)]` is the squared geodesic distance under `metric` between
/// `matrices[j]` and `means[i]`. Pure: inputs are never mutated. Columns
/// are evaluated in parallel; ordering is preserved.
pub fn compute_distances<T: Scalar>(
    metric: Metric,
    means: &[DMatrix<T>],
    matrices: &[DMatrix<T>],
) -> ClassifyResult<DMatrix<T>> {
    let z = means.len();
    let k = matrices.len();

    let columns: Vec<Vec<T>> = matrices
        .par_iter()
        .map(|query| {
            means
                .iter()
                .map(|mean| Ok(distance_squared(metric, mean, query)?))
                .collect::<ClassifyResult<Vec<T>>>()
        })
        .collect::<ClassifyResult<Vec<_>>>()?;

    Ok(DMatrix::from_fn(z, k, |i, j| columns[j][i]))
}
