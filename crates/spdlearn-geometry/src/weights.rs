//! Weight validation and normalization for weighted means.

use nalgebra::DVector;
use spdlearn_core::{
    error::{GeometryError, GeometryResult},
    types::Scalar,
};

/// Builds a normalized weight vector for a collection of `len` matrices.
///
/// `None` yields uniform weights 1/len. With `check` set, supplied weights
/// are validated (finite, non-negative, positive sum) and normalized to
/// sum 1; with `check` unset the caller is trusted to pass weights that
/// already sum to 1.
///
/// # Errors
///
/// `DimensionMismatch` when the weight count differs from `len`;
/// `InvalidParameter` for negative, non-finite or all-zero weights.
pub fn normalize_weights<T: Scalar>(
    weights: Option<&[T]>,
    len: usize,
    check: bool,
) -> GeometryResult<DVector<T>> {
    if len == 0 {
        return Err(GeometryError::empty_collection("weight normalization"));
    }
    match weights {
        None => {
            let uniform = T::one() / <T as Scalar>::from_usize(len);
            Ok(DVector::from_element(len, uniform))
        }
        Some(w) => {
            if w.len() != len {
                return Err(GeometryError::dimension_mismatch(
                    format!("{} weights", len),
                    format!("{} weights", w.len()),
                ));
            }
            let mut v = DVector::from_column_slice(w);
            if check {
                let mut sum = T::zero();
                for &x in w {
                    if !x.is_finite() || x < T::zero() {
                        return Err(GeometryError::invalid_parameter(format!(
                            "weights must be finite and non-negative, got {}",
                            x
                        )));
                    }
                    sum += x;
                }
                if sum <= T::zero() {
                    return Err(GeometryError::invalid_parameter(
                        "weights must not all be zero",
                    ));
                }
                v /= sum;
            }
            Ok(v)
        }
    }
}
