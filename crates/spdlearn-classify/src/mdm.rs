//! Minimum-distance-to-mean (MDM) classifier.
//!
//! The model is a typestate pair: [`Mdm`] carries the metric choice and
//! has no means; [`Mdm::fit`] produces a [`FittedMdm`] holding one mean
//! per class. Predicting on an unfitted model is therefore a type error
//! rather than a runtime check. The metric is fixed for the lifetime of
//! both values; re-fitting builds a fresh `FittedMdm` instead of mutating
//! one in place.
//!
//! Labels are positive integers; the class count z is the maximum label,
//! and every serial 1..=z must be inhabited in the training set.

use nalgebra::{DMatrix, DVector};
use num_traits::Float;
use rayon::prelude::*;
use spdlearn_core::{
    error::{ClassifyError, ClassifyResult},
    types::Scalar,
};
use spdlearn_geometry::{geometric_mean, Metric};

use crate::distances::compute_distances;
use crate::estimator::compute_mean;

/// An unfitted MDM classifier: a metric choice plus an optional mean
/// tolerance.
#[derive(Debug, Clone)]
pub struct Mdm<T: Scalar> {
    metric: Metric,
    tolerance: Option<T>,
}

/// A fitted MDM classifier holding one mean per class serial 1..=z.
///
/// All prediction methods are read-only; a fitted model can be shared
/// across threads and queried concurrently.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FittedMdm<T: Scalar> {
    metric: Metric,
    means: Vec<DMatrix<T>>,
}

/// Splits training indices by class serial, validating labels.
///
/// Returns one index list per class serial 1..=z with z the maximum
/// label. Shared with the fold generator.
pub(crate) fn group_by_class(labels: &[usize]) -> ClassifyResult<Vec<Vec<usize>>> {
    if labels.is_empty() {
        return Err(ClassifyError::invalid_argument(
            "training set must not be empty",
        ));
    }
    let z = match labels.iter().max() {
        Some(&z) if labels.iter().all(|&l| l >= 1) => z,
        _ => {
            return Err(ClassifyError::invalid_argument(
                "labels must be positive integers",
            ))
        }
    };
    let mut groups = vec![Vec::new(); z];
    for (idx, &label) in labels.iter().enumerate() {
        groups[label - 1].push(idx);
    }
    for (serial, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(ClassifyError::invalid_argument(format!(
                "class {} has no training instances",
                serial + 1
            )));
        }
    }
    Ok(groups)
}

impl<T: Scalar> Mdm<T> {
    /// Creates an unfitted MDM model with the given metric.
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            tolerance: None,
        }
    }

    /// Sets the convergence tolerance passed to iterative mean solvers.
    ///
    /// `None` or zero means √machine-epsilon.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Returns the configured metric.
    #[inline]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Fits the model: groups training matrices by label and computes one
    /// mean per class, in parallel across classes.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` when matrices and labels differ in length (no
    /// model is constructed); `InvalidArgument` for empty input, zero
    /// labels or an uninhabited class serial; `Convergence` when a class
    /// mean fails to reach tolerance.
    pub fn fit(
        &self,
        matrices: &[DMatrix<T>],
        labels: &[usize],
    ) -> ClassifyResult<FittedMdm<T>> {
        self.fit_weighted(matrices, labels, None)
    }

    /// Like [`Mdm::fit`], with one non-negative weight per training
    /// matrix. Weights are partitioned alongside the matrices and
    /// normalized within each class.
    pub fn fit_weighted(
        &self,
        matrices: &[DMatrix<T>],
        labels: &[usize],
        weights: Option<&[T]>,
    ) -> ClassifyResult<FittedMdm<T>> {
        if matrices.len() != labels.len() {
            return Err(ClassifyError::dimension_mismatch(
                format!("{} labels", matrices.len()),
                format!("{} labels", labels.len()),
            ));
        }
        if let Some(w) = weights {
            if w.len() != matrices.len() {
                return Err(ClassifyError::dimension_mismatch(
                    format!("{} weights", matrices.len()),
                    format!("{} weights", w.len()),
                ));
            }
        }
        let groups = group_by_class(labels)?;

        let means: Vec<DMatrix<T>> = groups
            .par_iter()
            .map(|indices| {
                let class_matrices: Vec<DMatrix<T>> =
                    indices.iter().map(|&i| matrices[i].clone()).collect();
                let class_weights: Option<Vec<T>> =
                    weights.map(|w| indices.iter().map(|&i| w[i]).collect());
                compute_mean(
                    self.metric,
                    &class_matrices,
                    class_weights.as_deref(),
                    true,
                    self.tolerance,
                )
            })
            .collect::<ClassifyResult<Vec<_>>>()?;

        Ok(FittedMdm {
            metric: self.metric,
            means,
        })
    }

    /// One-call convenience: builds and fits in a single step.
    pub fn fit_new(
        metric: Metric,
        matrices: &[DMatrix<T>],
        labels: &[usize],
    ) -> ClassifyResult<FittedMdm<T>> {
        Self::new(metric).fit(matrices, labels)
    }
}

impl<T: Scalar> FittedMdm<T> {
    /// Returns the metric the model was fitted with.
    #[inline]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the fitted class means, indexed by class serial minus one.
    #[inline]
    pub fn means(&self) -> &[DMatrix<T>] {
        &self.means
    }

    /// Returns the number of classes z.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.means.len()
    }

    fn distances_to_means(&self, matrices: &[DMatrix<T>]) -> ClassifyResult<DMatrix<T>> {
        compute_distances(self.metric, &self.means, matrices)
    }

    /// Predicts the class label (1..=z) of each query matrix: the class
    /// whose mean is nearest in squared distance, ties broken by the
    /// lowest class index.
    pub fn predict_labels(&self, matrices: &[DMatrix<T>]) -> ClassifyResult<Vec<usize>> {
        let d = self.distances_to_means(matrices)?;
        let labels = (0..d.ncols())
            .map(|j| {
                let column = d.column(j);
                let mut best = 0;
                for i in 1..column.len() {
                    if column[i] < column[best] {
                        best = i;
                    }
                }
                best + 1
            })
            .collect();
        Ok(labels)
    }

    /// Predicts class membership probabilities: the softmax of the
    /// negated squared-distance column, one length-z simplex vector per
    /// query.
    pub fn predict_probabilities(
        &self,
        matrices: &[DMatrix<T>],
    ) -> ClassifyResult<Vec<DVector<T>>> {
        let d = self.distances_to_means(matrices)?;
        let probabilities = (0..d.ncols())
            .map(|j| {
                let column = d.column(j);
                // softmax(−d) shifted by the column minimum for stability.
                let shift = column.iter().fold(T::infinity(), |m, &x| <T as Float>::min(m, x));
                let mut p = DVector::from_fn(column.len(), |i, _| {
                    <T as Float>::exp(shift - column[i])
                });
                let total = p.sum();
                p /= total;
                p
            })
            .collect();
        Ok(probabilities)
    }

    /// Computes the discriminant output: each squared-distance column
    /// divided by its scalar geometric mean, one length-z vector per
    /// query.
    ///
    /// The geometric mean is the scalar special case of the Fisher mean;
    /// distances are floored at machine epsilon so that an exact hit on a
    /// class mean yields a finite ratio.
    pub fn predict_functions(&self, matrices: &[DMatrix<T>]) -> ClassifyResult<Vec<DVector<T>>> {
        let d = self.distances_to_means(matrices)?;
        let mut outputs = Vec::with_capacity(d.ncols());
        for j in 0..d.ncols() {
            let column: Vec<T> = d
                .column(j)
                .iter()
                .map(|&x| <T as Float>::max(x, <T as Scalar>::EPSILON))
                .collect();
            let g = geometric_mean(&column)?;
            outputs.push(DVector::from_fn(column.len(), |i, _| column[i] / g));
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use rand::{rngs::SmallRng, SeedableRng};
    use spdlearn_geometry::random_spd_cloud;

    fn two_class_data() -> (Vec<DMatrix<f64>>, Vec<usize>) {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut matrices: Vec<DMatrix<f64>> = random_spd_cloud(3, 5, 0.05, &mut rng);
        // Scaling the second cloud keeps the classes far apart under
        // every metric, whatever the random seed matrices landed on.
        matrices.extend(
            random_spd_cloud::<f64, _>(3, 5, 0.05, &mut rng)
                .into_iter()
                .map(|m| m * 5.0),
        );
        let labels = vec![1, 1, 1, 1, 1, 2, 2, 2, 2, 2];
        (matrices, labels)
    }

    #[test]
    fn test_fit_produces_one_mean_per_class() {
        let (x, y) = two_class_data();
        let model = Mdm::fit_new(Metric::Fisher, &x, &y).unwrap();
        assert_eq!(model.n_classes(), 2);
        assert_eq!(model.means().len(), 2);
        assert_eq!(model.metric(), Metric::Fisher);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let (x, _) = two_class_data();
        let short_labels = vec![1, 2];
        assert!(matches!(
            Mdm::<f64>::fit_new(Metric::Euclidean, &x, &short_labels),
            Err(ClassifyError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_label_rejected() {
        let (x, mut y) = two_class_data();
        y[0] = 0;
        assert!(matches!(
            Mdm::<f64>::fit_new(Metric::Euclidean, &x, &y),
            Err(ClassifyError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_empty_class_serial_rejected() {
        let (x, y) = two_class_data();
        // Skipping serial 2 leaves it uninhabited.
        let gappy: Vec<usize> = y.iter().map(|&l| if l == 2 { 3 } else { l }).collect();
        assert!(matches!(
            Mdm::<f64>::fit_new(Metric::Euclidean, &x, &gappy),
            Err(ClassifyError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_predict_labels_on_training_data() {
        let (x, y) = two_class_data();
        for metric in [Metric::Fisher, Metric::LogEuclidean, Metric::Wasserstein] {
            let model = Mdm::fit_new(metric, &x, &y).unwrap();
            let predicted = model.predict_labels(&x).unwrap();
            assert_eq!(predicted.len(), x.len());
            assert!(predicted.iter().all(|&l| l == 1 || l == 2));
            // Tight, well-separated clouds: training accuracy is perfect.
            assert_eq!(predicted, y, "{} misclassified training data", metric);
        }
    }

    #[test]
    fn test_probabilities_form_simplex() {
        let (x, y) = two_class_data();
        let model = Mdm::fit_new(Metric::Fisher, &x, &y).unwrap();
        let probs = model.predict_probabilities(&x).unwrap();
        assert_eq!(probs.len(), x.len());
        for p in &probs {
            assert_eq!(p.len(), 2);
            assert!(p.iter().all(|&v| v > 0.0 && v < 1.0));
            assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_predict_is_idempotent() {
        let (x, y) = two_class_data();
        let model = Mdm::fit_new(Metric::LogDet0, &x, &y).unwrap();
        let first = model.predict_labels(&x).unwrap();
        let second = model.predict_labels(&x).unwrap();
        assert_eq!(first, second);
        let p1 = model.predict_probabilities(&x).unwrap();
        let p2 = model.predict_probabilities(&x).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_functions_single_class_self_query() {
        // One class, one matrix: the query coincides with its own mean,
        // so the single discriminant value is the floored ratio 1.
        let x = vec![DMatrix::from_row_slice(2, 2, &[2.0, 0.3, 0.3, 1.5])];
        let y = vec![1];
        let model = Mdm::fit_new(Metric::Fisher, &x, &y).unwrap();
        let f = model.predict_functions(&x).unwrap();
        assert_eq!(f.len(), 1);
        assert_relative_eq!(f[0][0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_functions_favor_own_class() {
        let (x, y) = two_class_data();
        let model = Mdm::fit_new(Metric::Fisher, &x, &y).unwrap();
        let f = model.predict_functions(&x).unwrap();
        // Discriminant below 1 at the true class, above 1 elsewhere,
        // for these well-separated clouds.
        for (values, &label) in f.iter().zip(y.iter()) {
            assert!(values[label - 1] < 1.0);
        }
    }

    #[test]
    fn test_weighted_fit_matches_duplication() {
        // Doubling a matrix's weight should match duplicating it, for the
        // arithmetic mean.
        let x = vec![
            DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]),
            DMatrix::from_row_slice(2, 2, &[3.0, 0.0, 0.0, 3.0]),
        ];
        let weighted = Mdm::new(Metric::Euclidean)
            .fit_weighted(&x, &[1, 1], Some(&[2.0, 1.0]))
            .unwrap();
        let duplicated = Mdm::fit_new(
            Metric::Euclidean,
            &[x[0].clone(), x[0].clone(), x[1].clone()],
            &[1, 1, 1],
        )
        .unwrap();
        assert_relative_eq!(weighted.means()[0], duplicated.means()[0], epsilon = 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_fitted_model_serde_roundtrip() {
        let (x, y) = two_class_data();
        let model = Mdm::fit_new(Metric::LogEuclidean, &x, &y).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: FittedMdm<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metric(), model.metric());
        assert_eq!(back.means(), model.means());
    }
}
