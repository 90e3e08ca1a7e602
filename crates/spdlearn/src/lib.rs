//! Riemannian machine learning on symmetric positive definite matrices.
//!
//! `spdlearn` classifies SPD matrices (covariance matrices from EEG/BCI
//! signals, region descriptors, kernel matrices) by their position on the
//! SPD manifold: a minimum-distance-to-mean (MDM) classifier fits one
//! Riemannian mean per class under a chosen [`Metric`] and assigns each
//! query to the class with the nearest mean. A stratified k-fold
//! cross-validation engine estimates generalization accuracy.
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::SmallRng, SeedableRng};
//! use spdlearn::prelude::*;
//! use spdlearn::random_spd_cloud;
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let mut matrices = random_spd_cloud::<f64, _>(3, 10, 0.05, &mut rng);
//! matrices.extend(
//!     random_spd_cloud::<f64, _>(3, 10, 0.05, &mut rng)
//!         .into_iter()
//!         .map(|m| m * 5.0),
//! );
//! let mut labels = vec![1; 10];
//! labels.extend(vec![2; 10]);
//!
//! // Fit and predict.
//! let model = Mdm::fit_new(Metric::Fisher, &matrices, &labels)?;
//! let predicted = model.predict_labels(&matrices)?;
//! assert_eq!(predicted.len(), 20);
//!
//! // Estimate generalization accuracy.
//! let outcome = CrossValidation::new(Metric::Fisher)
//!     .with_folds(5)
//!     .with_shuffle(7)
//!     .run(&matrices, &labels)?;
//! assert!(outcome.mean_score() <= 1.0);
//! # Ok::<(), spdlearn::ClassifyError>(())
//! ```

pub use spdlearn_core::{
    error::{ClassifyError, ClassifyResult, GeometryError, GeometryResult},
    types::Scalar,
};

pub use spdlearn_geometry::{
    closed_form_mean, distance, distance_squared, geometric_mean, iterative_mean,
    normalize_weights, random_spd, random_spd_cloud, MeanOutcome, Metric,
};

pub use spdlearn_classify::{
    compute_distances, compute_mean, confusion_matrix, score, stratified_folds,
    CrossValidation, CvOutcome, FittedMdm, FoldSplit, Mdm, Scoring,
};

/// Convenience re-exports for the common workflow.
pub mod prelude {
    pub use crate::{
        CrossValidation, CvOutcome, FittedMdm, Mdm, Metric, Scoring,
    };
}
