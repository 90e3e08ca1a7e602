//! Minimum-distance-to-mean classification and cross-validation on the
//! SPD manifold.
//!
//! This crate drives the geometry primitives from `spdlearn-geometry`
//! into a classifier pipeline: per-class Riemannian means, squared
//! distances from queries to class means, label/probability/discriminant
//! prediction, and stratified k-fold cross-validation with per-fold
//! confusion matrices and accuracy scores.

pub mod cv;
pub mod distances;
pub mod estimator;
pub mod folds;
pub mod mdm;
pub mod scoring;

pub use cv::{CrossValidation, CvOutcome};
pub use distances::compute_distances;
pub use estimator::compute_mean;
pub use folds::{stratified_folds, FoldSplit};
pub use mdm::{FittedMdm, Mdm};
pub use scoring::{confusion_matrix, score, Scoring};
