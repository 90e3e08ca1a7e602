//! Randomized stratified cross-validation for the MDM classifier.
//!
//! Each fold builds a fresh model, fits it on the fold's training
//! indices, predicts the held-out indices and accumulates a confusion
//! matrix; folds run in parallel and each writes only its own output
//! slot. Shuffling is driven by an explicit seed so repetitions are
//! reproducible.

use nalgebra::DMatrix;
use rayon::prelude::*;
use spdlearn_core::{
    error::{ClassifyError, ClassifyResult},
    types::Scalar,
};
use spdlearn_geometry::Metric;

use crate::folds::{stratified_folds, FoldSplit};
use crate::mdm::Mdm;
use crate::scoring::{confusion_matrix, score, Scoring};

/// Configuration for one cross-validation run.
///
/// Built with the metric and tuned through the `with_*` methods; `run`
/// executes the folds.
#[derive(Debug, Clone)]
pub struct CrossValidation<T: Scalar> {
    metric: Metric,
    n_folds: usize,
    scoring: Scoring,
    shuffle: Option<u64>,
    tolerance: Option<T>,
}

/// Outcome of a cross-validation run: one score and one confusion matrix
/// per fold, in fold order.
#[derive(Debug, Clone)]
pub struct CvOutcome<T: Scalar> {
    /// Per-fold scores in [0, 1].
    pub scores: Vec<T>,
    /// Per-fold z×z confusion matrices.
    pub confusions: Vec<DMatrix<T>>,
}

impl<T: Scalar> CvOutcome<T> {
    /// Mean of the per-fold scores.
    pub fn mean_score(&self) -> T {
        if self.scores.is_empty() {
            return T::zero();
        }
        let sum = self.scores.iter().fold(T::zero(), |a, &b| a + b);
        sum / <T as Scalar>::from_usize(self.scores.len())
    }
}

impl<T: Scalar> CrossValidation<T> {
    /// Creates a cross-validation configuration: 10 folds, balanced
    /// accuracy, no shuffling.
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            n_folds: 10,
            scoring: Scoring::Balanced,
            shuffle: None,
            tolerance: None,
        }
    }

    /// Sets the number of folds.
    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    /// Sets the scoring rule.
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Enables per-class index shuffling with an explicit seed.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = Some(seed);
        self
    }

    /// Sets the convergence tolerance handed to each fold's mean solver.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Runs the cross-validation over `matrices` and `labels`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` when matrices and labels differ in length,
    /// fold-construction errors from [`stratified_folds`], and any fit or
    /// prediction error from within a fold.
    pub fn run(
        &self,
        matrices: &[DMatrix<T>],
        labels: &[usize],
    ) -> ClassifyResult<CvOutcome<T>> {
        if matrices.len() != labels.len() {
            return Err(ClassifyError::dimension_mismatch(
                format!("{} labels", matrices.len()),
                format!("{} labels", labels.len()),
            ));
        }
        let folds = stratified_folds(labels, self.n_folds, self.shuffle)?;
        let n_classes = labels.iter().copied().max().unwrap_or(0);

        let per_fold: Vec<(T, DMatrix<T>)> = folds
            .par_iter()
            .map(|fold| self.run_fold(matrices, labels, fold, n_classes))
            .collect::<ClassifyResult<Vec<_>>>()?;

        let (scores, confusions) = per_fold.into_iter().unzip();
        Ok(CvOutcome { scores, confusions })
    }

    fn run_fold(
        &self,
        matrices: &[DMatrix<T>],
        labels: &[usize],
        fold: &FoldSplit,
        n_classes: usize,
    ) -> ClassifyResult<(T, DMatrix<T>)> {
        let train_x: Vec<DMatrix<T>> =
            fold.train.iter().map(|&i| matrices[i].clone()).collect();
        let train_y: Vec<usize> = fold.train.iter().map(|&i| labels[i]).collect();
        let test_x: Vec<DMatrix<T>> =
            fold.test.iter().map(|&i| matrices[i].clone()).collect();
        let test_y: Vec<usize> = fold.test.iter().map(|&i| labels[i]).collect();

        let mut model = Mdm::new(self.metric);
        if let Some(tol) = self.tolerance {
            model = model.with_tolerance(tol);
        }
        let fitted = model.fit(&train_x, &train_y)?;
        let predicted = fitted.predict_labels(&test_x)?;
        let confusion = confusion_matrix(n_classes, &test_y, &predicted)?;
        Ok((score(&confusion, self.scoring), confusion))
    }
}
