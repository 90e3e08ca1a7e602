//! Confusion matrices and accuracy scores.

use nalgebra::DMatrix;
use spdlearn_core::{
    error::{ClassifyError, ClassifyResult},
    types::Scalar,
};

/// Scoring rule for a cross-validation repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scoring {
    /// Mean of per-class recall, correcting for class imbalance.
    #[default]
    Balanced,
    /// Overall correct / total.
    Plain,
}

/// Accumulates a z×z confusion matrix: entry (i, j) counts test samples
/// of true class i+1 predicted as class j+1.
///
/// # Errors
///
/// `DimensionMismatch` when the label sequences differ in length;
/// `InvalidArgument` when a label falls outside 1..=n_classes.
pub fn confusion_matrix<T: Scalar>(
    n_classes: usize,
    truth: &[usize],
    predicted: &[usize],
) -> ClassifyResult<DMatrix<T>> {
    if truth.len() != predicted.len() {
        return Err(ClassifyError::dimension_mismatch(
            format!("{} predictions", truth.len()),
            format!("{} predictions", predicted.len()),
        ));
    }
    let mut c = DMatrix::zeros(n_classes, n_classes);
    for (&t, &p) in truth.iter().zip(predicted.iter()) {
        if t < 1 || t > n_classes || p < 1 || p > n_classes {
            return Err(ClassifyError::invalid_argument(format!(
                "label pair ({}, {}) outside 1..={}",
                t, p, n_classes
            )));
        }
        c[(t - 1, p - 1)] += T::one();
    }
    Ok(c)
}

/// Scores a confusion matrix.
///
/// Balanced accuracy averages per-class recall over the classes that have
/// test instances; classes with an empty row are skipped rather than
/// counted as zero. An all-empty matrix scores zero.
pub fn score<T: Scalar>(confusion: &DMatrix<T>, scoring: Scoring) -> T {
    match scoring {
        Scoring::Balanced => {
            let mut acc = T::zero();
            let mut scored_classes = 0;
            for i in 0..confusion.nrows() {
                let row_total = confusion.row(i).sum();
                if row_total > T::zero() {
                    acc += confusion[(i, i)] / row_total;
                    scored_classes += 1;
                }
            }
            if scored_classes == 0 {
                T::zero()
            } else {
                acc / <T as Scalar>::from_usize(scored_classes)
            }
        }
        Scoring::Plain => {
            let total = confusion.sum();
            if total > T::zero() {
                confusion.trace() / total
            } else {
                T::zero()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_confusion_entries() {
        let truth = [1, 1, 2, 2, 2];
        let predicted = [1, 2, 2, 2, 1];
        let c: DMatrix<f64> = confusion_matrix(2, &truth, &predicted).unwrap();
        assert_relative_eq!(c[(0, 0)], 1.0);
        assert_relative_eq!(c[(0, 1)], 1.0);
        assert_relative_eq!(c[(1, 0)], 1.0);
        assert_relative_eq!(c[(1, 1)], 2.0);
    }

    #[test]
    fn test_row_sums_equal_class_counts() {
        let truth = [1, 1, 1, 2, 2];
        let predicted = [1, 2, 1, 2, 2];
        let c: DMatrix<f64> = confusion_matrix(2, &truth, &predicted).unwrap();
        assert_relative_eq!(c.row(0).sum(), 3.0);
        assert_relative_eq!(c.row(1).sum(), 2.0);
    }

    #[test]
    fn test_balanced_vs_plain_on_imbalanced_data() {
        // Class 1: 4/4 correct; class 2: 0/1 correct.
        let truth = [1, 1, 1, 1, 2];
        let predicted = [1, 1, 1, 1, 1];
        let c: DMatrix<f64> = confusion_matrix(2, &truth, &predicted).unwrap();
        assert_relative_eq!(score(&c, Scoring::Plain), 0.8, epsilon = 1e-12);
        assert_relative_eq!(score(&c, Scoring::Balanced), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_balanced_skips_empty_rows() {
        // Class 2 has no test instances in this fold.
        let truth = [1, 1];
        let predicted = [1, 1];
        let c: DMatrix<f64> = confusion_matrix(2, &truth, &predicted).unwrap();
        assert_relative_eq!(score(&c, Scoring::Balanced), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_confusion_scores_zero() {
        let c = DMatrix::<f64>::zeros(2, 2);
        assert_relative_eq!(score(&c, Scoring::Balanced), 0.0);
        assert_relative_eq!(score(&c, Scoring::Plain), 0.0);
    }

    #[test]
    fn test_out_of_range_label_rejected() {
        assert!(confusion_matrix::<f64>(2, &[3], &[1]).is_err());
        assert!(confusion_matrix::<f64>(2, &[1, 1], &[1]).is_err());
    }
}
