//! Stratified k-fold partitioning.
//!
//! Folds are a true partition: within each class, the index list
//! (optionally shuffled by an explicitly seeded generator) is dealt
//! round-robin to the fold test sets, so every index is tested exactly
//! once across the folds and each fold preserves each class's
//! representation. A class smaller than the fold count leaves some folds
//! without test items for that class; the scoring side tolerates the
//! resulting empty confusion rows.

use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use spdlearn_core::error::{ClassifyError, ClassifyResult};

use crate::mdm::group_by_class;

/// One train/test split over global sample indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    /// Indices used for fitting in this fold.
    pub train: Vec<usize>,
    /// Indices held out for prediction in this fold.
    pub test: Vec<usize>,
}

/// Builds `n_folds` stratified train/test splits for the given labels.
///
/// `shuffle` carries the seed for the per-class index shuffle; `None`
/// keeps the original ordering, making the partition fully deterministic
/// either way.
///
/// # Errors
///
/// `InvalidArgument` when `n_folds < 2`, when labels are empty or
/// non-positive, or when every class is smaller than `n_folds` (some fold
/// would have an empty test set).
pub fn stratified_folds(
    labels: &[usize],
    n_folds: usize,
    shuffle: Option<u64>,
) -> ClassifyResult<Vec<FoldSplit>> {
    if n_folds < 2 {
        return Err(ClassifyError::invalid_argument(format!(
            "cross-validation requires at least 2 folds, got {}",
            n_folds
        )));
    }
    let mut groups = group_by_class(labels)?;
    if groups.iter().all(|g| g.len() < n_folds) {
        return Err(ClassifyError::invalid_argument(format!(
            "every class has fewer than {} matrices; some fold would have an empty test set",
            n_folds
        )));
    }

    if let Some(seed) = shuffle {
        let mut rng = SmallRng::seed_from_u64(seed);
        for group in &mut groups {
            group.shuffle(&mut rng);
        }
    }

    let mut test_sets = vec![Vec::new(); n_folds];
    for group in &groups {
        for (position, &index) in group.iter().enumerate() {
            test_sets[position % n_folds].push(index);
        }
    }

    let folds = test_sets
        .into_iter()
        .map(|mut test| {
            test.sort_unstable();
            let mut in_test = vec![false; labels.len()];
            for &i in &test {
                in_test[i] = true;
            }
            let train = (0..labels.len()).filter(|&i| !in_test[i]).collect();
            FoldSplit { train, test }
        })
        .collect();
    Ok(folds)
}
