//! Integration tests for spdlearn-classify
//!
//! End-to-end scenarios exercising fit, the three prediction modes and
//! cross-validation together, across closed-form and iterative metrics.

use nalgebra::DMatrix;
use pretty_assertions::assert_eq;
use rand::{rngs::SmallRng, SeedableRng};
use spdlearn_classify::{
    compute_distances, CrossValidation, Mdm, Scoring,
};
use spdlearn_geometry::{random_spd_cloud, Metric};

/// Two well-separated classes of five 3×3 matrices each.
fn two_class_scenario() -> (Vec<DMatrix<f64>>, Vec<usize>) {
    let mut rng = SmallRng::seed_from_u64(1234);
    let mut matrices: Vec<DMatrix<f64>> = random_spd_cloud(3, 5, 0.05, &mut rng);
    matrices.extend(
        random_spd_cloud::<f64, _>(3, 5, 0.05, &mut rng)
            .into_iter()
            .map(|m| m * 5.0),
    );
    (matrices, vec![1, 1, 1, 1, 1, 2, 2, 2, 2, 2])
}

#[test]
fn end_to_end_fit_predict_crossvalidate() {
    let (x, y) = two_class_scenario();

    let model = Mdm::fit_new(Metric::Fisher, &x, &y).unwrap();
    assert_eq!(model.means().len(), 2);

    let predicted = model.predict_labels(&x).unwrap();
    assert_eq!(predicted.len(), x.len());
    assert!(predicted.iter().all(|&l| l == 1 || l == 2));

    let outcome = CrossValidation::new(Metric::Fisher)
        .with_folds(5)
        .with_scoring(Scoring::Balanced)
        .with_shuffle(99)
        .run(&x, &y)
        .unwrap();
    assert_eq!(outcome.scores.len(), 5);
    assert!(outcome.scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
}

#[test]
fn every_metric_completes_the_pipeline() {
    let (x, y) = two_class_scenario();
    for metric in Metric::ALL {
        let model = Mdm::fit_new(metric, &x, &y)
            .unwrap_or_else(|e| panic!("{} fit failed: {}", metric, e));
        let labels = model.predict_labels(&x).unwrap();
        assert_eq!(labels, y, "{} misclassified its own training data", metric);

        let probs = model.predict_probabilities(&x).unwrap();
        for p in &probs {
            let total: f64 = p.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "{} probabilities sum {}", metric, total);
        }
    }
}

#[test]
fn distance_evaluator_agrees_with_label_prediction() {
    let (x, y) = two_class_scenario();
    let model = Mdm::fit_new(Metric::LogEuclidean, &x, &y).unwrap();
    let d = compute_distances(Metric::LogEuclidean, model.means(), &x).unwrap();
    let labels = model.predict_labels(&x).unwrap();
    for (j, &label) in labels.iter().enumerate() {
        let column = d.column(j);
        let argmin = (0..column.len())
            .min_by(|&a, &b| column[a].partial_cmp(&column[b]).unwrap())
            .unwrap();
        assert_eq!(label, argmin + 1);
    }
}

#[test]
fn confusion_row_sums_equal_test_set_sizes() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut x: Vec<DMatrix<f64>> = random_spd_cloud(3, 12, 0.1, &mut rng);
    x.extend(
        random_spd_cloud::<f64, _>(3, 8, 0.1, &mut rng)
            .into_iter()
            .map(|m| m * 5.0),
    );
    let mut y = vec![1; 12];
    y.extend(vec![2; 8]);

    let n_folds = 4;
    let outcome = CrossValidation::new(Metric::Euclidean)
        .with_folds(n_folds)
        .with_shuffle(31)
        .run(&x, &y)
        .unwrap();

    // 12 and 8 split evenly over 4 folds: 3 and 2 per fold.
    for c in &outcome.confusions {
        assert_eq!(c.row(0).sum(), 3.0);
        assert_eq!(c.row(1).sum(), 2.0);
    }
}

#[test]
fn three_class_problem() {
    let mut rng = SmallRng::seed_from_u64(55);
    let mut x: Vec<DMatrix<f64>> = random_spd_cloud(4, 6, 0.05, &mut rng);
    x.extend(
        random_spd_cloud::<f64, _>(4, 6, 0.05, &mut rng)
            .into_iter()
            .map(|m| m * 5.0),
    );
    x.extend(
        random_spd_cloud::<f64, _>(4, 6, 0.05, &mut rng)
            .into_iter()
            .map(|m| m * 25.0),
    );
    let mut y = vec![1; 6];
    y.extend(vec![2; 6]);
    y.extend(vec![3; 6]);

    let model = Mdm::fit_new(Metric::Fisher, &x, &y).unwrap();
    assert_eq!(model.n_classes(), 3);
    assert_eq!(model.predict_labels(&x).unwrap(), y);

    let outcome = CrossValidation::new(Metric::Fisher)
        .with_folds(3)
        .with_shuffle(4)
        .run(&x, &y)
        .unwrap();
    assert!(outcome.mean_score() > 0.9);
}

#[test]
fn refitting_with_another_dataset_is_independent() {
    let (x, y) = two_class_scenario();
    let unfitted = Mdm::new(Metric::Wasserstein);
    let first = unfitted.fit(&x, &y).unwrap();
    // The unfitted configuration is reusable: a second fit on shuffled
    // data builds an independent model and leaves the first intact.
    let reversed_x: Vec<DMatrix<f64>> = x.iter().rev().cloned().collect();
    let reversed_y: Vec<usize> = y.iter().rev().copied().collect();
    let second = unfitted.fit(&reversed_x, &reversed_y).unwrap();
    // Class means are indexed by serial, not sample order, so they agree
    // up to solver tolerance.
    for (a, b) in first.means().iter().zip(second.means().iter()) {
        assert!((a - b).norm() < 1e-5);
    }
}
