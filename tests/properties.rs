//! Property-based tests for the scoring core.

use approx::assert_abs_diff_eq;
use classeval::metrics::agreement::binary_kappa;
use classeval::*;
use proptest::prelude::*;

/// (actual, predicted, weight, score grid index) for a two-learner store.
type Row = (usize, usize, f64, u32);

fn row_strategy(num_classes: usize) -> impl Strategy<Value = Row> {
    (0..num_classes, 0..num_classes, 0.1f64..5.0, 0u32..=20)
}

fn probabilities(num_classes: usize, favoured: usize, grid: u32) -> Vec<f64> {
    let p = f64::from(grid) / 20.0;
    let rest = (1.0 - p) / (num_classes - 1) as f64;
    (0..num_classes)
        .map(|c| if c == favoured { p } else { rest })
        .collect()
}

fn store_from(rows: &[Row], num_classes: usize, iterations: usize) -> TestResults {
    let class_values = (0..num_classes).map(|c| format!("c{}", c)).collect();
    let names = vec!["first".into(), "second".into()];
    let mut store = TestResults::new(class_values, names, iterations, true);
    for (i, &(actual, predicted, weight, grid)) in rows.iter().enumerate() {
        store
            .push(
                TestedExample::new(actual, i % iterations, weight)
                    .with_result(predicted, probabilities(num_classes, predicted, grid))
                    .with_result(actual, probabilities(num_classes, actual, 20 - grid)),
            )
            .unwrap();
    }
    store
}

fn binary_scored(scores: &[(bool, f64)]) -> TestResults {
    let mut store = TestResults::new(vec!["neg".into(), "pos".into()], vec!["m".into()], 1, false);
    for &(positive, p) in scores {
        let actual = usize::from(positive);
        store
            .push(TestedExample::new(actual, 0, 1.0).with_result(actual, vec![1.0 - p, p]))
            .unwrap();
    }
    store
}

proptest! {
    #[test]
    fn prop_confusion_totals_equal_weight(
        rows in prop::collection::vec(row_strategy(3), 1..60),
        ignore_weights in any::<bool>(),
    ) {
        let store = store_from(&rows, 3, 1);
        let config = ScoringConfigBuilder::new().ignore_weights(ignore_weights).build().unwrap();
        let total = store.total_weight(ignore_weights);

        for confusion in confusion_matrices(&store, None, &config).unwrap() {
            for m in confusion.matrices() {
                prop_assert!((m.total() - total).abs() < 1e-9);
            }
        }
        for class in 0..3 {
            for m in binary_confusion_matrices(&store, Some(class), &config).unwrap() {
                prop_assert!((m.total() - total).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn prop_auc_invariant_to_monotone_rescaling(
        labels in prop::collection::vec((any::<bool>(), 0u32..=20), 2..50),
    ) {
        let scores: Vec<(bool, f64)> = labels
            .iter()
            .map(|&(positive, grid)| (positive, f64::from(grid) / 20.0))
            .collect();
        let rescaled: Vec<(bool, f64)> = scores
            .iter()
            .map(|&(positive, p)| (positive, (p * p + p) / 2.0))
            .collect();

        let config = ScoringConfig::default();
        let original = auc(&binary_scored(&scores), &config).unwrap();
        let transformed = auc(&binary_scored(&rescaled), &config).unwrap();
        prop_assert!((original[0] - transformed[0]).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&original[0]));
    }

    #[test]
    fn prop_perfect_ranking_scores_one(
        positives in prop::collection::vec(0.6f64..1.0, 1..20),
        negatives in prop::collection::vec(0.0f64..0.4, 1..20),
    ) {
        let scores: Vec<(bool, f64)> = positives
            .iter()
            .map(|&p| (true, p))
            .chain(negatives.iter().map(|&p| (false, p)))
            .collect();
        let store = binary_scored(&scores);
        prop_assert_eq!(auc(&store, &ScoringConfig::default()).unwrap(), vec![1.0]);
    }

    #[test]
    fn prop_rate_identities(
        tp in 0u32..100, fp in 0u32..100, tn in 0u32..100, fn_ in 0u32..100,
    ) {
        let m = ConfusionMatrix::from_counts(
            f64::from(tp),
            f64::from(fp),
            f64::from(tn),
            f64::from(fn_),
        );
        let p = Rate::Precision.of(&m);
        let r = Rate::RECALL.of(&m);

        prop_assert!((m.total() - f64::from(tp + fp + tn + fn_)).abs() < 1e-10);
        if p + r > 0.0 {
            prop_assert!((Rate::F1.of(&m) - 2.0 * p * r / (p + r)).abs() < 1e-10);
        } else {
            prop_assert_eq!(Rate::F1.of(&m), 0.0);
        }
        prop_assert!((Rate::falpha(1.0).of(&m) - Rate::F1.of(&m)).abs() < 1e-10);

        let denominator = (m.predicted_positives()
            * m.actual_positives()
            * m.actual_negatives()
            * m.predicted_negatives())
        .sqrt();
        if denominator > 0.0 {
            let expected = (m.tp() * m.tn() - m.fp() * m.fn_()) / denominator;
            prop_assert!((Rate::Mcc.of(&m) - expected).abs() < 1e-10);
        }
        let mcc = Rate::Mcc.of(&m);
        prop_assert!((-1.0 - 1e-10..=1.0 + 1e-10).contains(&mcc));
        for rate in Rate::ALL {
            let value = rate.of(&m);
            prop_assert!(value.is_finite());
        }
        prop_assert!(binary_kappa(&m).is_finite());
    }

    #[test]
    fn prop_auc_matrix_symmetric(
        rows in prop::collection::vec(row_strategy(3), 1..60),
        iterations in 1usize..4,
    ) {
        let store = store_from(&rows, 3, iterations);
        for m in auc_matrix(&store, &ScoringConfig::default()).unwrap() {
            for i in 0..3 {
                prop_assert_eq!(m[[i, i]], 0.0);
                for j in 0..3 {
                    prop_assert_eq!(m[[i, j]], m[[j, i]]);
                    prop_assert!((0.0..=1.0).contains(&m[[i, j]]));
                }
            }
        }
    }

    #[test]
    fn prop_split_matches_combined_scores(
        rows in prop::collection::vec(row_strategy(3), 1..60),
        iterations in 1usize..4,
        strategy in prop::sample::select(MulticlassStrategy::ALL.to_vec()),
    ) {
        let store = store_from(&rows, 3, iterations);
        let config = ScoringConfigBuilder::new().multiclass(strategy).build().unwrap();
        let ca_all = ca(&store, &config).unwrap();
        let auc_all = auc(&store, &config).unwrap();

        for (i, one) in split_by_classifiers(&store).unwrap().iter().enumerate() {
            prop_assert!((ca(one, &config).unwrap()[0].value - ca_all[i].value).abs() < 1e-10);
            prop_assert!((auc(one, &config).unwrap()[0] - auc_all[i]).abs() < 1e-10);
        }
    }
}

#[test]
fn test_ties_count_half() {
    // One positive and one negative at the same score plus a clean pair.
    let store = binary_scored(&[(true, 0.5), (false, 0.5), (true, 0.9), (false, 0.1)]);
    // Pairs: 0.5~0.5 -> 1/2, 0.5>0.1, 0.9>0.5, 0.9>0.1
    let score = auc(&store, &ScoringConfig::default()).unwrap()[0];
    assert_abs_diff_eq!(score, 3.5 / 4.0, epsilon = 1e-12);
}
