//! Common test utilities for classeval integration tests.

#![allow(dead_code)]

use classeval::testing::{Classifier, LabeledData, Learner, MajorityLearner, RandomLearner};
use classeval::*;
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;

/// Two-class data following the monks-1 rule: positive when the first two
/// attributes agree or the fifth attribute is 1.
pub fn monks_like(num_samples: usize) -> LabeledData {
    let mut rng = StdRng::seed_from_u64(42);
    let arities = [3, 3, 2, 3, 4, 2];

    let mut features = Array2::zeros((num_samples, arities.len()));
    let mut classes = Vec::with_capacity(num_samples);
    for i in 0..num_samples {
        for (j, &arity) in arities.iter().enumerate() {
            features[[i, j]] = rng.gen_range(1..=arity) as f64;
        }
        let positive = features[[i, 0]] == features[[i, 1]] || features[[i, 4]] == 1.0;
        classes.push(usize::from(positive));
    }

    LabeledData::new(features, classes, None, vec!["0".into(), "1".into()])
        .expect("valid monks-like data")
}

/// Three well separated classes with four numeric features, 50 each.
pub fn iris_like() -> LabeledData {
    let mut rng = StdRng::seed_from_u64(123);
    let centres = [
        [5.0, 3.4, 1.5, 0.2],
        [5.9, 2.8, 4.3, 1.3],
        [6.6, 3.0, 5.6, 2.0],
    ];

    let mut features = Array2::zeros((150, 4));
    let mut classes = Vec::with_capacity(150);
    for i in 0..150 {
        let class = i % 3;
        for j in 0..4 {
            features[[i, j]] = centres[class][j] + rng.gen_range(-0.4..0.4);
        }
        classes.push(class);
    }

    LabeledData::new(
        features,
        classes,
        None,
        vec!["setosa".into(), "versicolor".into(), "virginica".into()],
    )
    .expect("valid iris-like data")
}

/// Small imbalanced three-class data with instance weights (4/5/15 split).
pub fn lenses_like() -> LabeledData {
    let mut rng = StdRng::seed_from_u64(456);
    let counts = [4, 5, 15];

    let total: usize = counts.iter().sum();
    let mut features = Array2::zeros((total, 4));
    let mut classes = Vec::with_capacity(total);
    let mut weights = Vec::with_capacity(total);
    let mut row = 0;
    for (class, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            for j in 0..4 {
                features[[row, j]] = class as f64 + rng.gen_range(-1.0..1.0);
            }
            classes.push(class);
            weights.push(rng.gen_range(0.5..2.0));
            row += 1;
        }
    }

    LabeledData::new(
        features,
        classes,
        Some(weights),
        vec!["hard".into(), "soft".into(), "none".into()],
    )
    .expect("valid lenses-like data")
}

/// Learner assigning each row to the class with the nearest feature mean.
#[derive(Debug, Clone, Default)]
pub struct NearestMeanLearner;

#[derive(Debug)]
struct NearestMeanClassifier {
    means: Vec<Vec<f64>>,
}

impl Learner for NearestMeanLearner {
    fn name(&self) -> &str {
        "nearest_mean"
    }

    fn fit(&self, data: &LabeledData, _seed: u64) -> Result<Box<dyn Classifier>> {
        let width = data.features().ncols();
        let mut sums = vec![vec![0.0; width]; data.num_classes()];
        let mut counts = vec![0.0; data.num_classes()];
        for i in 0..data.len() {
            let class = data.class_of(i);
            for (s, x) in sums[class].iter_mut().zip(data.row(i).iter()) {
                *s += x;
            }
            counts[class] += 1.0;
        }
        let means = sums
            .into_iter()
            .zip(counts)
            .map(|(s, n)| s.into_iter().map(|v| if n > 0.0 { v / n } else { 0.0 }).collect())
            .collect();
        Ok(Box::new(NearestMeanClassifier { means }))
    }
}

impl Classifier for NearestMeanClassifier {
    fn predict(&mut self, row: ArrayView1<'_, f64>) -> (usize, Vec<f64>) {
        let closeness: Vec<f64> = self
            .means
            .iter()
            .map(|mean| {
                let d2: f64 = mean.iter().zip(row.iter()).map(|(m, x)| (m - x).powi(2)).sum();
                (-d2).exp()
            })
            .collect();
        let total: f64 = closeness.iter().sum();
        let probs: Vec<f64> = if total > 0.0 {
            closeness.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / closeness.len() as f64; closeness.len()]
        };
        let best = probs
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0;
        (best, probs)
    }
}

/// Random, majority and nearest-mean learners, in that order.
pub fn baseline_learners() -> Vec<Box<dyn Learner>> {
    vec![
        Box::new(RandomLearner::new()),
        Box::new(MajorityLearner::new()),
        Box::new(NearestMeanLearner),
    ]
}

/// Store with a perfect, an inverted and a constant classifier over a
/// two-class problem spread over `iterations` iterations.
pub fn ranked_binary_store(iterations: usize) -> TestResults {
    let mut store = TestResults::new(
        vec!["neg".into(), "pos".into()],
        vec!["perfect".into(), "inverted".into(), "constant".into()],
        iterations,
        false,
    );
    for iteration in 0..iterations {
        for k in 0..4 {
            let actual = k % 2;
            let p = if actual == 1 { 0.6 + 0.1 * k as f64 } else { 0.1 * k as f64 };
            store
                .push(
                    TestedExample::new(actual, iteration, 1.0)
                        .with_result(actual, vec![1.0 - p, p])
                        .with_result(1 - actual, vec![p, 1.0 - p])
                        .with_result(1, vec![0.5, 0.5]),
                )
                .expect("valid record");
        }
    }
    store
}

/// Assert two score vectors agree elementwise within `eps`.
pub fn assert_scores_close(actual: &[f64], expected: &[f64], eps: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() <= eps, "entry {}: {} vs {}", i, a, e);
    }
}
