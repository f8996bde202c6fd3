//! Test-execution harness producing [`TestResults`].
//!
//! Splits labeled data, trains each learner on the learning part, predicts
//! the held-out part and records one [`TestedExample`] per held-out
//! instance per iteration. All randomness flows from an explicit seed so
//! reruns are bit-for-bit reproducible.
//!
//! ```rust
//! use classeval::testing::{cross_validation, HarnessOptions, Learner, RandomLearner};
//! # use classeval::testing::LabeledData;
//! # use ndarray::Array2;
//! # fn main() -> classeval::Result<()> {
//! # let data = LabeledData::new(Array2::zeros((10, 1)), vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
//! #     None, vec!["no".into(), "yes".into()])?;
//! let learners: Vec<Box<dyn Learner>> = vec![Box::new(RandomLearner::new())];
//! let results = cross_validation(&learners, &data, 5, &HarnessOptions::default())?;
//! assert_eq!(results.number_of_iterations, 5);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod learners;

pub use data::LabeledData;
pub use learners::{MajorityLearner, RandomLearner};

use crate::core::constants::*;
use crate::core::error::{EvalError, Result};
use crate::core::types::*;
use crate::results::{TestResults, TestedExample};

use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// A trained model.
pub trait Classifier {
    /// Predicted class and probability vector over the class values for one row.
    fn predict(&mut self, row: ArrayView1<'_, f64>) -> (ClassIndex, Vec<f64>);
}

/// Something that can be trained into a [`Classifier`].
pub trait Learner {
    /// Identifier recorded in [`TestResults::classifier_names`].
    fn name(&self) -> &str;

    /// Train on `data`. `seed` is the only source of randomness available
    /// to the learner and the classifier it returns.
    fn fit(&self, data: &LabeledData, seed: u64) -> Result<Box<dyn Classifier>>;
}

/// Options shared by [`cross_validation`] and [`proportion_test`].
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessOptions {
    /// Seed for splitting and for every learner
    pub seed: u64,
    /// Keep class proportions equal across folds/splits
    pub stratified: bool,
    /// Keep a reference to the dataset in the produced store
    pub store_examples: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_RANDOM_SEED,
            stratified: true,
            store_examples: false,
        }
    }
}

impl HarnessOptions {
    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable stratification
    pub fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    /// Keep the dataset reference in the store
    pub fn with_store_examples(mut self, store: bool) -> Self {
        self.store_examples = store;
        self
    }
}

/// k-fold cross-validation.
///
/// Every instance is tested exactly once, in the iteration equal to its
/// fold index.
pub fn cross_validation(
    learners: &[Box<dyn Learner>],
    data: &LabeledData,
    folds: usize,
    options: &HarnessOptions,
) -> Result<TestResults> {
    check_inputs(learners, data)?;
    if folds < 2 {
        return Err(EvalError::invalid_parameter(
            "folds",
            folds.to_string(),
            "must be at least 2",
        ));
    }
    if folds > data.len() {
        return Err(EvalError::invalid_parameter(
            "folds",
            folds.to_string(),
            format!("cannot exceed the number of instances ({})", data.len()),
        ));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let assignment = fold_assignment(data, folds, options.stratified, &mut rng);
    let mut store = empty_store(learners, data, folds, options);

    for fold in 0..folds {
        let (train, test): (Vec<usize>, Vec<usize>) =
            (0..data.len()).partition(|&i| assignment[i] != fold);
        log::debug!(
            "Cross-validation fold {}/{}: {} learning, {} testing",
            fold + 1,
            folds,
            train.len(),
            test.len()
        );
        run_iteration(learners, data, &train, &test, fold, &mut rng, &mut store)?;
    }

    Ok(store)
}

/// Repeated random learning/testing splits.
///
/// Each of the `times` iterations learns on `learning_proportion` of the
/// data and tests on the rest.
pub fn proportion_test(
    learners: &[Box<dyn Learner>],
    data: &LabeledData,
    learning_proportion: f64,
    times: usize,
    options: &HarnessOptions,
) -> Result<TestResults> {
    check_inputs(learners, data)?;
    if !(learning_proportion > 0.0 && learning_proportion < 1.0) {
        return Err(EvalError::invalid_parameter(
            "learning_proportion",
            learning_proportion.to_string(),
            "must be in range (0.0, 1.0)",
        ));
    }
    if times == 0 {
        return Err(EvalError::invalid_parameter(
            "times",
            "0",
            "must be at least 1",
        ));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut store = empty_store(learners, data, times, options);

    for iteration in 0..times {
        let in_test = split_assignment(data, learning_proportion, options.stratified, &mut rng);
        let (test, train): (Vec<usize>, Vec<usize>) =
            (0..data.len()).partition(|&i| in_test[i]);
        log::debug!(
            "Proportion test iteration {}/{}: {} learning, {} testing",
            iteration + 1,
            times,
            train.len(),
            test.len()
        );
        run_iteration(learners, data, &train, &test, iteration, &mut rng, &mut store)?;
    }

    Ok(store)
}

fn check_inputs(learners: &[Box<dyn Learner>], data: &LabeledData) -> Result<()> {
    if learners.is_empty() {
        return Err(EvalError::learner_count_mismatch(1, 0));
    }
    if data.is_empty() {
        return Err(EvalError::EmptyResults);
    }
    if data.num_classes() < 2 {
        return Err(EvalError::class_cardinality(
            "at least 2 classes",
            data.num_classes(),
        ));
    }
    Ok(())
}

fn empty_store(
    learners: &[Box<dyn Learner>],
    data: &LabeledData,
    iterations: usize,
    options: &HarnessOptions,
) -> TestResults {
    let names = learners.iter().map(|l| l.name().to_string()).collect();
    let store = TestResults::new(
        data.class_values().to_vec(),
        names,
        iterations,
        data.has_weights(),
    );
    if options.store_examples {
        store.with_examples(Arc::new(data.clone()))
    } else {
        store
    }
}

fn run_iteration(
    learners: &[Box<dyn Learner>],
    data: &LabeledData,
    train: &[usize],
    test: &[usize],
    iteration: IterationIndex,
    rng: &mut StdRng,
    store: &mut TestResults,
) -> Result<()> {
    let learning = data.subset(train);
    let mut classifiers = learners
        .iter()
        .map(|learner| learner.fit(&learning, rng.gen()))
        .collect::<Result<Vec<_>>>()?;

    for &i in test {
        let mut example = TestedExample::new(data.class_of(i), iteration, data.weight_of(i));
        for classifier in classifiers.iter_mut() {
            let (class, probabilities) = classifier.predict(data.row(i));
            example.add_result(class, probabilities);
        }
        store.push(example)?;
    }
    Ok(())
}

/// Fold index for every instance. Stratified assignment shuffles each
/// class separately and deals its members round-robin, continuing the
/// rotation across classes so fold sizes differ by at most one.
fn fold_assignment(
    data: &LabeledData,
    folds: usize,
    stratified: bool,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut assignment = vec![0; data.len()];
    let mut next_fold = 0;
    for group in shuffled_groups(data, stratified, rng) {
        for i in group {
            assignment[i] = next_fold;
            next_fold = (next_fold + 1) % folds;
        }
    }
    assignment
}

/// Test-membership mask for one proportion-test split.
fn split_assignment(
    data: &LabeledData,
    learning_proportion: f64,
    stratified: bool,
    rng: &mut StdRng,
) -> Vec<bool> {
    let mut in_test = vec![false; data.len()];
    for group in shuffled_groups(data, stratified, rng) {
        let learn = (group.len() as f64 * learning_proportion).round() as usize;
        for &i in &group[learn.min(group.len())..] {
            in_test[i] = true;
        }
    }
    in_test
}

fn shuffled_groups(data: &LabeledData, stratified: bool, rng: &mut StdRng) -> Vec<Vec<usize>> {
    let mut groups = if stratified {
        let mut by_class = vec![Vec::new(); data.num_classes()];
        for i in 0..data.len() {
            by_class[data.class_of(i)].push(i);
        }
        by_class
    } else {
        vec![(0..data.len()).collect()]
    };
    for group in groups.iter_mut() {
        group.shuffle(rng);
    }
    groups
}
