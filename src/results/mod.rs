//! Prediction records produced by the test harness.
//!
//! A [`TestResults`] store is the single input of every scorer. It holds one
//! [`TestedExample`] per tested instance per iteration, each carrying the
//! actual class, one predicted class and one probability vector per
//! classifier, the iteration that produced it and the instance weight.
//! Stores are built once by the harness and read-only afterwards.

pub mod partition;

pub use partition::split_by_classifiers;

use crate::core::constants::*;
use crate::core::error::{EvalError, Result};
use crate::core::types::*;
use crate::testing::LabeledData;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of testing one instance with every classifier of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestedExample {
    /// Actual class index
    pub actual_class: ClassIndex,
    /// Predicted class index, one per classifier
    pub classes: Vec<ClassIndex>,
    /// Probability vector over the class values, one per classifier
    pub probabilities: Vec<Vec<f64>>,
    /// Iteration (fold or resampling round) that produced this record
    pub iteration_number: IterationIndex,
    /// Instance weight, 1.0 when the store has no weights
    pub weight: Weight,
}

impl TestedExample {
    /// An empty record; predictions are appended with [`TestedExample::add_result`].
    pub fn new(actual_class: ClassIndex, iteration_number: IterationIndex, weight: Weight) -> Self {
        Self {
            actual_class,
            classes: Vec::new(),
            probabilities: Vec::new(),
            iteration_number,
            weight,
        }
    }

    /// Append the prediction of the next classifier.
    pub fn add_result(&mut self, class: ClassIndex, probabilities: Vec<f64>) {
        self.classes.push(class);
        self.probabilities.push(probabilities);
    }

    /// Builder-style [`TestedExample::add_result`].
    pub fn with_result(mut self, class: ClassIndex, probabilities: Vec<f64>) -> Self {
        self.add_result(class, probabilities);
        self
    }

    /// Number of classifiers recorded
    pub fn number_of_learners(&self) -> usize {
        self.classes.len()
    }

    /// Whether classifier `learner` predicted the actual class.
    pub fn is_correct(&self, learner: LearnerIndex) -> bool {
        self.classes[learner] == self.actual_class
    }

    /// Probability classifier `learner` assigned to `class`.
    pub fn probability(&self, learner: LearnerIndex, class: ClassIndex) -> f64 {
        self.probabilities[learner][class]
    }

    /// The same record reduced to the prediction of one classifier.
    pub fn narrowed(&self, learner: LearnerIndex) -> TestedExample {
        TestedExample {
            actual_class: self.actual_class,
            classes: vec![self.classes[learner]],
            probabilities: vec![self.probabilities[learner].clone()],
            iteration_number: self.iteration_number,
            weight: self.weight,
        }
    }
}

/// Ordered prediction records plus the run-level metadata describing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResults {
    /// Ordered class labels
    pub class_values: Vec<String>,
    /// Designated positive class for binary metrics
    pub base_class: Option<ClassIndex>,
    /// Ordered classifier identifiers
    pub classifier_names: Vec<String>,
    /// Number of independent train/test repetitions
    pub number_of_iterations: usize,
    /// Whether per-instance weights are present and must be honoured
    pub weights: bool,
    /// Source dataset, kept only for reproducibility and debugging
    #[serde(skip)]
    pub examples: Option<Arc<LabeledData>>,
    /// Prediction records in harness order
    pub results: Vec<TestedExample>,
}

impl PartialEq for TestResults {
    fn eq(&self, other: &Self) -> bool {
        let same_examples = match (&self.examples, &other.examples) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
            (None, None) => true,
            _ => false,
        };
        same_examples
            && self.class_values == other.class_values
            && self.base_class == other.base_class
            && self.classifier_names == other.classifier_names
            && self.number_of_iterations == other.number_of_iterations
            && self.weights == other.weights
            && self.results == other.results
    }
}

impl TestResults {
    /// Create an empty store.
    pub fn new(
        class_values: Vec<String>,
        classifier_names: Vec<String>,
        number_of_iterations: usize,
        weights: bool,
    ) -> Self {
        Self {
            class_values,
            base_class: None,
            classifier_names,
            number_of_iterations,
            weights,
            examples: None,
            results: Vec::new(),
        }
    }

    /// Designate the positive class for binary metrics.
    pub fn with_base_class(mut self, base_class: ClassIndex) -> Self {
        self.base_class = Some(base_class);
        self
    }

    /// Keep a reference to the tested dataset.
    pub fn with_examples(mut self, examples: Arc<LabeledData>) -> Self {
        self.examples = Some(examples);
        self
    }

    /// Append a record, checking it against the store's shape.
    pub fn push(&mut self, example: TestedExample) -> Result<()> {
        self.check_example(&example)?;
        self.results.push(example);
        Ok(())
    }

    /// Number of class values
    pub fn num_classes(&self) -> usize {
        self.class_values.len()
    }

    /// Number of classifiers evaluated together
    pub fn number_of_learners(&self) -> usize {
        self.classifier_names.len()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the store has no records
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Positive class for binary metrics: `base_class`, or class 1 when unset.
    pub fn positive_class(&self) -> ClassIndex {
        self.base_class.unwrap_or(DEFAULT_BASE_CLASS)
    }

    /// Effective weight of a record.
    pub fn weight_of(&self, example: &TestedExample, ignore_weights: bool) -> Weight {
        if self.weights && !ignore_weights {
            example.weight
        } else {
            1.0
        }
    }

    /// Total effective weight of every record.
    pub fn total_weight(&self, ignore_weights: bool) -> f64 {
        self.results
            .iter()
            .map(|ex| self.weight_of(ex, ignore_weights))
            .sum()
    }

    /// Fail unless `class_index` names one of the class values.
    pub fn check_class_index(&self, class_index: ClassIndex) -> Result<()> {
        if class_index >= self.num_classes() {
            return Err(EvalError::class_index_out_of_range(
                class_index,
                self.num_classes(),
            ));
        }
        Ok(())
    }

    /// Fail unless the store has at least two class values.
    pub fn require_classes(&self) -> Result<()> {
        if self.num_classes() < 2 {
            return Err(EvalError::class_cardinality(
                "at least 2 classes",
                self.num_classes(),
            ));
        }
        Ok(())
    }

    /// Weighted class priors over all records, normalised to sum to one.
    pub fn class_distribution(&self, ignore_weights: bool) -> Vec<f64> {
        let mut dist = vec![0.0; self.num_classes()];
        for ex in &self.results {
            if let Some(slot) = dist.get_mut(ex.actual_class) {
                *slot += self.weight_of(ex, ignore_weights);
            }
        }
        let total: f64 = dist.iter().sum();
        if total > 0.0 {
            dist.iter_mut().for_each(|d| *d /= total);
        }
        dist
    }

    /// Records grouped by iteration, indexed by iteration number.
    pub fn iteration_slices(&self) -> Vec<Vec<&TestedExample>> {
        let mut slices = vec![Vec::new(); self.number_of_iterations.max(1)];
        for ex in &self.results {
            if let Some(slice) = slices.get_mut(ex.iteration_number) {
                slice.push(ex);
            }
        }
        slices
    }

    /// Check every record against the store's shape: learner count,
    /// probability-vector length and finiteness, class index ranges,
    /// iteration range and weight validity.
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = self.base_class {
            self.check_class_index(base)?;
        }
        for ex in &self.results {
            self.check_example(ex)?;
        }
        Ok(())
    }

    fn check_example(&self, ex: &TestedExample) -> Result<()> {
        let learners = self.number_of_learners();
        if ex.classes.len() != learners || ex.probabilities.len() != learners {
            return Err(EvalError::learner_count_mismatch(
                learners,
                ex.classes.len().max(ex.probabilities.len()),
            ));
        }
        self.check_class_index(ex.actual_class)?;
        for (&class, probs) in ex.classes.iter().zip(&ex.probabilities) {
            self.check_class_index(class)?;
            if probs.len() != self.num_classes() {
                return Err(EvalError::dimension_mismatch(
                    format!("probabilities: {}", self.num_classes()),
                    format!("probabilities: {}", probs.len()),
                ));
            }
            if let Some(bad) = probs.iter().find(|p| !p.is_finite()) {
                return Err(EvalError::invalid_parameter(
                    "probabilities",
                    bad.to_string(),
                    "must be finite",
                ));
            }
        }
        if ex.iteration_number >= self.number_of_iterations {
            return Err(EvalError::invalid_parameter(
                "iteration_number",
                ex.iteration_number.to_string(),
                format!("must be below number_of_iterations = {}", self.number_of_iterations),
            ));
        }
        if !ex.weight.is_finite() || ex.weight < 0.0 {
            return Err(EvalError::invalid_parameter(
                "weight",
                ex.weight.to_string(),
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Serialize the store (without the dataset back-reference) as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a store from [`TestResults::to_json`] output.
    pub fn from_json(json: &str) -> Result<Self> {
        let store: TestResults = serde_json::from_str(json)?;
        store.validate()?;
        Ok(store)
    }
}
