//! Binary and one-vs-rest confusion matrices.

use crate::config::ScoringConfig;
use crate::core::error::{EvalError, Result};
use crate::core::types::*;
use crate::results::{TestResults, TestedExample};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TP/FP/TN/FN accumulators for one "positive class vs the rest" split.
///
/// Cells hold weighted sums when the store carries weights, so
/// `tp + fp + tn + fn_` is the total weight of the scored slice.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    tp: f64,
    fp: f64,
    tn: f64,
    fn_: f64,
}

impl ConfusionMatrix {
    /// A matrix from explicit cell values.
    pub fn from_counts(tp: f64, fp: f64, tn: f64, fn_: f64) -> Self {
        Self { tp, fp, tn, fn_ }
    }

    /// True positives
    pub fn tp(&self) -> f64 {
        self.tp
    }

    /// False positives
    pub fn fp(&self) -> f64 {
        self.fp
    }

    /// True negatives
    pub fn tn(&self) -> f64 {
        self.tn
    }

    /// False negatives
    pub fn fn_(&self) -> f64 {
        self.fn_
    }

    /// Total weight of the scored slice
    pub fn total(&self) -> f64 {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Weight of correctly classified instances
    pub fn correct(&self) -> f64 {
        self.tp + self.tn
    }

    /// Weight of actual positives
    pub fn actual_positives(&self) -> f64 {
        self.tp + self.fn_
    }

    /// Weight of actual negatives
    pub fn actual_negatives(&self) -> f64 {
        self.tn + self.fp
    }

    /// Weight of predicted positives
    pub fn predicted_positives(&self) -> f64 {
        self.tp + self.fp
    }

    /// Weight of predicted negatives
    pub fn predicted_negatives(&self) -> f64 {
        self.tn + self.fn_
    }

    fn add(&mut self, actual_positive: bool, predicted_positive: bool, weight: Weight) {
        match (actual_positive, predicted_positive) {
            (true, true) => self.tp += weight,
            (false, true) => self.fp += weight,
            (false, false) => self.tn += weight,
            (true, false) => self.fn_ += weight,
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TP={} FP={} TN={} FN={}",
            self.tp, self.fp, self.tn, self.fn_
        )
    }
}

/// Confusion information for one classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassifierConfusion {
    /// A single binary matrix for the designated positive class
    Binary(ConfusionMatrix),
    /// One matrix per class, each treating that class as positive
    OneVsRest(Vec<ConfusionMatrix>),
}

impl ClassifierConfusion {
    /// The binary matrix, if this is the binary form.
    pub fn as_binary(&self) -> Option<&ConfusionMatrix> {
        match self {
            ClassifierConfusion::Binary(m) => Some(m),
            ClassifierConfusion::OneVsRest(_) => None,
        }
    }

    /// Every matrix of this classifier (one for the binary form).
    pub fn matrices(&self) -> &[ConfusionMatrix] {
        match self {
            ClassifierConfusion::Binary(m) => std::slice::from_ref(m),
            ClassifierConfusion::OneVsRest(ms) => ms,
        }
    }

    /// Total weight of the scored slice.
    pub fn total(&self) -> f64 {
        self.matrices().first().map(|m| m.total()).unwrap_or(0.0)
    }
}

/// Confusion matrices per classifier, in `classifier_names` order.
///
/// - two classes, no `class_index`: binary form with `base_class` positive
/// - `class_index` given: binary form with that class positive
/// - more than two classes, no `class_index`: one-vs-rest form
///
/// With `config.cutoff` set, the binary form counts an instance as
/// predicted positive when its positive-class probability exceeds the
/// cutoff instead of using the predicted label.
pub fn confusion_matrices(
    store: &TestResults,
    class_index: Option<ClassIndex>,
    config: &ScoringConfig,
) -> Result<Vec<ClassifierConfusion>> {
    store.validate()?;
    if let Some(class) = class_index {
        store.check_class_index(class)?;
    }

    match (class_index, store.num_classes()) {
        (Some(positive), _) => Ok(binary_for(store, positive, config)
            .into_iter()
            .map(ClassifierConfusion::Binary)
            .collect()),
        (None, 2) => Ok(binary_for(store, store.positive_class(), config)
            .into_iter()
            .map(ClassifierConfusion::Binary)
            .collect()),
        (None, n) if n > 2 => Ok(one_vs_rest(store, config)
            .into_iter()
            .map(ClassifierConfusion::OneVsRest)
            .collect()),
        (None, n) => Err(EvalError::class_cardinality("at least 2 classes", n)),
    }
}

/// Binary confusion matrix per classifier.
///
/// Fails on a store with more than two classes unless `class_index` picks
/// the positive class.
pub fn binary_confusion_matrices(
    store: &TestResults,
    class_index: Option<ClassIndex>,
    config: &ScoringConfig,
) -> Result<Vec<ConfusionMatrix>> {
    if class_index.is_none() && store.num_classes() != 2 {
        return Err(EvalError::class_cardinality(
            "exactly 2 classes when no class index is given",
            store.num_classes(),
        ));
    }
    confusion_matrices(store, class_index, config)?
        .into_iter()
        .map(|c| match c {
            ClassifierConfusion::Binary(m) => Ok(m),
            ClassifierConfusion::OneVsRest(_) => Err(EvalError::internal(
                "binary confusion requested but one-vs-rest form was built",
            )),
        })
        .collect()
}

fn binary_for(
    store: &TestResults,
    positive: ClassIndex,
    config: &ScoringConfig,
) -> Vec<ConfusionMatrix> {
    log::debug!(
        "Building binary confusion matrices for class {} over {} records",
        positive,
        store.len()
    );
    (0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            let mut matrix = ConfusionMatrix::default();
            for ex in &store.results {
                matrix.add(
                    ex.actual_class == positive,
                    predicted_positive(ex, learner, positive, config.cutoff),
                    store.weight_of(ex, config.ignore_weights),
                );
            }
            matrix
        })
        .collect()
}

fn predicted_positive(
    ex: &TestedExample,
    learner: LearnerIndex,
    positive: ClassIndex,
    cutoff: Option<f64>,
) -> bool {
    match cutoff {
        Some(cutoff) => ex.probability(learner, positive) > cutoff,
        None => ex.classes[learner] == positive,
    }
}

fn one_vs_rest(store: &TestResults, config: &ScoringConfig) -> Vec<Vec<ConfusionMatrix>> {
    let num_classes = store.num_classes();
    log::debug!(
        "Building one-vs-rest confusion matrices for {} classes over {} records",
        num_classes,
        store.len()
    );
    (0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            let mut matrices = vec![ConfusionMatrix::default(); num_classes];
            for ex in &store.results {
                let weight = store.weight_of(ex, config.ignore_weights);
                let predicted = ex.classes[learner];
                for (class, matrix) in matrices.iter_mut().enumerate() {
                    matrix.add(ex.actual_class == class, predicted == class, weight);
                }
            }
            matrices
        })
        .collect()
}
