//! Scorers over prediction stores and confusion matrices.
//!
//! - [`confusion`]: binary and one-vs-rest confusion matrices
//! - [`rates`]: sensitivity, specificity, precision, NPV, F1, F-beta, MCC
//! - [`accuracy`]: classification accuracy with optional standard error
//! - [`auc`]: rank-based AUC and its multiclass extensions
//! - [`agreement`]: full class-by-class matrices and Cohen's kappa
//! - [`probability`]: Brier score and average probability of the actual class
//!
//! Rate and accuracy scorers accept a [`ScoreInput`], so the same call
//! works on a store, a single confusion matrix, a list of matrices or the
//! per-classifier output of [`confusion::confusion_matrices`].
//!
//! # Examples
//!
//! ```rust
//! use classeval::metrics::{auc, ca, confusion_matrices, Rate};
//! use classeval::{ScoringConfig, TestResults, TestedExample};
//!
//! # fn main() -> classeval::Result<()> {
//! let classes = vec!["no".into(), "yes".into()];
//! let mut store = TestResults::new(classes, vec!["model".into()], 1, false);
//! store.push(TestedExample::new(1, 0, 1.0).with_result(1, vec![0.2, 0.8]))?;
//! store.push(TestedExample::new(0, 0, 1.0).with_result(0, vec![0.7, 0.3]))?;
//!
//! let config = ScoringConfig::default();
//! assert_eq!(auc(&store, &config)?, vec![1.0]);
//! assert_eq!(ca(&store, &config)?[0].value, 1.0);
//!
//! let matrices = confusion_matrices(&store, None, &config)?;
//! assert_eq!(Rate::Sensitivity.score(&matrices, &config)?, vec![1.0]);
//! # Ok(())
//! # }
//! ```

pub mod accuracy;
pub mod agreement;
pub mod auc;
pub mod confusion;
pub mod probability;
pub mod rates;

pub use accuracy::{ca, ca_by_iterations};
pub use agreement::{class_confusion_matrix, cohen_kappa, kappa};
pub use auc::{
    auc, auc_for_pair_of_classes, auc_for_single_class, auc_matrix, auc_wilcoxon,
};
pub use confusion::{
    binary_confusion_matrices, confusion_matrices, ClassifierConfusion, ConfusionMatrix,
};
pub use probability::{average_probability, brier_score};
pub use rates::Rate;

use crate::results::TestResults;

/// The shapes a rate or accuracy scorer accepts.
#[derive(Debug, Clone, Copy)]
pub enum ScoreInput<'a> {
    /// A prediction store; confusion matrices are built on demand
    Results(&'a TestResults),
    /// One binary confusion matrix; scores to a single value
    Matrix(&'a ConfusionMatrix),
    /// A sequence of binary confusion matrices; one value per entry
    Matrices(&'a [ConfusionMatrix]),
    /// Per-classifier output of [`confusion_matrices`]; one value per classifier
    PerClassifier(&'a [ClassifierConfusion]),
}

impl<'a> From<&'a TestResults> for ScoreInput<'a> {
    fn from(store: &'a TestResults) -> Self {
        ScoreInput::Results(store)
    }
}

impl<'a> From<&'a ConfusionMatrix> for ScoreInput<'a> {
    fn from(matrix: &'a ConfusionMatrix) -> Self {
        ScoreInput::Matrix(matrix)
    }
}

impl<'a> From<&'a [ConfusionMatrix]> for ScoreInput<'a> {
    fn from(matrices: &'a [ConfusionMatrix]) -> Self {
        ScoreInput::Matrices(matrices)
    }
}

impl<'a> From<&'a Vec<ConfusionMatrix>> for ScoreInput<'a> {
    fn from(matrices: &'a Vec<ConfusionMatrix>) -> Self {
        ScoreInput::Matrices(matrices.as_slice())
    }
}

impl<'a> From<&'a [ClassifierConfusion]> for ScoreInput<'a> {
    fn from(confusions: &'a [ClassifierConfusion]) -> Self {
        ScoreInput::PerClassifier(confusions)
    }
}

impl<'a> From<&'a Vec<ClassifierConfusion>> for ScoreInput<'a> {
    fn from(confusions: &'a Vec<ClassifierConfusion>) -> Self {
        ScoreInput::PerClassifier(confusions.as_slice())
    }
}

/// `numerator / denominator`, or `fallback` when the denominator is (near) zero.
pub(crate) fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() < crate::core::constants::EPSILON {
        fallback
    } else {
        numerator / denominator
    }
}

/// Weighted mean of the defined components; `fallback` when none is defined
/// or all weights vanish.
pub(crate) fn weighted_mean<I>(components: I, fallback: f64) -> f64
where
    I: IntoIterator<Item = (Option<f64>, f64)>,
{
    let (sum, weight) = components
        .into_iter()
        .filter_map(|(value, weight)| value.map(|v| (v * weight, weight)))
        .fold((0.0, 0.0), |(s, w), (vs, vw)| (s + vs, w + vw));
    ratio_or(sum, weight, fallback)
}
