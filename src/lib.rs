//! # classeval
//!
//! Scoring core for classifier evaluation over repeated train/test splits.
//!
//! A test harness ([`testing::cross_validation`], [`testing::proportion_test`])
//! produces a [`TestResults`] store holding, for every tested instance and
//! iteration, the actual class and each classifier's predicted class and
//! probability vector. Scorers read the store and return one value per
//! classifier, in `classifier_names` order.
//!
//! ## Features
//!
//! - **Confusion matrices**: binary for a designated class, or one-vs-rest
//!   for every class, weighted by instance weight.
//! - **Rates**: sensitivity, specificity, precision, NPV, F1, F-beta and
//!   Matthews correlation, with `0.0` for zero denominators.
//! - **AUC**: Mann-Whitney estimate averaged over iterations, with four
//!   multiclass strategies, pairwise AUC and the class-pair matrix.
//! - **Accuracy**: weighted classification accuracy with an optional
//!   binomial standard error.
//! - **Splitting**: one store per classifier via [`split_by_classifiers`].
//!
//! ## Quick Start
//!
//! ```rust
//! use classeval::testing::{cross_validation, HarnessOptions, LabeledData, Learner, RandomLearner};
//! use classeval::{MulticlassStrategy, ScoringConfigBuilder};
//! use ndarray::Array2;
//!
//! # fn main() -> classeval::Result<()> {
//! let classes: Vec<usize> = (0..30).map(|i| i % 3).collect();
//! let data = LabeledData::new(
//!     Array2::zeros((30, 2)),
//!     classes,
//!     None,
//!     vec!["setosa".into(), "versicolor".into(), "virginica".into()],
//! )?;
//!
//! let learners: Vec<Box<dyn Learner>> = vec![Box::new(RandomLearner::new())];
//! let results = cross_validation(&learners, &data, 5, &HarnessOptions::default().with_seed(42))?;
//!
//! let config = ScoringConfigBuilder::new()
//!     .multiclass(MulticlassStrategy::ByPairs)
//!     .report_se(true)
//!     .build()?;
//!
//! let auc = classeval::auc(&results, &config)?;
//! let ca = classeval::ca(&results, &config)?;
//! assert_eq!(auc.len(), 1);
//! assert!(ca[0].se.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Scorers log through the `log` facade. Call [`init`] to install
//! `env_logger` with an `info` default filter, or install any other logger.

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

// Errors, shared types, constants and logging setup
pub mod core;

// Scoring options
pub mod config;

// Prediction record store
pub mod results;

// Test-execution harness
pub mod testing;

// Scorers
pub mod metrics;

pub use core::{
    constants::*,
    error::{EvalError, Result},
    types::*,
};

pub use config::{ScoringConfig, ScoringConfigBuilder};

pub use results::{split_by_classifiers, TestResults, TestedExample};

pub use metrics::{
    auc, auc_for_pair_of_classes, auc_for_single_class, auc_matrix, auc_wilcoxon,
    average_probability, binary_confusion_matrices, brier_score, ca, ca_by_iterations,
    class_confusion_matrix, cohen_kappa, confusion_matrices, kappa, ClassifierConfusion,
    ConfusionMatrix, Rate, ScoreInput,
};

// Version information
pub use core::constants::CLASSEVAL_VERSION as VERSION;

/// Install the default logger.
///
/// Optional: scorers work without a logger. Safe to call repeatedly.
///
/// ```rust
/// classeval::init();
/// assert!(classeval::is_initialized());
/// ```
pub fn init() {
    core::initialize_logging()
}

/// Whether [`init`] has run.
pub fn is_initialized() -> bool {
    core::is_logging_initialized()
}
