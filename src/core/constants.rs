//! Library constants and scoring defaults.

use crate::core::types::ClassIndex;

/// Library version, taken from the package manifest.
pub const CLASSEVAL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Positive class used for binary metrics when a store does not designate one.
pub const DEFAULT_BASE_CLASS: ClassIndex = 1;

/// Default β for the F-beta (Falpha) score; β = 1 gives F1.
pub const DEFAULT_FBETA: f64 = 1.0;

/// Value returned for a rate whose denominator is zero.
pub const DEGENERATE_RATE: f64 = 0.0;

/// AUC reported when no iteration contains both positive and negative mass.
pub const UNDEFINED_AUC: f64 = 0.5;

/// Tolerance for probability vectors summing to one.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Denominators below this magnitude are treated as zero.
pub const EPSILON: f64 = 1e-15;

/// Default number of cross-validation folds.
pub const DEFAULT_FOLDS: usize = 10;

/// Default fraction of data used for learning in a proportion test.
pub const DEFAULT_LEARNING_PROPORTION: f64 = 0.7;

/// Default seed for the test harness.
pub const DEFAULT_RANDOM_SEED: u64 = 0;

/// Default environment filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";
