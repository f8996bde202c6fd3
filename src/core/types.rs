//! Core data types shared by the store, the harness and the scorers.

use crate::core::error::EvalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a class label within a store's `class_values`.
pub type ClassIndex = usize;

/// Index of a classifier within a store's `classifier_names`.
pub type LearnerIndex = usize;

/// Index of a train/test repetition (fold or resampling round).
pub type IterationIndex = usize;

/// Per-instance weight. Defaults to 1.0 when a store carries no weights.
pub type Weight = f64;

/// Strategy for extending binary AUC to problems with more than two classes.
///
/// All four strategies share the same binary Mann-Whitney primitive and
/// differ only in which binary splits they score and how they aggregate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MulticlassStrategy {
    /// Unweighted mean of the AUC over every unordered pair of classes
    ByPairs,
    /// Mean of pairwise AUCs weighted by the product of class priors
    ByWeightedPairs,
    /// Unweighted mean of one-vs-rest AUCs
    OneAgainstAll,
    /// Mean of one-vs-rest AUCs weighted by class priors
    WeightedOneAgainstAll,
}

impl MulticlassStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [MulticlassStrategy; 4] = [
        MulticlassStrategy::ByPairs,
        MulticlassStrategy::ByWeightedPairs,
        MulticlassStrategy::OneAgainstAll,
        MulticlassStrategy::WeightedOneAgainstAll,
    ];

    /// Whether the strategy scores class pairs rather than one-vs-rest splits.
    pub fn is_pairwise(&self) -> bool {
        matches!(
            self,
            MulticlassStrategy::ByPairs | MulticlassStrategy::ByWeightedPairs
        )
    }

    /// Whether the strategy weights its components by class priors.
    pub fn is_weighted(&self) -> bool {
        matches!(
            self,
            MulticlassStrategy::ByWeightedPairs | MulticlassStrategy::WeightedOneAgainstAll
        )
    }
}

impl Default for MulticlassStrategy {
    fn default() -> Self {
        MulticlassStrategy::ByWeightedPairs
    }
}

impl fmt::Display for MulticlassStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MulticlassStrategy::ByPairs => write!(f, "by_pairs"),
            MulticlassStrategy::ByWeightedPairs => write!(f, "by_weighted_pairs"),
            MulticlassStrategy::OneAgainstAll => write!(f, "one_against_all"),
            MulticlassStrategy::WeightedOneAgainstAll => write!(f, "weighted_one_against_all"),
        }
    }
}

impl FromStr for MulticlassStrategy {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "by_pairs" | "bypairs" => Ok(MulticlassStrategy::ByPairs),
            "by_weighted_pairs" | "byweightedpairs" => Ok(MulticlassStrategy::ByWeightedPairs),
            "one_against_all" | "oneagainstall" => Ok(MulticlassStrategy::OneAgainstAll),
            "weighted_one_against_all" | "weightedoneagainstall" => {
                Ok(MulticlassStrategy::WeightedOneAgainstAll)
            }
            other => Err(EvalError::invalid_parameter(
                "multiclass",
                other,
                "expected one of by_pairs, by_weighted_pairs, one_against_all, \
                 weighted_one_against_all",
            )),
        }
    }
}

/// A scalar score optionally paired with its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWithError {
    /// Point estimate
    pub value: f64,
    /// Standard error, present only when it was requested
    pub se: Option<f64>,
}

impl ScoreWithError {
    /// A bare score without standard error.
    pub fn bare(value: f64) -> Self {
        Self { value, se: None }
    }

    /// A score with its standard error.
    pub fn with_se(value: f64, se: f64) -> Self {
        Self {
            value,
            se: Some(se),
        }
    }
}

impl fmt::Display for ScoreWithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.se {
            Some(se) => write!(f, "{:.6} ± {:.6}", self.value, se),
            None => write!(f, "{:.6}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display_round_trip() {
        for strategy in MulticlassStrategy::ALL {
            let parsed: MulticlassStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
    }

    #[test]
    fn test_strategy_parse_rejects_unknown() {
        let err = "pairs_please".parse::<MulticlassStrategy>().unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");
    }

    #[test]
    fn test_strategy_flags() {
        assert!(MulticlassStrategy::ByPairs.is_pairwise());
        assert!(!MulticlassStrategy::ByPairs.is_weighted());
        assert!(MulticlassStrategy::WeightedOneAgainstAll.is_weighted());
        assert!(!MulticlassStrategy::OneAgainstAll.is_pairwise());
        assert_eq!(MulticlassStrategy::default(), MulticlassStrategy::ByWeightedPairs);
    }

    #[test]
    fn test_score_with_error_display() {
        assert_eq!(ScoreWithError::bare(0.5).to_string(), "0.500000");
        assert!(ScoreWithError::with_se(0.5, 0.1).to_string().contains('±'));
    }
}
