//! Scorers over predicted probability vectors.

use crate::config::ScoringConfig;
use crate::core::constants::{DEGENERATE_RATE, PROBABILITY_SUM_TOLERANCE};
use crate::core::error::Result;
use crate::core::types::*;
use crate::metrics::ratio_or;
use crate::results::{TestResults, TestedExample};

use rayon::prelude::*;

/// Weighted mean over records of a per-record score, per classifier.
fn weighted_per_learner<F>(store: &TestResults, config: &ScoringConfig, score: F) -> Vec<f64>
where
    F: Fn(&TestedExample, LearnerIndex) -> f64 + Sync,
{
    (0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            let (sum, total) = store.results.iter().fold((0.0, 0.0), |(s, t), ex| {
                let w = store.weight_of(ex, config.ignore_weights);
                (s + w * score(ex, learner), t + w)
            });
            ratio_or(sum, total, DEGENERATE_RATE)
        })
        .collect()
}

fn warn_on_unnormalised(store: &TestResults) {
    let off = store
        .results
        .iter()
        .flat_map(|ex| ex.probabilities.iter())
        .filter(|probs| (probs.iter().sum::<f64>() - 1.0).abs() > PROBABILITY_SUM_TOLERANCE)
        .count();
    if off > 0 {
        log::warn!("{} probability vectors do not sum to 1", off);
    }
}

/// Brier score per classifier: weighted mean of `Σ_k (p_k - y_k)²` where
/// `y` is the one-hot actual class. Lower is better; `0.0` on an empty store.
pub fn brier_score(store: &TestResults, config: &ScoringConfig) -> Result<Vec<f64>> {
    store.validate()?;
    warn_on_unnormalised(store);
    Ok(weighted_per_learner(store, config, |ex, learner| {
        ex.probabilities[learner]
            .iter()
            .enumerate()
            .map(|(class, &p)| {
                let y = if class == ex.actual_class { 1.0 } else { 0.0 };
                (p - y).powi(2)
            })
            .sum()
    }))
}

/// Weighted mean probability each classifier assigned to the actual class.
pub fn average_probability(store: &TestResults, config: &ScoringConfig) -> Result<Vec<f64>> {
    store.validate()?;
    Ok(weighted_per_learner(store, config, |ex, learner| {
        ex.probability(learner, ex.actual_class)
    }))
}
