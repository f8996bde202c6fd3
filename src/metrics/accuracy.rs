//! Classification accuracy.

use crate::config::ScoringConfig;
use crate::core::constants::DEGENERATE_RATE;
use crate::core::error::Result;
use crate::core::types::*;
use crate::metrics::confusion::{ClassifierConfusion, ConfusionMatrix};
use crate::metrics::{ratio_or, ScoreInput};
use crate::results::{TestResults, TestedExample};

use rayon::prelude::*;

/// Classification accuracy per classifier (per matrix for matrix input).
///
/// A store is scored directly from prediction correctness weighted by
/// instance weight. A binary matrix scores `(TP + TN) / total`; a
/// one-vs-rest set scores the summed diagonal `ΣTP / total`.
///
/// With `config.report_se` each value carries the binomial standard error
/// `sqrt(p(1 - p) / n)`, `n` being the total weight.
pub fn ca<'a, I>(input: I, config: &ScoringConfig) -> Result<Vec<ScoreWithError>>
where
    I: Into<ScoreInput<'a>>,
{
    let pairs: Vec<(f64, f64)> = match input.into() {
        ScoreInput::Results(store) => {
            store.validate()?;
            (0..store.number_of_learners())
                .into_par_iter()
                .map(|learner| correct_and_total(store, store.results.iter(), learner, config))
                .collect()
        }
        ScoreInput::Matrix(m) => vec![(m.correct(), m.total())],
        ScoreInput::Matrices(ms) => ms.iter().map(|m| (m.correct(), m.total())).collect(),
        ScoreInput::PerClassifier(cs) => cs.iter().map(from_confusion).collect(),
    };

    Ok(pairs
        .into_iter()
        .map(|(correct, total)| {
            let p = ratio_or(correct, total, DEGENERATE_RATE);
            if config.report_se {
                ScoreWithError::with_se(p, binomial_se(p, total))
            } else {
                ScoreWithError::bare(p)
            }
        })
        .collect())
}

/// Accuracy of each classifier on each iteration, indexed
/// `[learner][iteration]`. An iteration without records scores `0.0`.
pub fn ca_by_iterations(store: &TestResults, config: &ScoringConfig) -> Result<Vec<Vec<f64>>> {
    store.validate()?;
    let slices = store.iteration_slices();
    Ok((0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            slices
                .iter()
                .map(|slice| {
                    let (correct, total) =
                        correct_and_total(store, slice.iter().copied(), learner, config);
                    ratio_or(correct, total, DEGENERATE_RATE)
                })
                .collect()
        })
        .collect())
}

fn correct_and_total<'a, I>(
    store: &TestResults,
    records: I,
    learner: LearnerIndex,
    config: &ScoringConfig,
) -> (f64, f64)
where
    I: Iterator<Item = &'a TestedExample>,
{
    records.fold((0.0, 0.0), |(correct, total), ex| {
        let w = store.weight_of(ex, config.ignore_weights);
        let hit = if ex.is_correct(learner) { w } else { 0.0 };
        (correct + hit, total + w)
    })
}

fn from_confusion(confusion: &ClassifierConfusion) -> (f64, f64) {
    match confusion {
        ClassifierConfusion::Binary(m) => (m.correct(), m.total()),
        ClassifierConfusion::OneVsRest(ms) => (
            ms.iter().map(ConfusionMatrix::tp).sum(),
            confusion.total(),
        ),
    }
}

fn binomial_se(p: f64, n: f64) -> f64 {
    if n > 0.0 {
        (p * (1.0 - p) / n).max(0.0).sqrt()
    } else {
        0.0
    }
}
