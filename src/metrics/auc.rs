//! Rank-based area under the ROC curve.
//!
//! Every entry point estimates AUC with the Mann-Whitney statistic: the
//! weighted probability that a positive instance scores above a negative
//! one, with equal scores counting one half. The estimate is computed
//! separately on each iteration of the store and averaged over the
//! iterations where it is defined (both positive and negative weight
//! present). When no iteration qualifies the result is `0.5`.
//!
//! Stores with more than two classes are reduced to binary splits by the
//! configured [`MulticlassStrategy`]: class pairs ranked by relative
//! probability mass `p_i / (p_i + p_j)`, or one class against the rest
//! ranked by `p_i`.

use crate::config::ScoringConfig;
use crate::core::constants::{EPSILON, UNDEFINED_AUC};
use crate::core::error::Result;
use crate::core::types::*;
use crate::metrics::weighted_mean;
use crate::results::{TestResults, TestedExample};

use ndarray::Array2;
use rayon::prelude::*;

/// One binary split of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    /// The class against the union of all others
    OneVsRest(ClassIndex),
    /// Instances of the two classes only, the first one positive
    Pair(ClassIndex, ClassIndex),
}

impl Split {
    /// The score and label of a record, or `None` when the split excludes it.
    fn sample(&self, ex: &TestedExample, learner: LearnerIndex) -> Option<(f64, bool)> {
        match *self {
            Split::OneVsRest(class) => {
                Some((ex.probability(learner, class), ex.actual_class == class))
            }
            Split::Pair(first, second) => {
                if ex.actual_class != first && ex.actual_class != second {
                    return None;
                }
                let p = ex.probability(learner, first);
                let q = ex.probability(learner, second);
                let mass = p + q;
                let score = if mass.abs() < EPSILON { 0.5 } else { p / mass };
                Some((score, ex.actual_class == first))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    score: f64,
    positive: bool,
    weight: Weight,
}

/// A defined binary AUC with the weight on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BinaryAuc {
    auc: f64,
    positives: f64,
    negatives: f64,
}

impl BinaryAuc {
    /// Hanley-McNeil standard error.
    fn standard_error(&self) -> f64 {
        let a = self.auc;
        let q1 = a / (2.0 - a);
        let q2 = 2.0 * a * a / (1.0 + a);
        let variance = (a * (1.0 - a)
            + (self.positives - 1.0) * (q1 - a * a)
            + (self.negatives - 1.0) * (q2 - a * a))
            / (self.positives * self.negatives);
        variance.max(0.0).sqrt()
    }
}

/// Weighted Mann-Whitney AUC; `None` without positive or negative weight.
fn mann_whitney(samples: &mut [Sample]) -> Option<BinaryAuc> {
    let (positives, negatives) = samples.iter().fold((0.0, 0.0), |(p, n), s| {
        if s.positive {
            (p + s.weight, n)
        } else {
            (p, n + s.weight)
        }
    });
    if positives < EPSILON || negatives < EPSILON {
        return None;
    }

    samples.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut u = 0.0;
    let mut negatives_below = 0.0;
    let mut start = 0;
    while start < samples.len() {
        let score = samples[start].score;
        let (mut tied_pos, mut tied_neg) = (0.0, 0.0);
        let mut end = start;
        while end < samples.len() && (end == start || samples[end].score == score) {
            if samples[end].positive {
                tied_pos += samples[end].weight;
            } else {
                tied_neg += samples[end].weight;
            }
            end += 1;
        }
        u += tied_pos * (negatives_below + 0.5 * tied_neg);
        negatives_below += tied_neg;
        start = end;
    }

    Some(BinaryAuc {
        auc: u / (positives * negatives),
        positives,
        negatives,
    })
}

/// Records grouped by iteration plus the store-level context every split needs.
struct AucContext<'s> {
    store: &'s TestResults,
    slices: Vec<Vec<&'s TestedExample>>,
    ignore_weights: bool,
}

impl<'s> AucContext<'s> {
    fn new(store: &'s TestResults, config: &ScoringConfig) -> Result<Self> {
        store.validate()?;
        store.require_classes()?;
        Ok(Self {
            store,
            slices: store.iteration_slices(),
            ignore_weights: config.ignore_weights,
        })
    }

    /// Defined per-iteration AUCs of one classifier on one split.
    fn per_iteration(&self, learner: LearnerIndex, split: Split) -> Vec<BinaryAuc> {
        let mut defined = Vec::with_capacity(self.slices.len());
        for (iteration, slice) in self.slices.iter().enumerate() {
            let mut samples: Vec<Sample> = slice
                .iter()
                .filter_map(|ex| {
                    split.sample(ex, learner).map(|(score, positive)| Sample {
                        score,
                        positive,
                        weight: self.store.weight_of(ex, self.ignore_weights),
                    })
                })
                .collect();
            match mann_whitney(&mut samples) {
                Some(auc) => defined.push(auc),
                None => log::debug!(
                    "AUC undefined on iteration {} for {:?} of classifier {}; skipping",
                    iteration,
                    split,
                    learner
                ),
            }
        }
        defined
    }

    /// Mean AUC over defined iterations.
    fn averaged(&self, learner: LearnerIndex, split: Split) -> Option<f64> {
        let defined = self.per_iteration(learner, split);
        if defined.is_empty() {
            None
        } else {
            Some(defined.iter().map(|b| b.auc).sum::<f64>() / defined.len() as f64)
        }
    }

    /// One value per classifier for a fixed split.
    fn per_learner(&self, split: Split) -> Vec<f64> {
        (0..self.store.number_of_learners())
            .into_par_iter()
            .map(|learner| self.averaged(learner, split).unwrap_or(UNDEFINED_AUC))
            .collect()
    }
}

fn class_pairs(num_classes: usize) -> impl Iterator<Item = (ClassIndex, ClassIndex)> {
    (0..num_classes).flat_map(move |i| (i + 1..num_classes).map(move |j| (i, j)))
}

fn by_pairs(num_classes: usize, _priors: &[f64]) -> Vec<(Split, f64)> {
    class_pairs(num_classes)
        .map(|(i, j)| (Split::Pair(i, j), 1.0))
        .collect()
}

fn by_weighted_pairs(num_classes: usize, priors: &[f64]) -> Vec<(Split, f64)> {
    class_pairs(num_classes)
        .map(|(i, j)| (Split::Pair(i, j), priors[i] * priors[j]))
        .collect()
}

fn one_against_all(num_classes: usize, _priors: &[f64]) -> Vec<(Split, f64)> {
    (0..num_classes)
        .map(|class| (Split::OneVsRest(class), 1.0))
        .collect()
}

fn weighted_one_against_all(num_classes: usize, priors: &[f64]) -> Vec<(Split, f64)> {
    (0..num_classes)
        .map(|class| (Split::OneVsRest(class), priors[class]))
        .collect()
}

/// The binary splits a strategy scores, each with its aggregation weight.
fn strategy_components(
    strategy: MulticlassStrategy,
    num_classes: usize,
    priors: &[f64],
) -> Vec<(Split, f64)> {
    let components: fn(usize, &[f64]) -> Vec<(Split, f64)> = match strategy {
        MulticlassStrategy::ByPairs => by_pairs,
        MulticlassStrategy::ByWeightedPairs => by_weighted_pairs,
        MulticlassStrategy::OneAgainstAll => one_against_all,
        MulticlassStrategy::WeightedOneAgainstAll => weighted_one_against_all,
    };
    components(num_classes, priors)
}

/// AUC per classifier.
///
/// A two-class store scores its positive class (`base_class`, default 1)
/// against the other. Larger stores aggregate binary splits according to
/// `config.multiclass`, averaging only the defined components.
pub fn auc(store: &TestResults, config: &ScoringConfig) -> Result<Vec<f64>> {
    let ctx = AucContext::new(store, config)?;
    let num_classes = store.num_classes();
    if num_classes == 2 {
        return Ok(ctx.per_learner(Split::OneVsRest(store.positive_class())));
    }

    let priors = store.class_distribution(config.ignore_weights);
    let components = strategy_components(config.multiclass, num_classes, &priors);
    log::debug!(
        "Scoring {} AUC over {} components for {} classifiers",
        config.multiclass,
        components.len(),
        store.number_of_learners()
    );

    Ok((0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            weighted_mean(
                components
                    .iter()
                    .map(|&(split, weight)| (ctx.averaged(learner, split), weight)),
                UNDEFINED_AUC,
            )
        })
        .collect())
}

/// One-vs-rest AUC of a single class per classifier; the class defaults
/// to the store's positive class.
pub fn auc_for_single_class(
    store: &TestResults,
    class_index: Option<ClassIndex>,
    config: &ScoringConfig,
) -> Result<Vec<f64>> {
    let ctx = AucContext::new(store, config)?;
    let class = class_index.unwrap_or_else(|| store.positive_class());
    store.check_class_index(class)?;
    Ok(ctx.per_learner(Split::OneVsRest(class)))
}

/// AUC between two classes per classifier, restricted to instances of
/// either class with `first` as the positive one.
pub fn auc_for_pair_of_classes(
    store: &TestResults,
    first: ClassIndex,
    second: ClassIndex,
    config: &ScoringConfig,
) -> Result<Vec<f64>> {
    let ctx = AucContext::new(store, config)?;
    store.check_class_index(first)?;
    store.check_class_index(second)?;
    crate::ensure!(
        first != second,
        crate::config_error!("pairwise AUC needs two distinct classes, got {} twice", first)
    );
    Ok(ctx.per_learner(Split::Pair(first, second)))
}

/// Symmetric matrix of pairwise AUCs per classifier. The diagonal is
/// zero; pairs without a defined AUC hold `0.5`.
pub fn auc_matrix(store: &TestResults, config: &ScoringConfig) -> Result<Vec<Array2<f64>>> {
    let ctx = AucContext::new(store, config)?;
    let k = store.num_classes();
    Ok((0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            let mut matrix = Array2::zeros((k, k));
            for (i, j) in class_pairs(k) {
                let value = ctx
                    .averaged(learner, Split::Pair(i, j))
                    .unwrap_or(UNDEFINED_AUC);
                matrix[[i, j]] = value;
                matrix[[j, i]] = value;
            }
            matrix
        })
        .collect())
}

/// One-vs-rest AUC with its Hanley-McNeil standard error per classifier.
///
/// Both are computed per iteration; the value is the mean over defined
/// iterations and the error that of the mean, `sqrt(Σ se²) / k`. A
/// classifier with no defined iteration gets `0.5 ± 0`.
pub fn auc_wilcoxon(
    store: &TestResults,
    class_index: Option<ClassIndex>,
    config: &ScoringConfig,
) -> Result<Vec<ScoreWithError>> {
    let ctx = AucContext::new(store, config)?;
    let class = class_index.unwrap_or_else(|| store.positive_class());
    store.check_class_index(class)?;
    Ok((0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            let defined = ctx.per_iteration(learner, Split::OneVsRest(class));
            if defined.is_empty() {
                return ScoreWithError::with_se(UNDEFINED_AUC, 0.0);
            }
            let k = defined.len() as f64;
            let value = defined.iter().map(|b| b.auc).sum::<f64>() / k;
            let se = defined
                .iter()
                .map(|b| b.standard_error().powi(2))
                .sum::<f64>()
                .sqrt()
                / k;
            ScoreWithError::with_se(value, se)
        })
        .collect())
}
