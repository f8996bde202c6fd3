//! Baseline learners.

use crate::core::error::Result;
use crate::core::types::*;
use crate::testing::{Classifier, LabeledData, Learner};

use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Learner whose classifiers ignore the input: each prediction draws a
/// random probability vector and, independently, a uniformly random label.
#[derive(Debug, Clone)]
pub struct RandomLearner {
    name: String,
}

impl RandomLearner {
    /// Create a learner named `random`
    pub fn new() -> Self {
        Self::named("random")
    }

    /// Create a learner with a custom name
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Default for RandomLearner {
    fn default() -> Self {
        Self::new()
    }
}

impl Learner for RandomLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&self, data: &LabeledData, seed: u64) -> Result<Box<dyn Classifier>> {
        Ok(Box::new(RandomClassifier {
            num_classes: data.num_classes(),
            rng: StdRng::seed_from_u64(seed),
        }))
    }
}

#[derive(Debug)]
struct RandomClassifier {
    num_classes: usize,
    rng: StdRng,
}

impl Classifier for RandomClassifier {
    fn predict(&mut self, _row: ArrayView1<'_, f64>) -> (ClassIndex, Vec<f64>) {
        let mut probs: Vec<f64> = (0..self.num_classes).map(|_| self.rng.gen::<f64>()).collect();
        let sum: f64 = probs.iter().sum();
        if sum > 0.0 {
            probs.iter_mut().for_each(|p| *p /= sum);
        } else {
            probs.iter_mut().for_each(|p| *p = 1.0 / self.num_classes as f64);
        }
        let class = self.rng.gen_range(0..self.num_classes);
        (class, probs)
    }
}

/// Learner predicting the (weighted) majority class of its learning data
/// with the learning class distribution as probabilities.
#[derive(Debug, Clone)]
pub struct MajorityLearner {
    name: String,
}

impl MajorityLearner {
    /// Create a learner named `majority`
    pub fn new() -> Self {
        Self::named("majority")
    }

    /// Create a learner with a custom name
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Default for MajorityLearner {
    fn default() -> Self {
        Self::new()
    }
}

impl Learner for MajorityLearner {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&self, data: &LabeledData, _seed: u64) -> Result<Box<dyn Classifier>> {
        let distribution = data.class_distribution();
        let majority = distribution
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &p)| {
                if p > best.1 {
                    (i, p)
                } else {
                    best
                }
            })
            .0;
        Ok(Box::new(MajorityClassifier {
            majority,
            distribution,
        }))
    }
}

#[derive(Debug)]
struct MajorityClassifier {
    majority: ClassIndex,
    distribution: Vec<f64>,
}

impl Classifier for MajorityClassifier {
    fn predict(&mut self, _row: ArrayView1<'_, f64>) -> (ClassIndex, Vec<f64>) {
        (self.majority, self.distribution.clone())
    }
}
