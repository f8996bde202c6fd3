//! Labeled data consumed by the test harness.

use crate::core::error::{EvalError, Result};
use crate::core::types::*;
use ndarray::{Array2, ArrayView1, Axis};

/// A labeled dataset: a feature matrix, one class index per row, optional
/// per-row weights and the ordered class values.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledData {
    features: Array2<f64>,
    classes: Vec<ClassIndex>,
    weights: Option<Vec<Weight>>,
    class_values: Vec<String>,
}

impl LabeledData {
    /// Create a dataset, checking that rows, labels and weights line up and
    /// that every label indexes `class_values`.
    pub fn new(
        features: Array2<f64>,
        classes: Vec<ClassIndex>,
        weights: Option<Vec<Weight>>,
        class_values: Vec<String>,
    ) -> Result<Self> {
        if features.nrows() != classes.len() {
            return Err(EvalError::dimension_mismatch(
                format!("classes: {}", features.nrows()),
                format!("classes: {}", classes.len()),
            ));
        }
        if let Some(ref w) = weights {
            if w.len() != classes.len() {
                return Err(EvalError::dimension_mismatch(
                    format!("weights: {}", classes.len()),
                    format!("weights: {}", w.len()),
                ));
            }
            if let Some(bad) = w.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(EvalError::invalid_parameter(
                    "weights",
                    bad.to_string(),
                    "must be finite and non-negative",
                ));
            }
        }
        if let Some(&bad) = classes.iter().find(|&&c| c >= class_values.len()) {
            return Err(EvalError::class_index_out_of_range(bad, class_values.len()));
        }

        Ok(Self {
            features,
            classes,
            weights,
            class_values,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Feature matrix
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Feature row `i`
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.features.row(i)
    }

    /// Class index of every row
    pub fn classes(&self) -> &[ClassIndex] {
        &self.classes
    }

    /// Class index of row `i`
    pub fn class_of(&self, i: usize) -> ClassIndex {
        self.classes[i]
    }

    /// Whether per-row weights are present
    pub fn has_weights(&self) -> bool {
        self.weights.is_some()
    }

    /// Weight of row `i` (1.0 without weights)
    pub fn weight_of(&self, i: usize) -> Weight {
        self.weights.as_ref().map(|w| w[i]).unwrap_or(1.0)
    }

    /// Ordered class values
    pub fn class_values(&self) -> &[String] {
        &self.class_values
    }

    /// Number of classes
    pub fn num_classes(&self) -> usize {
        self.class_values.len()
    }

    /// Weighted class frequencies normalised to sum to one.
    pub fn class_distribution(&self) -> Vec<f64> {
        let mut dist = vec![0.0; self.num_classes()];
        for i in 0..self.len() {
            dist[self.classes[i]] += self.weight_of(i);
        }
        let total: f64 = dist.iter().sum();
        if total > 0.0 {
            dist.iter_mut().for_each(|d| *d /= total);
        }
        dist
    }

    /// Rows selected by `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> LabeledData {
        LabeledData {
            features: self.features.select(Axis(0), indices),
            classes: indices.iter().map(|&i| self.classes[i]).collect(),
            weights: self
                .weights
                .as_ref()
                .map(|w| indices.iter().map(|&i| w[i]).collect()),
            class_values: self.class_values.clone(),
        }
    }
}
