//! Rates derived from binary confusion matrices.

use crate::config::ScoringConfig;
use crate::core::constants::DEGENERATE_RATE;
use crate::core::error::Result;
use crate::metrics::confusion::{confusion_matrices, ClassifierConfusion, ConfusionMatrix};
use crate::metrics::{ratio_or, ScoreInput};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar rate over a binary confusion matrix.
///
/// Every rate resolves a zero denominator to `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rate {
    /// TP / (TP + FN)
    Sensitivity,
    /// TN / (TN + FP)
    Specificity,
    /// TP / (TP + FP)
    Precision,
    /// TN / (TN + FN)
    Npv,
    /// Harmonic mean of precision and recall
    F1,
    /// (1 + β²)·P·R / (β²·P + R); `None` takes β from [`ScoringConfig::beta`]
    Falpha {
        /// β, or `None` for the configured value
        beta: Option<f64>,
    },
    /// Matthews correlation coefficient
    Mcc,
}

impl Rate {
    /// Recall is sensitivity.
    pub const RECALL: Rate = Rate::Sensitivity;
    /// True positive rate is sensitivity.
    pub const TPR: Rate = Rate::Sensitivity;
    /// Positive predictive value is precision.
    pub const PPV: Rate = Rate::Precision;

    /// Every rate, with F-beta taking the configured β.
    pub const ALL: [Rate; 7] = [
        Rate::Sensitivity,
        Rate::Specificity,
        Rate::Precision,
        Rate::Npv,
        Rate::F1,
        Rate::Falpha { beta: None },
        Rate::Mcc,
    ];

    /// F-beta with an explicit β.
    pub fn falpha(beta: f64) -> Self {
        Rate::Falpha { beta: Some(beta) }
    }

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Rate::Sensitivity => "sensitivity",
            Rate::Specificity => "specificity",
            Rate::Precision => "precision",
            Rate::Npv => "npv",
            Rate::F1 => "f1",
            Rate::Falpha { .. } => "falpha",
            Rate::Mcc => "mcc",
        }
    }

    /// The rate of one matrix. `Falpha { beta: None }` uses β = 1.
    pub fn of(&self, m: &ConfusionMatrix) -> f64 {
        self.with_beta(crate::core::constants::DEFAULT_FBETA)(m)
    }

    fn with_beta(&self, default_beta: f64) -> impl Fn(&ConfusionMatrix) -> f64 {
        let rate = *self;
        move |m: &ConfusionMatrix| match rate {
            Rate::Sensitivity => sensitivity(m),
            Rate::Specificity => specificity(m),
            Rate::Precision => precision(m),
            Rate::Npv => npv(m),
            Rate::F1 => f_beta(m, 1.0),
            Rate::Falpha { beta } => f_beta(m, beta.unwrap_or(default_beta)),
            Rate::Mcc => mcc(m),
        }
    }

    /// Score any accepted input.
    ///
    /// - a matrix gives one value
    /// - a matrix list gives one value per matrix, in order
    /// - a store or per-classifier confusions give one value per classifier;
    ///   one-vs-rest sets are macro-averaged over classes
    pub fn score<'a, I>(&self, input: I, config: &ScoringConfig) -> Result<Vec<f64>>
    where
        I: Into<ScoreInput<'a>>,
    {
        let rate = self.with_beta(config.beta());
        match input.into() {
            ScoreInput::Matrix(m) => Ok(vec![rate(m)]),
            ScoreInput::Matrices(ms) => Ok(ms.iter().map(&rate).collect()),
            ScoreInput::PerClassifier(cs) => {
                Ok(cs.iter().map(|c| per_classifier(c, &rate)).collect())
            }
            ScoreInput::Results(store) => {
                let confusions = confusion_matrices(store, None, config)?;
                Ok(confusions.iter().map(|c| per_classifier(c, &rate)).collect())
            }
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Falpha { beta: Some(beta) } => write!(f, "falpha({})", beta),
            other => f.write_str(other.name()),
        }
    }
}

fn per_classifier<F: Fn(&ConfusionMatrix) -> f64>(
    confusion: &ClassifierConfusion,
    rate: &F,
) -> f64 {
    match confusion {
        ClassifierConfusion::Binary(m) => rate(m),
        ClassifierConfusion::OneVsRest(ms) if ms.is_empty() => DEGENERATE_RATE,
        ClassifierConfusion::OneVsRest(ms) => {
            ms.iter().map(rate).sum::<f64>() / ms.len() as f64
        }
    }
}

/// TP / (TP + FN)
pub fn sensitivity(m: &ConfusionMatrix) -> f64 {
    ratio_or(m.tp(), m.tp() + m.fn_(), DEGENERATE_RATE)
}

/// TN / (TN + FP)
pub fn specificity(m: &ConfusionMatrix) -> f64 {
    ratio_or(m.tn(), m.tn() + m.fp(), DEGENERATE_RATE)
}

/// TP / (TP + FP)
pub fn precision(m: &ConfusionMatrix) -> f64 {
    ratio_or(m.tp(), m.tp() + m.fp(), DEGENERATE_RATE)
}

/// TN / (TN + FN)
pub fn npv(m: &ConfusionMatrix) -> f64 {
    ratio_or(m.tn(), m.tn() + m.fn_(), DEGENERATE_RATE)
}

/// F-beta over precision and recall; F1 at `beta == 1`.
pub fn f_beta(m: &ConfusionMatrix, beta: f64) -> f64 {
    let p = precision(m);
    let r = sensitivity(m);
    let b2 = beta * beta;
    ratio_or((1.0 + b2) * p * r, b2 * p + r, DEGENERATE_RATE)
}

/// Matthews correlation coefficient
pub fn mcc(m: &ConfusionMatrix) -> f64 {
    let numerator = m.tp() * m.tn() - m.fp() * m.fn_();
    let denominator = (m.predicted_positives()
        * m.actual_positives()
        * m.actual_negatives()
        * m.predicted_negatives())
    .sqrt();
    ratio_or(numerator, denominator, DEGENERATE_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfigBuilder;
    use crate::results::{TestResults, TestedExample};
    use approx::assert_abs_diff_eq;

    fn matrix() -> ConfusionMatrix {
        ConfusionMatrix::from_counts(8.0, 2.0, 6.0, 4.0)
    }

    #[test]
    fn test_formulas() {
        let m = matrix();
        assert_abs_diff_eq!(Rate::Sensitivity.of(&m), 8.0 / 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Rate::Specificity.of(&m), 6.0 / 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Rate::Precision.of(&m), 8.0 / 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Rate::Npv.of(&m), 6.0 / 10.0, epsilon = 1e-12);

        let (p, r) = (0.8, 8.0 / 12.0);
        assert_abs_diff_eq!(Rate::F1.of(&m), 2.0 * p * r / (p + r), epsilon = 1e-12);
        assert_abs_diff_eq!(
            Rate::falpha(2.0).of(&m),
            5.0 * p * r / (4.0 * p + r),
            epsilon = 1e-12
        );
        let expected_mcc = (48.0 - 8.0) / (10.0f64 * 12.0 * 8.0 * 10.0).sqrt();
        assert_abs_diff_eq!(Rate::Mcc.of(&m), expected_mcc, epsilon = 1e-12);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Rate::RECALL, Rate::Sensitivity);
        assert_eq!(Rate::TPR, Rate::Sensitivity);
        assert_eq!(Rate::PPV, Rate::Precision);
        assert_eq!(Rate::falpha(0.5).to_string(), "falpha(0.5)");
        assert_eq!(Rate::Npv.to_string(), "npv");
    }

    #[test]
    fn test_zero_denominators_give_zero() {
        let empty = ConfusionMatrix::default();
        for rate in Rate::ALL {
            assert_eq!(rate.of(&empty), 0.0, "{}", rate);
        }
        // No actual positives: sensitivity and MCC are degenerate.
        let negatives_only = ConfusionMatrix::from_counts(0.0, 1.0, 3.0, 0.0);
        assert_eq!(Rate::Sensitivity.of(&negatives_only), 0.0);
        assert_eq!(Rate::Mcc.of(&negatives_only), 0.0);
        assert_eq!(Rate::Specificity.of(&negatives_only), 0.75);
    }

    #[test]
    fn test_config_beta_for_unspecified_falpha() {
        let m = matrix();
        let config = ScoringConfigBuilder::new().beta(2.0).build().unwrap();
        let scored = Rate::Falpha { beta: None }.score(&m, &config).unwrap();
        assert_abs_diff_eq!(scored[0], Rate::falpha(2.0).of(&m), epsilon = 1e-12);
        // An explicit beta wins over the configured one.
        let scored = Rate::falpha(1.0).score(&m, &config).unwrap();
        assert_abs_diff_eq!(scored[0], Rate::F1.of(&m), epsilon = 1e-12);
    }

    #[test]
    fn test_input_shapes() {
        let config = ScoringConfig::default();
        let ms = vec![matrix(), ConfusionMatrix::from_counts(1.0, 0.0, 1.0, 1.0)];
        assert_eq!(Rate::Precision.score(&ms, &config).unwrap(), vec![0.8, 1.0]);

        let per_classifier = vec![
            ClassifierConfusion::Binary(matrix()),
            ClassifierConfusion::OneVsRest(ms.clone()),
        ];
        let scored = Rate::Precision.score(&per_classifier, &config).unwrap();
        assert_abs_diff_eq!(scored[0], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(scored[1], 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_store_input_macro_averages_multiclass() {
        let mut store = TestResults::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec!["m".into()],
            1,
            false,
        );
        for (actual, predicted) in [(0, 0), (1, 1), (2, 1), (2, 2)] {
            let mut probs = vec![0.0; 3];
            probs[predicted] = 1.0;
            store
                .push(TestedExample::new(actual, 0, 1.0).with_result(predicted, probs))
                .unwrap();
        }
        let config = ScoringConfig::default();
        let recall = Rate::Sensitivity.score(&store, &config).unwrap();
        assert_abs_diff_eq!(recall[0], (1.0 + 1.0 + 0.5) / 3.0, epsilon = 1e-12);
    }
}
