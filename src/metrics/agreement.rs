//! Full class-by-class confusion matrices and Cohen's kappa.

use crate::config::ScoringConfig;
use crate::core::constants::{DEGENERATE_RATE, EPSILON};
use crate::core::error::Result;
use crate::metrics::confusion::ConfusionMatrix;
use crate::results::TestResults;

use ndarray::{array, Array2, Axis};
use rayon::prelude::*;

/// A `k × k` weighted matrix per classifier, rows indexed by actual class
/// and columns by predicted class.
pub fn class_confusion_matrix(
    store: &TestResults,
    config: &ScoringConfig,
) -> Result<Vec<Array2<f64>>> {
    store.validate()?;
    let k = store.num_classes();
    Ok((0..store.number_of_learners())
        .into_par_iter()
        .map(|learner| {
            let mut matrix = Array2::zeros((k, k));
            for ex in &store.results {
                matrix[[ex.actual_class, ex.classes[learner]]] +=
                    store.weight_of(ex, config.ignore_weights);
            }
            matrix
        })
        .collect())
}

/// Cohen's kappa of a square agreement matrix.
///
/// Returns `0.0` for an empty matrix or when expected agreement is 1.
pub fn cohen_kappa(matrix: &Array2<f64>) -> f64 {
    let total = matrix.sum();
    if total.abs() < EPSILON {
        return DEGENERATE_RATE;
    }
    let observed = matrix.diag().sum() / total;
    let rows = matrix.sum_axis(Axis(1));
    let cols = matrix.sum_axis(Axis(0));
    let expected = rows
        .iter()
        .zip(cols.iter())
        .map(|(r, c)| r * c)
        .sum::<f64>()
        / (total * total);

    if (1.0 - expected).abs() < EPSILON {
        DEGENERATE_RATE
    } else {
        (observed - expected) / (1.0 - expected)
    }
}

/// Cohen's kappa of a binary confusion matrix.
pub fn binary_kappa(m: &ConfusionMatrix) -> f64 {
    cohen_kappa(&array![[m.tp(), m.fn_()], [m.fp(), m.tn()]])
}

/// Cohen's kappa per classifier over the full class-by-class matrix.
pub fn kappa(store: &TestResults, config: &ScoringConfig) -> Result<Vec<f64>> {
    Ok(class_confusion_matrix(store, config)?
        .iter()
        .map(cohen_kappa)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::TestedExample;
    use approx::assert_abs_diff_eq;

    fn store() -> TestResults {
        let mut store = TestResults::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec!["m".into()],
            1,
            true,
        );
        let rows = [
            (0, 0, 2.0),
            (0, 1, 1.0),
            (1, 1, 1.0),
            (2, 2, 1.0),
            (2, 0, 1.0),
        ];
        for (actual, predicted, weight) in rows {
            store
                .push(
                    TestedExample::new(actual, 0, weight)
                        .with_result(predicted, vec![1.0 / 3.0; 3]),
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_class_confusion_matrix() {
        let matrices = class_confusion_matrix(&store(), &ScoringConfig::default()).unwrap();
        assert_eq!(
            matrices[0],
            array![[2.0, 1.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]
        );
        assert_eq!(matrices[0].sum(), 6.0);
    }

    #[test]
    fn test_kappa() {
        let m = array![[2.0, 1.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]];
        let po = 4.0 / 6.0;
        let pe = (3.0 * 3.0 + 1.0 * 2.0 + 2.0 * 1.0) / 36.0;
        assert_abs_diff_eq!(cohen_kappa(&m), (po - pe) / (1.0 - pe), epsilon = 1e-12);
        assert_abs_diff_eq!(
            kappa(&store(), &ScoringConfig::default()).unwrap()[0],
            (po - pe) / (1.0 - pe),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_kappa_degenerate_cases() {
        assert_eq!(cohen_kappa(&Array2::zeros((2, 2))), 0.0);
        // Everything in one cell: expected agreement is 1.
        assert_eq!(cohen_kappa(&array![[4.0, 0.0], [0.0, 0.0]]), 0.0);
        assert_abs_diff_eq!(
            binary_kappa(&ConfusionMatrix::from_counts(5.0, 0.0, 5.0, 0.0)),
            1.0,
            epsilon = 1e-12
        );
    }
}
