//! Splitting a multi-classifier store into single-classifier stores.

use crate::core::error::Result;
use crate::results::TestResults;

/// One store per classifier.
///
/// Each output keeps the class values, iteration count, base class, weight
/// flag and dataset reference of the input; its classifier list names only
/// that classifier and every record is narrowed to that classifier's
/// prediction and probability vector.
///
/// The store is validated first, so a record whose prediction count does not
/// match the classifier list is reported as
/// [`EvalError::LearnerCountMismatch`](crate::EvalError::LearnerCountMismatch).
pub fn split_by_classifiers(store: &TestResults) -> Result<Vec<TestResults>> {
    store.validate()?;
    let split = (0..store.number_of_learners())
        .map(|learner| TestResults {
            class_values: store.class_values.clone(),
            base_class: store.base_class,
            classifier_names: vec![store.classifier_names[learner].clone()],
            number_of_iterations: store.number_of_iterations,
            weights: store.weights,
            examples: store.examples.clone(),
            results: store
                .results
                .iter()
                .map(|ex| ex.narrowed(learner))
                .collect(),
        })
        .collect();
    Ok(split)
}
