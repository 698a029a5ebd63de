//! Classification metrics

use super::Metric;
use crate::tensor::Tensor;

/// Fraction of matching labels
///
/// Returns 0.0 for empty inputs.
pub fn accuracy_from_labels(predicted: &[usize], actual: &[usize]) -> f32 {
    assert_eq!(
        predicted.len(),
        actual.len(),
        "Predicted and actual labels must have same length"
    );

    if predicted.is_empty() {
        return 0.0;
    }

    let correct = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();
    correct as f32 / predicted.len() as f32
}

/// Multi-class accuracy: fraction where argmax(pred row) == argmax(target row)
///
/// # Example
///
/// ```
/// use epoca::train::{Accuracy, Metric};
/// use epoca::Tensor;
///
/// let metric = Accuracy;
/// let pred = Tensor::from_rows(2, 2, vec![0.9, 0.1, 0.2, 0.8]).unwrap();
/// let target = Tensor::from_rows(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
///
/// assert_eq!(metric.compute(&pred, &target), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn compute(&self, predictions: &Tensor, targets: &Tensor) -> f32 {
        assert_eq!(
            predictions.rows(),
            targets.rows(),
            "Predictions and targets must have same row count"
        );

        accuracy_from_labels(&predictions.argmax_rows(), &targets.argmax_rows())
    }

    fn name(&self) -> &'static str {
        "Accuracy"
    }
}
