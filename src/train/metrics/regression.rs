//! Regression metrics

use super::Metric;
use crate::tensor::Tensor;

/// Mean squared error over flat value slices
///
/// Returns 0.0 for empty inputs.
pub fn mean_squared_error(predicted: &[f32], actual: &[f32]) -> f32 {
    assert_eq!(
        predicted.len(),
        actual.len(),
        "Predicted and actual values must have same length"
    );

    if predicted.is_empty() {
        return 0.0;
    }

    let sum: f32 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a) * (p - a))
        .sum();
    sum / predicted.len() as f32
}

/// Root mean squared error over flat value slices
pub fn rmse(predicted: &[f32], actual: &[f32]) -> f32 {
    mean_squared_error(predicted, actual).sqrt()
}

/// Root Mean Squared Error metric
///
/// RMSE = sqrt(mean((prediction - target)^2))
///
/// # Example
///
/// ```
/// use epoca::train::{Metric, Rmse};
/// use epoca::Tensor;
///
/// let metric = Rmse;
/// let pred = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
/// let target = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
///
/// assert!(metric.compute(&pred, &target) < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl Metric for Rmse {
    fn compute(&self, predictions: &Tensor, targets: &Tensor) -> f32 {
        assert_eq!(
            predictions.len(),
            targets.len(),
            "Predictions and targets must have same length"
        );

        let p: Vec<f32> = predictions.data().iter().copied().collect();
        let t: Vec<f32> = targets.data().iter().copied().collect();
        rmse(&p, &t)
    }

    fn name(&self) -> &'static str {
        "RMSE"
    }

    fn higher_is_better(&self) -> bool {
        false
    }
}
