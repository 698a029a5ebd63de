//! Mean Squared Error loss

use super::traits::{lookup_prediction, Criterion, Loss, TargetRef};
use crate::data::TensorMap;
use crate::error::{EpochError, Result};
use crate::tensor::Tensor;

/// Mean Squared Error over one named prediction
///
/// L = mean((prediction - target)^2), with the analytic gradient
/// d L / d prediction = 2 * (prediction - target) / n.
pub struct MseLoss {
    output_key: String,
    target: TargetRef,
}

impl MseLoss {
    /// Create an MSE loss for `output_key` against the referenced target
    pub fn new(output_key: impl Into<String>, target: TargetRef) -> Self {
        Self {
            output_key: output_key.into(),
            target,
        }
    }
}

impl Criterion for MseLoss {
    fn forward(&self, predictions: &TensorMap, targets: &TensorMap) -> Result<Loss> {
        let prediction = lookup_prediction(predictions, &self.output_key)?;
        let target = self.target.resolve(targets)?;

        if prediction.rows() != target.rows() || prediction.cols() != target.cols() {
            return Err(EpochError::ShapeMismatch {
                key: self.output_key.clone(),
                expected: format!("{}x{}", target.rows(), target.cols()),
                actual: format!("{}x{}", prediction.rows(), prediction.cols()),
            });
        }

        let diff = prediction.data() - target.data();
        let n = prediction.len().max(1) as f32;
        let value = diff.mapv(|d| d * d).sum() / n;
        let grad = &diff * (2.0 / n);

        let mut grads = TensorMap::new();
        grads.insert(self.output_key.clone(), Tensor::new(grad, false));
        Ok(Loss::new(value, grads))
    }

    fn name(&self) -> &str {
        "mse"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn maps(pred: Vec<f32>, tgt: Vec<f32>, cols: usize) -> (TensorMap, TensorMap) {
        let rows = pred.len() / cols;
        let mut predictions = TensorMap::new();
        predictions.insert(
            "pos".to_string(),
            Tensor::from_rows(rows, cols, pred).unwrap(),
        );
        let mut targets = TensorMap::new();
        targets.insert(
            "actions".to_string(),
            Tensor::from_rows(rows, cols, tgt).unwrap(),
        );
        (predictions, targets)
    }

    #[test]
    fn test_mse_value_and_grad() {
        let (predictions, targets) = maps(vec![1.0, 2.0], vec![2.0, 4.0], 2);
        let loss_fn = MseLoss::new("pos", TargetRef::full("actions"));

        let loss = loss_fn.forward(&predictions, &targets).unwrap();
        // ((1-2)^2 + (2-4)^2) / 2 = 2.5
        assert_relative_eq!(loss.value(), 2.5);

        let grad = loss.grad("pos").unwrap();
        // 2 * (pred - target) / n
        assert_relative_eq!(grad.data()[[0, 0]], -1.0);
        assert_relative_eq!(grad.data()[[0, 1]], -2.0);
    }

    #[test]
    fn test_mse_perfect_prediction() {
        let (predictions, targets) = maps(vec![1.0, 2.0], vec![1.0, 2.0], 2);
        let loss_fn = MseLoss::new("pos", TargetRef::full("actions"));

        let loss = loss_fn.forward(&predictions, &targets).unwrap();
        assert_relative_eq!(loss.value(), 0.0);
    }

    #[test]
    fn test_mse_shape_mismatch() {
        let mut predictions = TensorMap::new();
        predictions.insert("pos".to_string(), Tensor::zeros(1, 3, false));
        let mut targets = TensorMap::new();
        targets.insert("actions".to_string(), Tensor::zeros(1, 2, false));

        let loss_fn = MseLoss::new("pos", TargetRef::full("actions"));
        assert!(loss_fn.forward(&predictions, &targets).is_err());
    }

    #[test]
    fn test_mse_missing_prediction() {
        let predictions = TensorMap::new();
        let mut targets = TensorMap::new();
        targets.insert("actions".to_string(), Tensor::zeros(1, 2, false));

        let loss_fn = MseLoss::new("pos", TargetRef::full("actions"));
        let err = loss_fn.forward(&predictions, &targets).unwrap_err();
        assert!(format!("{err}").contains("pos"));
    }
}
