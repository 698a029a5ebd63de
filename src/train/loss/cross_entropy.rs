//! Cross-entropy loss over row logits

use ndarray::{Array2, Axis};

use super::traits::{lookup_prediction, Criterion, Loss, TargetRef};
use crate::data::TensorMap;
use crate::error::{EpochError, Result};
use crate::tensor::Tensor;

const LOG_EPS: f32 = 1e-12;

/// Softmax cross-entropy for one named prediction
///
/// Each prediction row holds class logits; the referenced target slice holds
/// the matching one-hot rows. The gradient is the standard
/// (softmax - one_hot) / batch_size.
pub struct CrossEntropyLoss {
    output_key: String,
    target: TargetRef,
}

impl CrossEntropyLoss {
    /// Create a cross-entropy loss for `output_key` against the referenced target
    pub fn new(output_key: impl Into<String>, target: TargetRef) -> Self {
        Self {
            output_key: output_key.into(),
            target,
        }
    }
}

fn softmax_rows(logits: &Array2<f32>) -> Array2<f32> {
    let mut out = logits.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        row.mapv_inplace(|v| (v - max).exp());
        let sum: f32 = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
    out
}

impl Criterion for CrossEntropyLoss {
    fn forward(&self, predictions: &TensorMap, targets: &TensorMap) -> Result<Loss> {
        let logits = lookup_prediction(predictions, &self.output_key)?;
        let one_hot = self.target.resolve(targets)?;

        if logits.rows() != one_hot.rows() || logits.cols() != one_hot.cols() {
            return Err(EpochError::ShapeMismatch {
                key: self.output_key.clone(),
                expected: format!("{}x{}", one_hot.rows(), one_hot.cols()),
                actual: format!("{}x{}", logits.rows(), logits.cols()),
            });
        }

        let probs = softmax_rows(logits.data());
        let rows = logits.rows().max(1) as f32;

        let mut value = 0.0f32;
        for (p_row, t_row) in probs.axis_iter(Axis(0)).zip(one_hot.data().axis_iter(Axis(0))) {
            for (&p, &t) in p_row.iter().zip(t_row.iter()) {
                if t > 0.0 {
                    value -= t * (p + LOG_EPS).ln();
                }
            }
        }
        value /= rows;

        let grad = (&probs - one_hot.data()) / rows;

        let mut grads = TensorMap::new();
        grads.insert(self.output_key.clone(), Tensor::new(grad, false));
        Ok(Loss::new(value, grads))
    }

    fn name(&self) -> &str {
        "cross_entropy"
    }
}
