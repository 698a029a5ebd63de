//! Criterion trait and loss value

use crate::data::TensorMap;
use crate::error::{EpochError, Result};
use crate::tensor::Tensor;

/// Scalar loss with the output-side gradients needed for backpropagation
///
/// `grads` maps prediction keys to `dL/d(prediction)` tensors. The model's
/// backward pass consumes them; the runner only carries the scalar.
#[derive(Debug, Clone)]
pub struct Loss {
    value: f32,
    grads: TensorMap,
}

impl Loss {
    /// Create a loss from a scalar value and per-output gradients
    pub fn new(value: f32, grads: TensorMap) -> Self {
        Self { value, grads }
    }

    /// Scalar loss value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Gradients with respect to each named prediction
    pub fn grads(&self) -> &TensorMap {
        &self.grads
    }

    /// Gradient for a single prediction key
    pub fn grad(&self, key: &str) -> Option<&Tensor> {
        self.grads.get(key)
    }
}

/// Trait for loss functions over named predictions and targets
pub trait Criterion {
    /// Compute the loss and its output-side gradients
    fn forward(&self, predictions: &TensorMap, targets: &TensorMap) -> Result<Loss>;

    /// Name of the loss function
    fn name(&self) -> &str;
}

/// Reference to a target tensor, optionally narrowed to a column range
///
/// A composite target tensor can pack several supervision signals into one
/// key (e.g. coordinates in the leading columns, a one-hot class in the
/// trailing ones); the range selects the slice a loss term trains against.
#[derive(Debug, Clone)]
pub struct TargetRef {
    key: String,
    cols: Option<(usize, usize)>,
}

impl TargetRef {
    /// Reference the full target tensor under `key`
    pub fn full(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cols: None,
        }
    }

    /// Reference columns `start..end` of the target tensor under `key`
    pub fn cols(key: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            key: key.into(),
            cols: Some((start, end)),
        }
    }

    /// Target key this reference points at
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolve against a batch's targets
    pub fn resolve(&self, targets: &TensorMap) -> Result<Tensor> {
        let tensor = targets.get(&self.key).ok_or_else(|| EpochError::MissingKey {
            context: "batch targets",
            key: self.key.clone(),
        })?;
        match self.cols {
            Some((start, end)) => tensor.slice_cols(start, end),
            None => Ok(tensor.detach()),
        }
    }
}

pub(crate) fn lookup_prediction<'a>(predictions: &'a TensorMap, key: &str) -> Result<&'a Tensor> {
    predictions.get(key).ok_or_else(|| EpochError::MissingKey {
        context: "model outputs",
        key: key.to_string(),
    })
}
