//! Model trait
//!
//! The model is an external collaborator. Its forward pass maps named inputs
//! to named outputs, and its backward pass turns the criterion's output-side
//! gradients into parameter gradients. Whatever differentiation machinery
//! the implementation uses stays behind this trait.

use crate::data::TensorMap;
use crate::error::Result;
use crate::tensor::Tensor;
use crate::train::Loss;

/// Trait for trainable multi-output models
pub trait Module {
    /// Switch between training and evaluation behavior
    fn set_training(&mut self, training: bool);

    /// Compute named outputs from named inputs
    fn forward(&mut self, inputs: &TensorMap) -> Result<TensorMap>;

    /// Propagate the loss gradients into parameter gradient buffers
    ///
    /// `loss.grads()` holds `dL/d(prediction)` per output key from the most
    /// recent forward pass.
    fn backward(&mut self, loss: &Loss) -> Result<()>;

    /// Mutable references to all trainable parameters
    ///
    /// Used by the optimizer for `zero_grad` and `step`.
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;
}
