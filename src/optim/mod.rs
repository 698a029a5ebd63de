//! Optimizers

mod sgd;

pub use sgd::Sgd;

use crate::tensor::Tensor;

/// Trait for optimization algorithms
///
/// Parameters arrive as mutable references borrowed from the model, so
/// implementations update in place.
pub trait Optimizer {
    /// Apply one update using the accumulated gradients
    fn step(&mut self, params: &mut [&mut Tensor]);

    /// Clear gradient buffers on all parameters
    fn zero_grad(&mut self, params: &mut [&mut Tensor]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}
