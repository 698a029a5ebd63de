//! Stochastic Gradient Descent optimizer

use ndarray::Array2;

use super::Optimizer;
use crate::tensor::Tensor;

/// SGD with optional momentum
///
/// Reference optimizer for tests and downstream examples. Velocities are
/// allocated lazily on the first step.
pub struct Sgd {
    lr: f32,
    momentum: f32,
    velocities: Vec<Option<Array2<f32>>>,
}

impl Sgd {
    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self {
            lr,
            momentum,
            velocities: Vec::new(),
        }
    }

    fn ensure_velocities(&mut self, n: usize) {
        if self.velocities.len() != n {
            self.velocities = (0..n).map(|_| None).collect();
        }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [&mut Tensor]) {
        self.ensure_velocities(params.len());

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad().cloned() else {
                continue;
            };

            if self.momentum > 0.0 {
                // v = momentum * v - lr * grad
                let velocity = match &self.velocities[i] {
                    Some(v) => v * self.momentum - &grad * self.lr,
                    None => &grad * (-self.lr),
                };
                *param.data_mut() += &velocity;
                self.velocities[i] = Some(velocity);
            } else {
                // param -= lr * grad
                *param.data_mut() -= &(&grad * self.lr);
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
