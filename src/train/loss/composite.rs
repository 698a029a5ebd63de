//! Weighted sum of loss terms

use super::traits::{Criterion, Loss};
use crate::data::TensorMap;
use crate::error::Result;
use crate::tensor::Tensor;

/// Composite criterion summing weighted per-output loss terms
///
/// This is the usual shape for multi-output training: one term per model
/// head, each reading its own slice of the targets. Gradients for the same
/// prediction key accumulate across terms.
///
/// # Example
///
/// ```
/// use epoca::train::{CompositeCriterion, CrossEntropyLoss, MseLoss, TargetRef};
///
/// let criterion = CompositeCriterion::new()
///     .with_term(1.0, CrossEntropyLoss::new("grp", TargetRef::cols("actions", 3, 7)))
///     .with_term(0.5, MseLoss::new("pos", TargetRef::cols("actions", 0, 3)));
/// ```
#[derive(Default)]
pub struct CompositeCriterion {
    terms: Vec<(f32, Box<dyn Criterion>)>,
}

impl CompositeCriterion {
    /// Create an empty composite criterion
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a weighted loss term
    pub fn with_term<C: Criterion + 'static>(mut self, weight: f32, criterion: C) -> Self {
        self.terms.push((weight, Box::new(criterion)));
        self
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no terms have been added
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Criterion for CompositeCriterion {
    fn forward(&self, predictions: &TensorMap, targets: &TensorMap) -> Result<Loss> {
        let mut value = 0.0f32;
        let mut grads = TensorMap::new();

        for (weight, term) in &self.terms {
            let term_loss = term.forward(predictions, targets)?;
            value += weight * term_loss.value();

            for (key, grad) in term_loss.grads() {
                let scaled = grad.data() * *weight;
                match grads.get_mut(key) {
                    Some(existing) => *existing.data_mut() += &scaled,
                    None => {
                        grads.insert(key.clone(), Tensor::new(scaled, false));
                    }
                }
            }
        }

        Ok(Loss::new(value, grads))
    }

    fn name(&self) -> &str {
        "composite"
    }
}
