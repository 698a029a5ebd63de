//! Loss functions for multi-output training

mod composite;
mod cross_entropy;
mod mse;
mod traits;

pub use composite::CompositeCriterion;
pub use cross_entropy::CrossEntropyLoss;
pub use mse::MseLoss;
pub use traits::{Criterion, Loss, TargetRef};
