//! Single-epoch training loop
//!
//! This module provides the epoch runner and its supporting pieces:
//! - Loss functions (MSE, Cross-Entropy, weighted composite)
//! - Evaluation metrics (Accuracy, RMSE) and the metric plan
//! - Reduced-precision accumulation (fp16/bf16)
//! - Epoch configuration and report types
//!
//! # Example
//!
//! ```no_run
//! use epoca::train::{CompositeCriterion, CrossEntropyLoss, EpochConfig, EpochRunner, MseLoss, TargetRef};
//! use epoca::{Device, Sgd};
//!
//! let criterion = CompositeCriterion::new()
//!     .with_term(1.0, CrossEntropyLoss::new("grp", TargetRef::cols("actions", 3, 7)))
//!     .with_term(1.0, MseLoss::new("pos", TargetRef::cols("actions", 0, 3)));
//! let mut optimizer = Sgd::new(0.01, 0.9);
//! let runner = EpochRunner::new(EpochConfig::default());
//!
//! // let report = runner.run(&mut model, batches, Device::Cpu, &mut optimizer, &criterion)?;
//! // println!("mean loss {:.4}", report.mean_loss);
//! ```

mod epoch;
mod loss;
mod metrics;
mod precision;

pub use epoch::{EpochConfig, EpochReport, EpochRunner};
pub use loss::{CompositeCriterion, Criterion, CrossEntropyLoss, Loss, MseLoss, TargetRef};
pub use metrics::{
    accuracy_from_labels, mean_squared_error, rmse, Accuracy, EpochMetrics, Metric,
    MetricAccumulator, MetricPlan, Rmse,
};
pub use precision::Precision;
