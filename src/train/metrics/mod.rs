//! Epoch-level evaluation metrics

mod classification;
mod plan;
mod regression;
mod trait_def;

pub use classification::{accuracy_from_labels, Accuracy};
pub use plan::{EpochMetrics, MetricAccumulator, MetricPlan};
pub use regression::{mean_squared_error, rmse, Rmse};
pub use trait_def::Metric;
