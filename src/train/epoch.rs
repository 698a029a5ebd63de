//! Epoch-level training and validation

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::loss::Criterion;
use super::metrics::{EpochMetrics, MetricAccumulator, MetricPlan};
use super::precision::Precision;
use crate::data::{Batch, TensorMap};
use crate::device::Device;
use crate::error::{EpochError, Result};
use crate::module::Module;
use crate::optim::Optimizer;
use crate::tensor::Tensor;

/// Configuration for one epoch pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochConfig {
    /// Precision used for loss accumulation and cached predictions
    pub precision: Precision,
    /// Whether to cache per-batch predictions in the report
    pub cache_predictions: bool,
    /// Log running mean loss every N batches (0 disables)
    pub log_interval: usize,
    /// Wiring between outputs, targets, and epoch metrics
    pub metric_plan: MetricPlan,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            precision: Precision::Fp32,
            cache_predictions: true,
            log_interval: 10,
            metric_plan: MetricPlan::default(),
        }
    }
}

impl EpochConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accumulation precision
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Enable or disable prediction caching
    pub fn with_cache_predictions(mut self, cache: bool) -> Self {
        self.cache_predictions = cache;
        self
    }

    /// Set the progress log interval
    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Set the metric plan
    pub fn with_metric_plan(mut self, plan: MetricPlan) -> Self {
        self.metric_plan = plan;
        self
    }
}

/// Result of one epoch pass
#[derive(Debug, Clone)]
pub struct EpochReport {
    /// Mean loss over processed batches
    pub mean_loss: f32,
    /// Predictions concatenated row-wise per output key, if caching was on
    pub predictions: Option<TensorMap>,
    /// Epoch-level accuracy and RMSE
    pub metrics: EpochMetrics,
    /// Number of batches processed
    pub batches: usize,
}

/// Runs a single epoch of training or validation
///
/// The model, optimizer, criterion, and data source are collaborators; the
/// runner owns only the loop: route the batch to the device, forward,
/// compute the loss, accumulate metrics, backpropagate, and step.
///
/// # Example
///
/// ```no_run
/// use epoca::train::{EpochConfig, EpochRunner, Precision};
///
/// let runner = EpochRunner::new(
///     EpochConfig::new()
///         .with_precision(Precision::Fp16)
///         .with_cache_predictions(false),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpochRunner {
    config: EpochConfig,
}

impl EpochRunner {
    /// Create a runner from a config
    pub fn new(config: EpochConfig) -> Self {
        Self { config }
    }

    /// The runner's configuration
    pub fn config(&self) -> &EpochConfig {
        &self.config
    }

    /// Train for one epoch
    ///
    /// Per batch: move to device, zero gradients, forward, criterion,
    /// accumulate loss and metric inputs, optionally cache detached
    /// predictions, backpropagate, and step the optimizer. A backward
    /// failure logs the batch index at debug level and propagates.
    pub fn run<M, O, C, I>(
        &self,
        model: &mut M,
        batches: I,
        device: Device,
        optimizer: &mut O,
        criterion: &C,
    ) -> Result<EpochReport>
    where
        M: Module,
        O: Optimizer,
        C: Criterion,
        I: IntoIterator<Item = Batch>,
    {
        model.set_training(true);
        let mut state = EpochState::new(&self.config);

        for (i, batch) in batches.into_iter().enumerate() {
            let batch = batch.to_device(device);

            {
                let mut params = model.parameters_mut();
                optimizer.zero_grad(&mut params);
            }

            let output = model.forward(&batch.inputs)?;
            let loss = criterion.forward(&output, &batch.targets)?;
            state.record(&output, &batch.targets, loss.value())?;

            if let Err(source) = model.backward(&loss) {
                debug!("backward failed on training batch {i}");
                return Err(EpochError::Backward {
                    batch: i,
                    source: Box::new(source),
                });
            }

            {
                let mut params = model.parameters_mut();
                optimizer.step(&mut params);
            }

            if self.config.log_interval > 0 && (i + 1) % self.config.log_interval == 0 {
                info!(
                    "batch {}: mean loss {:.4} (lr {:.2e})",
                    i + 1,
                    state.mean_loss(),
                    optimizer.lr()
                );
            }
        }

        let report = state.finish()?;
        info!(
            "train epoch done: {} batches, mean loss {:.4}, accuracy {:.4}, rmse {:.4}",
            report.batches, report.mean_loss, report.metrics.accuracy, report.metrics.rmse
        );
        Ok(report)
    }

    /// Validate for one epoch without updating parameters
    ///
    /// Forward-only pass with the same loss and metric accumulation as
    /// [`run`](Self::run).
    pub fn validate<M, C, I>(
        &self,
        model: &mut M,
        batches: I,
        device: Device,
        criterion: &C,
    ) -> Result<EpochReport>
    where
        M: Module,
        C: Criterion,
        I: IntoIterator<Item = Batch>,
    {
        model.set_training(false);
        let mut state = EpochState::new(&self.config);

        for batch in batches {
            let batch = batch.to_device(device);
            let output = model.forward(&batch.inputs)?;
            let loss = criterion.forward(&output, &batch.targets)?;
            state.record(&output, &batch.targets, loss.value())?;
        }

        let report = state.finish()?;
        info!(
            "validation done: {} batches, mean loss {:.4}, accuracy {:.4}, rmse {:.4}",
            report.batches, report.mean_loss, report.metrics.accuracy, report.metrics.rmse
        );
        Ok(report)
    }
}

/// Running aggregates for one epoch pass
struct EpochState {
    precision: Precision,
    cache: bool,
    loss_sum: f32,
    batches: usize,
    cached: Vec<TensorMap>,
    accumulator: MetricAccumulator,
}

impl EpochState {
    fn new(config: &EpochConfig) -> Self {
        Self {
            precision: config.precision,
            cache: config.cache_predictions,
            loss_sum: 0.0,
            batches: 0,
            cached: Vec::new(),
            accumulator: MetricAccumulator::new(config.metric_plan.clone()),
        }
    }

    fn record(&mut self, output: &TensorMap, targets: &TensorMap, loss_value: f32) -> Result<()> {
        let p = self.precision;
        self.loss_sum = p.round(self.loss_sum + p.round(loss_value));
        self.batches += 1;

        self.accumulator.observe(output, targets)?;

        if self.cache {
            let detached: TensorMap = output
                .iter()
                .map(|(k, t)| (k.clone(), p.round_tensor(t)))
                .collect();
            self.cached.push(detached);
        }
        Ok(())
    }

    fn mean_loss(&self) -> f32 {
        if self.batches > 0 {
            self.loss_sum / self.batches as f32
        } else {
            0.0
        }
    }

    fn finish(self) -> Result<EpochReport> {
        let predictions = if self.cache && !self.cached.is_empty() {
            let mut merged = TensorMap::new();
            for key in self.cached[0].keys() {
                let mut parts = Vec::with_capacity(self.cached.len());
                for batch_preds in &self.cached {
                    let tensor =
                        batch_preds
                            .get(key)
                            .cloned()
                            .ok_or_else(|| EpochError::MissingKey {
                                context: "cached predictions",
                                key: key.clone(),
                            })?;
                    parts.push(tensor);
                }
                merged.insert(key.clone(), Tensor::concat_rows(&parts)?);
            }
            Some(merged)
        } else {
            None
        };

        Ok(EpochReport {
            mean_loss: self.mean_loss(),
            predictions,
            metrics: self.accumulator.finish(),
            batches: self.batches,
        })
    }
}
