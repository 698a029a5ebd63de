//! Metric plan and epoch-level accumulation
//!
//! The plan names which model output carries class logits, which carries
//! predicted coordinates, and how the packed target tensor splits into true
//! coordinates and a one-hot class. Defaults match a gripper-control layout:
//! output `grp` holds class logits, output `pos` holds xyz coordinates, and
//! target `actions` packs coordinates in columns 0..3 with the one-hot class
//! after them.

use serde::{Deserialize, Serialize};

use super::classification::accuracy_from_labels;
use super::regression::rmse;
use crate::data::TensorMap;
use crate::error::{EpochError, Result};
use crate::tensor::Tensor;

/// Wiring between model outputs, targets, and the epoch metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricPlan {
    /// Output key holding class logits
    pub class_output: String,
    /// Output key holding predicted coordinates
    pub coord_output: String,
    /// Target key holding packed coordinates and one-hot class
    pub target_key: String,
    /// Number of leading target columns that are coordinates
    pub coord_dims: usize,
}

impl Default for MetricPlan {
    fn default() -> Self {
        Self {
            class_output: "grp".to_string(),
            coord_output: "pos".to_string(),
            target_key: "actions".to_string(),
            coord_dims: 3,
        }
    }
}

impl MetricPlan {
    /// Create a plan with explicit keys and coordinate width
    pub fn new(
        class_output: impl Into<String>,
        coord_output: impl Into<String>,
        target_key: impl Into<String>,
        coord_dims: usize,
    ) -> Self {
        Self {
            class_output: class_output.into(),
            coord_output: coord_output.into(),
            target_key: target_key.into(),
            coord_dims,
        }
    }
}

/// Metrics computed over one epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Classification accuracy over all samples in the epoch
    pub accuracy: f32,
    /// Root mean squared error over all predicted coordinates
    pub rmse: f32,
}

/// Accumulates labels and coordinates across batches, then computes
/// epoch-level accuracy and RMSE
pub struct MetricAccumulator {
    plan: MetricPlan,
    class_pred: Vec<usize>,
    class_true: Vec<usize>,
    coord_pred: Vec<f32>,
    coord_true: Vec<f32>,
}

impl MetricAccumulator {
    /// Create an empty accumulator for the given plan
    pub fn new(plan: MetricPlan) -> Self {
        Self {
            plan,
            class_pred: Vec::new(),
            class_true: Vec::new(),
            coord_pred: Vec::new(),
            coord_true: Vec::new(),
        }
    }

    /// Record one batch of predictions and targets
    pub fn observe(&mut self, predictions: &TensorMap, targets: &TensorMap) -> Result<()> {
        let logits = lookup(predictions, &self.plan.class_output, "model outputs")?;
        let coords = lookup(predictions, &self.plan.coord_output, "model outputs")?;
        let target = lookup(targets, &self.plan.target_key, "batch targets")?;

        let class_true = target.slice_cols(self.plan.coord_dims, target.cols())?;
        let coord_true = target.slice_cols(0, self.plan.coord_dims)?;

        if coords.cols() != self.plan.coord_dims {
            return Err(EpochError::ShapeMismatch {
                key: self.plan.coord_output.clone(),
                expected: format!("{}x{}", coords.rows(), self.plan.coord_dims),
                actual: format!("{}x{}", coords.rows(), coords.cols()),
            });
        }

        self.class_pred.extend(logits.argmax_rows());
        self.class_true.extend(class_true.argmax_rows());
        self.coord_pred.extend(coords.data().iter().copied());
        self.coord_true.extend(coord_true.data().iter().copied());
        Ok(())
    }

    /// Number of samples observed so far
    pub fn samples(&self) -> usize {
        self.class_pred.len()
    }

    /// Compute epoch metrics over everything observed
    pub fn finish(&self) -> EpochMetrics {
        EpochMetrics {
            accuracy: accuracy_from_labels(&self.class_pred, &self.class_true),
            rmse: rmse(&self.coord_pred, &self.coord_true),
        }
    }
}

fn lookup<'a>(map: &'a TensorMap, key: &str, context: &'static str) -> Result<&'a Tensor> {
    map.get(key).ok_or_else(|| EpochError::MissingKey {
        context,
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn batch(logits: Vec<f32>, coords: Vec<f32>, actions: Vec<f32>) -> (TensorMap, TensorMap) {
        let rows = coords.len() / 3;
        let mut predictions = TensorMap::new();
        predictions.insert(
            "grp".to_string(),
            Tensor::from_rows(rows, logits.len() / rows, logits).unwrap(),
        );
        predictions.insert("pos".to_string(), Tensor::from_rows(rows, 3, coords).unwrap());
        let mut targets = TensorMap::new();
        targets.insert(
            "actions".to_string(),
            Tensor::from_rows(rows, actions.len() / rows, actions).unwrap(),
        );
        (predictions, targets)
    }

    #[test]
    fn test_accumulate_and_finish() {
        let mut acc = MetricAccumulator::new(MetricPlan::default());

        // One sample: predicted class 1, true class 1; coords off by 1 each
        let (predictions, targets) = batch(
            vec![0.1, 0.9],
            vec![1.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0, 1.0],
        );
        acc.observe(&predictions, &targets).unwrap();
        assert_eq!(acc.samples(), 1);

        let metrics = acc.finish();
        assert_relative_eq!(metrics.accuracy, 1.0);
        assert_relative_eq!(metrics.rmse, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_accumulates_across_batches() {
        let mut acc = MetricAccumulator::new(MetricPlan::default());

        // Correct class
        let (p1, t1) = batch(
            vec![0.9, 0.1],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0, 0.0],
        );
        // Wrong class
        let (p2, t2) = batch(
            vec![0.9, 0.1],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 1.0],
        );
        acc.observe(&p1, &t1).unwrap();
        acc.observe(&p2, &t2).unwrap();

        assert_eq!(acc.samples(), 2);
        assert_relative_eq!(acc.finish().accuracy, 0.5);
    }

    #[test]
    fn test_missing_output_key() {
        let mut acc = MetricAccumulator::new(MetricPlan::default());
        let (mut predictions, targets) = batch(
            vec![0.9, 0.1],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0, 0.0],
        );
        predictions.remove("grp");

        let err = acc.observe(&predictions, &targets).unwrap_err();
        assert!(format!("{err}").contains("grp"));
    }

    #[test]
    fn test_coord_width_mismatch() {
        let plan = MetricPlan::new("grp", "pos", "actions", 2);
        let mut acc = MetricAccumulator::new(plan);
        let (predictions, targets) = batch(
            vec![0.9, 0.1],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0, 0.0],
        );

        // Plan expects 2 coordinate columns but "pos" has 3
        assert!(acc.observe(&predictions, &targets).is_err());
    }

    #[test]
    fn test_empty_accumulator_finishes_to_zero() {
        let acc = MetricAccumulator::new(MetricPlan::default());
        let metrics = acc.finish();
        assert_eq!(metrics.accuracy, 0.0);
        assert_eq!(metrics.rmse, 0.0);
    }

    #[test]
    fn test_metrics_serialize() {
        let metrics = EpochMetrics {
            accuracy: 0.75,
            rmse: 0.5,
        };
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("accuracy"));
        assert!(json.contains("rmse"));
    }
}
