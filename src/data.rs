//! Batch data structures

use std::collections::BTreeMap;

use crate::device::Device;
use crate::tensor::Tensor;

/// Named tensors, keyed by input/output name
///
/// Backed by a `BTreeMap` so key iteration order is deterministic.
pub type TensorMap = BTreeMap<String, Tensor>;

/// A training batch with named inputs and named targets
#[derive(Debug, Clone)]
pub struct Batch {
    /// Input features by name
    pub inputs: TensorMap,
    /// Target labels/values by name
    pub targets: TensorMap,
}

impl Batch {
    /// Create a new batch
    pub fn new(inputs: TensorMap, targets: TensorMap) -> Self {
        Self { inputs, targets }
    }

    /// Batch size, taken from the first input tensor's row count
    pub fn size(&self) -> usize {
        self.inputs.values().next().map_or(0, Tensor::rows)
    }

    /// Retag every tensor in the batch for a device
    pub fn to_device(self, device: Device) -> Self {
        Self {
            inputs: map_to_device(self.inputs, device),
            targets: map_to_device(self.targets, device),
        }
    }
}

fn map_to_device(map: TensorMap, device: Device) -> TensorMap {
    map.into_iter()
        .map(|(k, t)| (k, t.to_device(device)))
        .collect()
}
