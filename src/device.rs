//! Device placement tag
//!
//! The runner routes batches to the requested device before the forward
//! pass. Actual placement is the collaborating framework's concern; the
//! tag only records where a tensor is expected to live.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target device for a training pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Device {
    /// Host memory (default)
    #[default]
    Cpu,
    /// GPU memory
    Cuda,
}

impl Device {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }

    /// Whether this device is a GPU
    pub fn is_cuda(&self) -> bool {
        matches!(self, Device::Cuda)
    }

    /// Select a device from a gpu flag
    pub fn from_gpu_flag(gpu: bool) -> Self {
        if gpu {
            Device::Cuda
        } else {
            Device::Cpu
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
