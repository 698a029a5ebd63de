//! Data-currency tensor
//!
//! A thin 2-D tensor over `ndarray` used to move batches, predictions, and
//! gradients between the runner and its collaborators. Rows are samples,
//! columns are features. The gradient buffer is written by the model's
//! backward pass and consumed by the optimizer; no computation graph is
//! kept here.

use ndarray::{concatenate, s, Array2, Axis};

use crate::device::Device;
use crate::error::{EpochError, Result};

/// 2-D f32 tensor with a device tag and an optional gradient buffer
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Array2<f32>,
    grad: Option<Array2<f32>>,
    requires_grad: bool,
    device: Device,
}

impl Tensor {
    /// Create a tensor from an owned array
    pub fn new(data: Array2<f32>, requires_grad: bool) -> Self {
        Self {
            data,
            grad: None,
            requires_grad,
            device: Device::Cpu,
        }
    }

    /// Create a single-row tensor from a flat vector
    pub fn from_vec(values: Vec<f32>, requires_grad: bool) -> Self {
        let cols = values.len();
        let data = Array2::from_shape_vec((1, cols), values)
            .unwrap_or_else(|_| Array2::zeros((1, cols)));
        Self::new(data, requires_grad)
    }

    /// Create a tensor from row-major values with the given shape
    pub fn from_rows(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        let data =
            Array2::from_shape_vec((rows, cols), values).map_err(|e| EpochError::ShapeMismatch {
                key: "from_rows".to_string(),
                expected: format!("{rows}x{cols}"),
                actual: e.to_string(),
            })?;
        Ok(Self::new(data, false))
    }

    /// Create a zero-filled tensor
    pub fn zeros(rows: usize, cols: usize, requires_grad: bool) -> Self {
        Self::new(Array2::zeros((rows, cols)), requires_grad)
    }

    /// Number of rows (samples)
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns (features)
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor has no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Immutable view of the underlying data
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Mutable view of the underlying data
    pub fn data_mut(&mut self) -> &mut Array2<f32> {
        &mut self.data
    }

    /// Whether gradients are tracked for this tensor
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Current gradient, if any has been accumulated
    pub fn grad(&self) -> Option<&Array2<f32>> {
        self.grad.as_ref()
    }

    /// Accumulate a gradient into the buffer
    pub fn accumulate_grad(&mut self, grad: &Array2<f32>) {
        match self.grad.as_mut() {
            Some(existing) => *existing += grad,
            None => self.grad = Some(grad.clone()),
        }
    }

    /// Clear the gradient buffer
    pub fn zero_grad(&mut self) {
        self.grad = None;
    }

    /// Device this tensor is tagged for
    pub fn device(&self) -> Device {
        self.device
    }

    /// Retag the tensor for a device
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Copy of the data with no gradient state
    pub fn detach(&self) -> Self {
        Self {
            data: self.data.clone(),
            grad: None,
            requires_grad: false,
            device: self.device,
        }
    }

    /// Extract the value of a 1x1 tensor
    pub fn scalar(&self) -> Option<f32> {
        if self.len() == 1 {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// Index of the maximum value in each row
    ///
    /// Ties resolve to the first maximal column, matching the usual argmax
    /// convention.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f32::NEG_INFINITY), |(bi, bv), (i, &v)| {
                        if v > bv {
                            (i, v)
                        } else {
                            (bi, bv)
                        }
                    })
                    .0
            })
            .collect()
    }

    /// Copy of a contiguous range of columns
    pub fn slice_cols(&self, start: usize, end: usize) -> Result<Self> {
        if end > self.cols() || start > end {
            return Err(EpochError::ShapeMismatch {
                key: "slice_cols".to_string(),
                expected: format!("columns {start}..{end}"),
                actual: format!("{}x{}", self.rows(), self.cols()),
            });
        }
        let data = self.data.slice(s![.., start..end]).to_owned();
        Ok(Self {
            data,
            grad: None,
            requires_grad: false,
            device: self.device,
        })
    }

    /// Concatenate tensors row-wise
    pub fn concat_rows(parts: &[Tensor]) -> Result<Self> {
        let first = parts.first().ok_or(EpochError::EmptyConcat)?;
        let views: Vec<_> = parts.iter().map(|t| t.data.view()).collect();
        let data = concatenate(Axis(0), &views).map_err(|e| EpochError::ShapeMismatch {
            key: "concat_rows".to_string(),
            expected: format!("{} columns", first.cols()),
            actual: e.to_string(),
        })?;
        Ok(Self {
            data,
            grad: None,
            requires_grad: false,
            device: first.device,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_shape() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
        assert_eq!(t.rows(), 1);
        assert_eq!(t.cols(), 3);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_scalar() {
        let t = Tensor::from_vec(vec![0.5], false);
        assert_eq!(t.scalar(), Some(0.5));

        let t = Tensor::from_vec(vec![0.5, 1.5], false);
        assert_eq!(t.scalar(), None);
    }

    #[test]
    fn test_grad_accumulation() {
        let mut t = Tensor::zeros(1, 2, true);
        let g = ndarray::arr2(&[[1.0, 2.0]]);
        t.accumulate_grad(&g);
        t.accumulate_grad(&g);
        let grad = t.grad().unwrap();
        assert_eq!(grad[[0, 0]], 2.0);
        assert_eq!(grad[[0, 1]], 4.0);

        t.zero_grad();
        assert!(t.grad().is_none());
    }

    #[test]
    fn test_detach_drops_grad_state() {
        let mut t = Tensor::zeros(1, 2, true);
        t.accumulate_grad(&ndarray::arr2(&[[1.0, 1.0]]));
        let d = t.detach();
        assert!(!d.requires_grad());
        assert!(d.grad().is_none());
        assert_eq!(d.data(), t.data());
    }

    #[test]
    fn test_argmax_rows() {
        let t = Tensor::from_rows(2, 3, vec![0.1, 0.9, 0.0, 0.3, 0.2, 0.8]).unwrap();
        assert_eq!(t.argmax_rows(), vec![1, 2]);
    }

    #[test]
    fn test_argmax_rows_tie_takes_first() {
        let t = Tensor::from_rows(1, 3, vec![0.5, 0.5, 0.1]).unwrap();
        assert_eq!(t.argmax_rows(), vec![0]);
    }

    #[test]
    fn test_slice_cols() {
        let t = Tensor::from_rows(2, 4, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        let left = t.slice_cols(0, 2).unwrap();
        assert_eq!(left.cols(), 2);
        assert_eq!(left.data()[[1, 1]], 6.0);

        let right = t.slice_cols(2, 4).unwrap();
        assert_eq!(right.data()[[0, 0]], 3.0);

        assert!(t.slice_cols(3, 5).is_err());
    }

    #[test]
    fn test_concat_rows() {
        let a = Tensor::from_rows(1, 2, vec![1.0, 2.0]).unwrap();
        let b = Tensor::from_rows(2, 2, vec![3.0, 4.0, 5.0, 6.0]).unwrap();
        let c = Tensor::concat_rows(&[a, b]).unwrap();
        assert_eq!(c.rows(), 3);
        assert_eq!(c.data()[[2, 1]], 6.0);

        assert!(Tensor::concat_rows(&[]).is_err());
    }

    #[test]
    fn test_to_device_retags() {
        let t = Tensor::zeros(1, 1, false).to_device(Device::Cuda);
        assert_eq!(t.device(), Device::Cuda);
    }
}
