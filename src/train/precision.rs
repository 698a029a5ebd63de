//! Reduced-precision accumulation
//!
//! The runner's data currency stays f32; reduced precision is modeled by
//! rounding accumulated losses and cached predictions through the reduced
//! format, so half-precision epochs report the values such a run would see.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tensor::Tensor;

/// Numeric precision for loss accumulation and cached predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Precision {
    /// 32-bit floating point (default)
    #[default]
    Fp32,
    /// 16-bit floating point (IEEE half precision)
    Fp16,
    /// 16-bit brain floating point (truncated mantissa)
    Bf16,
}

impl Precision {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Precision::Fp32 => "fp32",
            Precision::Fp16 => "fp16",
            Precision::Bf16 => "bf16",
        }
    }

    /// Whether this is a reduced precision type
    pub fn is_reduced(&self) -> bool {
        matches!(self, Precision::Fp16 | Precision::Bf16)
    }

    /// Round a value through this precision
    pub fn round(&self, value: f32) -> f32 {
        match self {
            Precision::Fp32 => value,
            Precision::Fp16 => fp16_to_f32(f32_to_fp16(value)),
            Precision::Bf16 => bf16_to_f32(f32_to_bf16(value)),
        }
    }

    /// Round every element of a tensor through this precision
    pub fn round_tensor(&self, tensor: &Tensor) -> Tensor {
        if !self.is_reduced() {
            return tensor.detach();
        }
        let mut out = tensor.detach();
        out.data_mut().mapv_inplace(|v| self.round(v));
        out
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Convert f32 to bf16 (truncated)
pub fn f32_to_bf16(value: f32) -> u16 {
    let bits = value.to_bits();
    // Upper 16 bits: sign + exponent + 7 mantissa bits
    (bits >> 16) as u16
}

/// Convert bf16 to f32
pub fn bf16_to_f32(value: u16) -> f32 {
    f32::from_bits(u32::from(value) << 16)
}

/// Convert f32 to fp16 (IEEE half precision)
pub fn f32_to_fp16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = (bits >> 31) & 1;
    let exp = ((bits >> 23) & 0xFF) as i32;
    let mantissa = bits & 0x7F_FFFF;

    if exp == 0xFF {
        // Inf or NaN
        return ((sign << 15) | 0x7C00 | (mantissa >> 13).min(1)) as u16;
    }

    let new_exp = exp - 127 + 15;

    if new_exp <= 0 {
        // Underflow to zero
        return (sign << 15) as u16;
    }

    if new_exp >= 31 {
        // Overflow to infinity
        return ((sign << 15) | 0x7C00) as u16;
    }

    let new_mantissa = mantissa >> 13;
    ((sign << 15) | ((new_exp as u32) << 10) | new_mantissa) as u16
}

/// Convert fp16 to f32
pub fn fp16_to_f32(value: u16) -> f32 {
    let sign = u32::from((value >> 15) & 1);
    let exp = u32::from((value >> 10) & 0x1F);
    let mantissa = u32::from(value & 0x3FF);

    if exp == 0x1F {
        // Inf or NaN
        let new_mantissa = if mantissa != 0 { 0x40_0000 } else { 0 };
        return f32::from_bits((sign << 31) | 0x7F80_0000 | new_mantissa);
    }

    if exp == 0 {
        // Zero or denormal
        if mantissa == 0 {
            return f32::from_bits(sign << 31);
        }
        let mut m = mantissa;
        let mut e = 1i32;
        while (m & 0x400) == 0 {
            m <<= 1;
            e -= 1;
        }
        let new_exp = ((e + 127 - 15) as u32) & 0xFF;
        let new_mantissa = (m & 0x3FF) << 13;
        return f32::from_bits((sign << 31) | (new_exp << 23) | new_mantissa);
    }

    let new_exp = (exp + 127 - 15) & 0xFF;
    let new_mantissa = mantissa << 13;
    f32::from_bits((sign << 31) | (new_exp << 23) | new_mantissa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fp32_round_is_identity() {
        assert_eq!(Precision::Fp32.round(1.2345678), 1.2345678);
        assert!(!Precision::Fp32.is_reduced());
    }

    #[test]
    fn test_fp16_round_trip_exact_values() {
        for v in [0.0, 1.0, -2.5, 0.5, 1024.0] {
            assert_eq!(Precision::Fp16.round(v), v);
        }
    }

    #[test]
    fn test_fp16_loses_mantissa_bits() {
        let v = 1.0 + 1e-4;
        let rounded = Precision::Fp16.round(v);
        assert_ne!(rounded, v);
        assert!((rounded - v).abs() < 1e-3);
    }

    #[test]
    fn test_fp16_overflow_to_infinity() {
        assert!(Precision::Fp16.round(1e6).is_infinite());
        assert!(Precision::Fp16.round(-1e6).is_infinite());
    }

    #[test]
    fn test_bf16_round_trip() {
        for v in [0.0, 1.0, -2.5, 65536.0] {
            assert_eq!(Precision::Bf16.round(v), v);
        }
        // bf16 has a wider range than fp16
        assert!(Precision::Bf16.round(1e6).is_finite());
    }

    #[test]
    fn test_round_tensor_detaches() {
        let mut t = Tensor::from_vec(vec![1.0 + 1e-4], true);
        t.accumulate_grad(&ndarray::arr2(&[[1.0]]));

        let rounded = Precision::Fp16.round_tensor(&t);
        assert!(!rounded.requires_grad());
        assert!(rounded.grad().is_none());
        assert_ne!(rounded.data()[[0, 0]], t.data()[[0, 0]]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Precision::Fp16), "fp16");
    }
}
