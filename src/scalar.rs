//! The floating-point type the whole crate is generic over.
use std::fmt::{Debug, Display};

use num_traits::Float;
use rand::distributions::{Distribution, Standard};

/// A real floating-point type usable as the scalar for a [`crate::Sampler`].
///
/// Implemented for `f32` and `f64`. Nothing in the crate dispatches on this
/// trait at runtime -- every algorithm is monomorphized at the call site.
pub trait Scalar: Float + Display + Debug + Copy + Send + Sync + 'static
where
    Standard: Distribution<Self>,
{
    /// Lossy conversion from an `f64` literal used throughout the crate's
    /// closed-form formulas (e.g. `2.0`, `0.5`).
    fn from_f64(x: f64) -> Self;

    /// This type's value as an `f64`, used only for error messages and
    /// diagnostics where losing precision is acceptable.
    fn to_f64_lossy(self) -> f64;
}

impl Scalar for f32 {
    fn from_f64(x: f64) -> Self {
        x as f32
    }

    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    fn from_f64(x: f64) -> Self {
        x
    }

    fn to_f64_lossy(self) -> f64 {
        self
    }
}
