//! Numerical thresholds used by the area integrals and the sampling kernel.
//!
//! Tuned for `f64` (`1e-6`, `1e-10`) and scaled by the scalar type's
//! machine epsilon so they stay meaningful for other precisions. The
//! ratios below reproduce the `f64` values exactly (`f64::EPSILON` is
//! about `2.22e-16`) and degrade gracefully -- if conservatively -- for
//! `f32`.
use crate::scalar::Scalar;

/// Below this magnitude a linear function's slope is treated as zero to
/// avoid dividing by a near-zero number (used in both area integration and
/// the sampling kernel's hat inversion).
pub fn slope_eps<S: Scalar>() -> S {
    S::epsilon() * S::from_f64(4.5e5)
}

/// Below this magnitude of `z` in the Taylor-series branches of the
/// sampling kernel, the three-term expansion is used instead of the exact
/// closed form, to avoid cancellation.
pub fn taylor_z_eps<S: Scalar>() -> S {
    S::epsilon() * S::from_f64(4.5e9)
}
