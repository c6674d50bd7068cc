//! Two-point linear functions used for tangents and secants.
use crate::scalar::Scalar;

/// A linear function in "indirect" form, `y = a + slope * (x - pivot)`.
///
/// Anchoring at `pivot` instead of storing the classical `y = slope*x +
/// intercept` form avoids catastrophic cancellation when `x` is close to
/// `pivot` but `pivot` itself is large.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFun<S> {
    pub slope: S,
    pub pivot: S,
    pub a: S,
}

impl<S: Scalar> LinearFun<S> {
    pub fn new(slope: S, pivot: S, a: S) -> Self {
        LinearFun { slope, pivot, a }
    }

    /// A linear function with no valid squeeze: `slope` is `NaN` and the
    /// area contribution is defined to be zero (see [`Self::is_undefined`]).
    pub fn undefined() -> Self {
        LinearFun {
            slope: S::nan(),
            pivot: S::zero(),
            a: S::zero(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.slope.is_nan()
    }

    /// The tangent to the transformed density at `(x, y)` with derivative
    /// `slope`.
    pub fn tangent(x: S, y: S, slope: S) -> Self {
        LinearFun::new(slope, x, y)
    }

    /// The chord through `(xl, yl)` and `(xr, yr)`, anchored at whichever
    /// endpoint has the larger function value (the monotone-friendly
    /// anchoring of Botts, Hörmann & Leydold).
    pub fn secant(xl: S, xr: S, yl: S, yr: S) -> Self {
        let slope = (yr - yl) / (xr - xl);
        if yl >= yr {
            LinearFun::new(slope, xl, yl)
        } else {
            LinearFun::new(slope, xr, yr)
        }
    }

    #[inline]
    pub fn evaluate(&self, x: S) -> S {
        self.a + self.slope * (x - self.pivot)
    }

    /// The `x` such that `evaluate(x) == y`.
    #[inline]
    pub fn inverse(&self, y: S) -> S {
        self.pivot + (y - self.a) / self.slope
    }

    /// The classical `y = slope*x + intercept` intercept, derived on
    /// demand (not cached; rarely needed on the hot path).
    pub fn intercept(&self) -> S {
        self.a - self.slope * self.pivot
    }
}
