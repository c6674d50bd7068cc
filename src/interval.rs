//! A single partition element and its shape classification.
use crate::linear::LinearFun;
use crate::scalar::Scalar;
use crate::transform::transform_point;

/// One element of the partition during setup: endpoints, the `T_c`
/// parameter, the transformed density and its first two derivatives at
/// both endpoints, and the built hat/squeeze once they exist.
#[derive(Debug, Clone)]
pub struct Interval<S> {
    pub lx: S,
    pub rx: S,
    pub c: S,

    /// Transformed density value/derivatives at `lx`. `NaN` if `lx` is
    /// infinite -- the classifier and builder never read them in that case.
    pub ltx: S,
    pub lt1x: S,
    pub lt2x: S,

    /// Same, at `rx`.
    pub rtx: S,
    pub rt1x: S,
    pub rt2x: S,

    pub hat: LinearFun<S>,
    pub squeeze: LinearFun<S>,
    pub hat_area: S,
    pub squeeze_area: S,
}

impl<S: Scalar> Interval<S> {
    /// Builds an `Interval` by evaluating `f0, f1, f2` at each finite
    /// endpoint and transforming into `T_c`-space. `lx`/`rx` may be
    /// infinite; the corresponding transformed triple is left as `NaN`
    /// sentinels and must not be read by callers.
    pub fn new<F0, F1, F2>(lx: S, rx: S, c: S, f0: &F0, f1: &F1, f2: &F2) -> Self
    where
        F0: Fn(S) -> S,
        F1: Fn(S) -> S,
        F2: Fn(S) -> S,
    {
        let (ltx, lt1x, lt2x) = if lx.is_finite() {
            transform_point(f0(lx), f1(lx), f2(lx), c)
        } else {
            (S::nan(), S::nan(), S::nan())
        };
        let (rtx, rt1x, rt2x) = if rx.is_finite() {
            transform_point(f0(rx), f1(rx), f2(rx), c)
        } else {
            (S::nan(), S::nan(), S::nan())
        };
        Interval {
            lx,
            rx,
            c,
            ltx,
            lt1x,
            lt2x,
            rtx,
            rt1x,
            rt2x,
            hat: LinearFun::undefined(),
            squeeze: LinearFun::undefined(),
            hat_area: S::zero(),
            squeeze_area: S::zero(),
        }
    }

    /// Builds an `Interval` from already-evaluated *untransformed*
    /// `(f0, f1, f2)` triples at each endpoint, transforming into `T_c`
    /// space with this interval's own `c`. Used by the setup sweep, where
    /// a partition point is shared between two adjacent intervals that may
    /// carry different `c` values, so only the raw triple (not the
    /// transformed one) can be reused across the boundary. `None` stands
    /// for an infinite endpoint.
    pub fn from_raw(lx: S, rx: S, c: S, left: Option<(S, S, S)>, right: Option<(S, S, S)>) -> Self {
        let (ltx, lt1x, lt2x) = match left {
            Some((v0, v1, v2)) => transform_point(v0, v1, v2, c),
            None => (S::nan(), S::nan(), S::nan()),
        };
        let (rtx, rt1x, rt2x) = match right {
            Some((v0, v1, v2)) => transform_point(v0, v1, v2, c),
            None => (S::nan(), S::nan(), S::nan()),
        };
        Interval {
            lx,
            rx,
            c,
            ltx,
            lt1x,
            lt2x,
            rtx,
            rt1x,
            rt2x,
            hat: LinearFun::undefined(),
            squeeze: LinearFun::undefined(),
            hat_area: S::zero(),
            squeeze_area: S::zero(),
        }
    }

    /// The secant slope `R = (rtx - ltx) / (rx - lx)`; only meaningful
    /// when both endpoints are finite.
    pub fn secant_slope(&self) -> S {
        (self.rtx - self.ltx) / (self.rx - self.lx)
    }
}

/// The trimmed runtime record kept once setup is done: intermediate
/// derivative caches from [`Interval`] are dropped.
#[derive(Debug, Clone)]
pub struct FlexInterval<S> {
    pub lx: S,
    pub rx: S,
    pub c: S,
    pub hat: LinearFun<S>,
    pub squeeze: LinearFun<S>,
    pub hat_area: S,
    pub squeeze_area: S,
}

impl<S: Scalar> From<&Interval<S>> for FlexInterval<S> {
    fn from(iv: &Interval<S>) -> Self {
        FlexInterval {
            lx: iv.lx,
            rx: iv.rx,
            c: iv.c,
            hat: iv.hat,
            squeeze: iv.squeeze,
            hat_area: iv.hat_area,
            squeeze_area: iv.squeeze_area,
        }
    }
}

/// Shape tag for an [`Interval`], determining which linear
/// hat/squeeze construction is valid.
///
/// The digit encodes the monotonicity of the first derivative relative to
/// the secant slope `R`; the letter encodes the sign of the second
/// derivative (`a` = concave, `b` = convex).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunType {
    T1a,
    T1b,
    T2a,
    T2b,
    T3a,
    T3b,
    T4a,
    T4b,
    Undefined,
}

/// Implements the shape-classification decision procedure of Botts,
/// Hoermann & Leydold (2013).
pub fn classify<S: Scalar>(iv: &Interval<S>) -> FunType {
    let neg_inf_left = iv.lx.is_infinite() && iv.lx.is_sign_negative();
    let pos_inf_right = iv.rx.is_infinite() && iv.rx.is_sign_positive();

    if neg_inf_left {
        return if iv.rt2x < S::zero() && iv.rt1x > S::zero() {
            FunType::T4a
        } else {
            FunType::Undefined
        };
    }
    if pos_inf_right {
        return if iv.lt2x < S::zero() && iv.lt1x < S::zero() {
            FunType::T4a
        } else {
            FunType::Undefined
        };
    }

    // Both endpoints finite from here on.
    let left_vanishes = (iv.c > S::zero() && iv.ltx == S::zero())
        || (iv.c <= S::zero() && iv.ltx.is_infinite() && iv.ltx.is_sign_negative());
    let right_vanishes = (iv.c > S::zero() && iv.rtx == S::zero())
        || (iv.c <= S::zero() && iv.rtx.is_infinite() && iv.rtx.is_sign_negative());

    if left_vanishes && !right_vanishes {
        return if iv.rt2x < S::zero() {
            FunType::T4a
        } else {
            FunType::T4b
        };
    }
    if right_vanishes && !left_vanishes {
        return if iv.lt2x < S::zero() {
            FunType::T4a
        } else {
            FunType::T4b
        };
    }

    if iv.c < S::zero() {
        if iv.ltx == S::zero() && iv.rt2x > S::zero() {
            return FunType::T4b;
        }
        if iv.rtx == S::zero() && iv.lt2x > S::zero() {
            return FunType::T4b;
        }
    }

    let r = iv.secant_slope();
    let left_above = iv.lt1x >= r;
    let right_above = iv.rt1x >= r;

    if left_above && right_above {
        return FunType::T1a;
    }
    if !left_above && !right_above {
        return FunType::T1b;
    }
    if iv.lt2x <= S::zero() && iv.rt2x <= S::zero() {
        return FunType::T4a;
    }
    if iv.lt2x >= S::zero() && iv.rt2x >= S::zero() {
        return FunType::T4b;
    }
    if left_above && !right_above {
        return if iv.lt2x <= S::zero() {
            FunType::T2a
        } else {
            FunType::T2b
        };
    }
    if !left_above && right_above {
        return if iv.rt2x <= S::zero() {
            FunType::T3a
        } else {
            FunType::T3b
        };
    }
    FunType::Undefined
}
