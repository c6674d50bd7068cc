//! Builds the hat and squeeze linear functions for a classified interval,
//! and integrates them in closed form.
use crate::consts::slope_eps;
use crate::interval::{FunType, Interval};
use crate::linear::LinearFun;
use crate::scalar::Scalar;
use crate::transform;

/// Picks, of the two candidate tangents, whichever has slope closer to the
/// secant slope `r` -- the rule Botts, Hoermann & Leydold give for the
/// pure-concave / pure-convex shapes (T1a, T1b).
fn closer_to_secant<S: Scalar>(
    tangent_l: LinearFun<S>,
    tangent_r: LinearFun<S>,
    lt1x: S,
    rt1x: S,
    r: S,
) -> LinearFun<S> {
    if (lt1x - r).abs() <= (rt1x - r).abs() {
        tangent_l
    } else {
        tangent_r
    }
}

/// Builds `(hat, squeeze)` for a finite, classified interval. Returns
/// `None` for [`FunType::Undefined`] (the caller must reject such
/// partitions at setup).
pub fn build<S: Scalar>(iv: &Interval<S>, ty: FunType) -> Option<(LinearFun<S>, LinearFun<S>)> {
    let tangent_l = LinearFun::tangent(iv.lx, iv.ltx, iv.lt1x);
    let tangent_r = LinearFun::tangent(iv.rx, iv.rtx, iv.rt1x);
    let secant = if iv.lx.is_finite() && iv.rx.is_finite() {
        LinearFun::secant(iv.lx, iv.rx, iv.ltx, iv.rtx)
    } else {
        LinearFun::undefined()
    };

    let unbounded_left = iv.lx.is_infinite();
    let unbounded_right = iv.rx.is_infinite();
    let r = if iv.lx.is_finite() && iv.rx.is_finite() {
        iv.secant_slope()
    } else {
        S::zero()
    };

    Some(match ty {
        FunType::T1a => (
            closer_to_secant(tangent_l, tangent_r, iv.lt1x, iv.rt1x, r),
            secant,
        ),
        FunType::T1b => (
            secant,
            closer_to_secant(tangent_l, tangent_r, iv.lt1x, iv.rt1x, r),
        ),
        // Sign-change shapes: hat sits on the concave-curvature endpoint,
        // squeeze on the convex-curvature endpoint.
        FunType::T2a => (tangent_l, tangent_r),
        FunType::T2b => (tangent_r, tangent_l),
        FunType::T3a => (tangent_r, tangent_l),
        FunType::T3b => (tangent_l, tangent_r),
        FunType::T4a => {
            if unbounded_left {
                (tangent_r, LinearFun::undefined())
            } else if unbounded_right {
                (tangent_l, LinearFun::undefined())
            } else {
                (
                    closer_to_secant(tangent_l, tangent_r, iv.lt1x, iv.rt1x, r),
                    secant,
                )
            }
        }
        FunType::T4b => {
            if unbounded_left {
                (LinearFun::undefined(), tangent_r)
            } else if unbounded_right {
                (LinearFun::undefined(), tangent_l)
            } else {
                (
                    secant,
                    closer_to_secant(tangent_l, tangent_r, iv.lt1x, iv.rt1x, r),
                )
            }
        }
        FunType::Undefined => return None,
    })
}

/// `integral_{lx}^{rx} T_c^{-1}(L(x)) dx` in closed form. Returns 0
/// for an undefined (`NaN`-slope) linear function.
pub fn integrate<S: Scalar>(lin: &LinearFun<S>, lx: S, rx: S, c: S) -> S {
    if lin.is_undefined() {
        return S::zero();
    }

    let l_lx = lin.evaluate(lx);
    let l_rx = lin.evaluate(rx);
    let two = S::from_f64(2.0);

    let raw = if c.is_zero() {
        let h = rx - lx;
        let sh = lin.slope * h;
        if sh.abs() < crate::consts::taylor_z_eps::<S>() {
            // Taylor expansion of (exp(L(rx)) - exp(L(lx))) / slope around
            // slope*h == 0, avoiding cancellation.
            let six = S::from_f64(6.0);
            l_lx.exp() * h * (S::one() + sh / two + sh * sh / six)
        } else {
            (l_rx.exp() - l_lx.exp()) / lin.slope
        }
    } else if c == S::one() {
        (l_rx * l_rx - l_lx * l_lx) / (two * lin.slope)
    } else if c == -S::one() {
        -(l_rx.abs().ln() - l_lx.abs().ln()) / lin.slope
    } else if lin.slope.abs() < slope_eps::<S>() {
        // Slope too small to divide by; treat the linear function as
        // constant at its finite-endpoint value over the interval.
        let mid = if lx.is_finite() { l_lx } else { l_rx };
        transform::inverse(mid, c) * (rx - lx)
    } else {
        let f_lx = transform::antiderivative(l_lx, c);
        let f_rx = transform::antiderivative(l_rx, c);
        (f_rx - f_lx) / lin.slope
    };

    raw.max(S::zero())
}
