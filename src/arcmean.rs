//! Split-point selection for refining a partition.
use crate::scalar::Scalar;

/// Picks a new split point inside `(lx, rx)`, biased toward the endpoint
/// whose transformed derivative is farther from the secant slope (the
/// steeper side shrinks fastest). Falls back to the arithmetic mean when
/// the weight is degenerate (both derivative gaps zero) and handles
/// unbounded endpoints through the `atan`/`tan` change of variables, which
/// maps `(-inf, inf)` onto `(-pi/2, pi/2)` so an infinite bound never
/// enters the weighted average directly.
pub fn arcmean<S: Scalar>(lx: S, rx: S, lt1x: S, rt1x: S, r: S) -> S {
    let half_pi = S::from_f64(std::f64::consts::FRAC_PI_2);
    let al = if lx.is_infinite() {
        -half_pi
    } else {
        lx.atan()
    };
    let ar = if rx.is_infinite() {
        half_pi
    } else {
        rx.atan()
    };

    let dl = (lt1x - r).abs();
    let dr = (rt1x - r).abs();
    let denom = dl + dr;
    let w = if denom > S::zero() {
        dl / denom
    } else {
        S::from_f64(0.5)
    };

    let a_split = w * al + (S::one() - w) * ar;
    a_split.tan()
}
