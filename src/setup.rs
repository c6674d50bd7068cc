//! Validates constructor inputs, builds the initial partition, and
//! iteratively refines it until the efficiency target is reached or a
//! budget is exhausted.
use crate::arcmean::arcmean;
use crate::error::DomainError;
use crate::hat_squeeze;
use crate::interval::{classify, Interval};
use crate::misc::kahan::KahanSum;
use crate::scalar::Scalar;

/// Tunable caps on the setup loop, mirroring the `maxPoints` /
/// `maxIterations` constructor options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupConfig {
    pub max_points: usize,
    pub max_iterations: usize,
}

impl Default for SetupConfig {
    fn default() -> Self {
        SetupConfig {
            max_points: 1000,
            max_iterations: 1000,
        }
    }
}

/// Outcome of the setup loop: the frozen partition plus whether the
/// efficiency target was actually reached.
pub struct SetupResult<S> {
    pub intervals: Vec<Interval<S>>,
    pub converged: bool,
    pub achieved_ratio: S,
}

/// Expands a single-scalar `cs` into one entry per initial interval, per
/// the constructor's documented broadcast form (a `cs` of any other
/// length is returned unchanged so [`validate`] can raise
/// [`DomainError::CsLengthMismatch`] against its real length).
fn broadcast_cs<S: Scalar>(cs: &[S], n_intervals: usize) -> Vec<S> {
    if cs.len() == 1 && n_intervals != 1 {
        vec![cs[0]; n_intervals]
    } else {
        cs.to_vec()
    }
}

fn validate<S: Scalar>(points: &[S], cs: &[S], rho: S) -> Result<(), DomainError> {
    if points.len() < 2 {
        return Err(DomainError::TooFewPoints {
            found: points.len(),
        });
    }
    if cs.len() != points.len() - 1 {
        return Err(DomainError::CsLengthMismatch {
            found: cs.len(),
            points_len: points.len(),
            expected: points.len() - 1,
        });
    }
    for (i, w) in points.windows(2).enumerate() {
        if w[1] <= w[0] {
            return Err(DomainError::NonMonotonePoints {
                index: i + 1,
                value: w[1].to_f64_lossy(),
                prev: w[0].to_f64_lossy(),
            });
        }
    }
    for (i, &p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        if !p.is_finite() {
            return Err(DomainError::NonFiniteInteriorPoint {
                index: i,
                value: p.to_f64_lossy(),
            });
        }
    }
    if !rho.is_finite() || rho <= S::one() {
        return Err(DomainError::InvalidRho {
            rho: rho.to_f64_lossy(),
        });
    }
    if points[0].is_infinite() && cs[0] <= -S::one() {
        return Err(DomainError::InvalidUnboundedC {
            index: 0,
            c: cs[0].to_f64_lossy(),
        });
    }
    let last = cs.len() - 1;
    if points[points.len() - 1].is_infinite() && cs[last] <= -S::one() {
        return Err(DomainError::InvalidUnboundedC {
            index: last,
            c: cs[last].to_f64_lossy(),
        });
    }
    Ok(())
}

/// Classifies, builds hat/squeeze, and integrates a single interval,
/// failing with [`DomainError::UnclassifiableInterval`] when the shape is
/// [`FunType::Undefined`].
fn finish_interval<S: Scalar>(mut iv: Interval<S>) -> Result<Interval<S>, DomainError> {
    let ty = classify(&iv);
    let (hat, squeeze) = hat_squeeze::build(&iv, ty).ok_or(DomainError::UnclassifiableInterval {
        index: 0,
        lx: iv.lx.to_f64_lossy(),
        rx: iv.rx.to_f64_lossy(),
    })?;
    iv.hat = hat;
    iv.squeeze = squeeze;
    iv.hat_area = hat_squeeze::integrate(&hat, iv.lx, iv.rx, iv.c);
    let raw_squeeze_area = hat_squeeze::integrate(&squeeze, iv.lx, iv.rx, iv.c);
    iv.squeeze_area = raw_squeeze_area.min(iv.hat_area);
    Ok(iv)
}

fn raw_at<S: Scalar, F0, F1, F2>(x: S, f0: &F0, f1: &F1, f2: &F2) -> Option<(S, S, S)>
where
    F0: Fn(S) -> S,
    F1: Fn(S) -> S,
    F2: Fn(S) -> S,
{
    if x.is_finite() {
        Some((f0(x), f1(x), f2(x)))
    } else {
        None
    }
}

fn build_initial<S: Scalar, F0, F1, F2>(
    f0: &F0,
    f1: &F1,
    f2: &F2,
    points: &[S],
    cs: &[S],
) -> Result<(Vec<Interval<S>>, KahanSum<S>, KahanSum<S>), DomainError>
where
    F0: Fn(S) -> S,
    F1: Fn(S) -> S,
    F2: Fn(S) -> S,
{
    let mut intervals = Vec::with_capacity(cs.len());
    let mut hat_sum = KahanSum::new();
    let mut squeeze_sum = KahanSum::new();

    let mut prev_raw = raw_at(points[0], f0, f1, f2);
    for i in 0..cs.len() {
        let lx = points[i];
        let rx = points[i + 1];
        let c = cs[i];
        let right_raw = raw_at(rx, f0, f1, f2);
        let iv = Interval::from_raw(lx, rx, c, prev_raw, right_raw);
        let iv = finish_interval(iv).map_err(|e| reindex_unclassifiable(e, i))?;
        hat_sum.add(iv.hat_area);
        squeeze_sum.add(iv.squeeze_area);
        intervals.push(iv);
        prev_raw = right_raw;
    }
    Ok((intervals, hat_sum, squeeze_sum))
}

fn reindex_unclassifiable(e: DomainError, index: usize) -> DomainError {
    match e {
        DomainError::UnclassifiableInterval { lx, rx, .. } => {
            DomainError::UnclassifiableInterval { index, lx, rx }
        }
        other => other,
    }
}

/// Next representable value below `x`, used for the excess threshold so
/// splits aren't skipped on an exact-equality boundary.
fn next_down<S: Scalar>(x: S) -> S {
    if x <= S::zero() {
        x
    } else {
        x * (S::one() - S::epsilon())
    }
}

/// Picks a finite interior point when [`arcmean`] misbehaves, stepping away
/// from whichever endpoint is finite and doubling its distance from zero
/// (or starting from 1 if that endpoint is exactly 0). Splitting never
/// leaves both endpoints unbounded, so exactly one of `lx`/`rx` is finite
/// whenever this is reached.
fn fallback_split_point<S: Scalar>(lx: S, rx: S) -> S {
    if lx.is_finite() && rx.is_finite() {
        return (lx + rx) / S::from_f64(2.0);
    }
    let two = S::from_f64(2.0);
    if lx.is_finite() {
        let step = if lx.is_zero() { S::one() } else { lx.abs() * two };
        lx + step
    } else {
        let step = if rx.is_zero() { S::one() } else { rx.abs() * two };
        rx - step
    }
}

fn split_once<S: Scalar, F0, F1, F2>(
    iv: &Interval<S>,
    f0: &F0,
    f1: &F1,
    f2: &F2,
) -> Result<(Interval<S>, Interval<S>), DomainError>
where
    F0: Fn(S) -> S,
    F1: Fn(S) -> S,
    F2: Fn(S) -> S,
{
    let r = if iv.lx.is_finite() && iv.rx.is_finite() {
        iv.secant_slope()
    } else {
        S::zero()
    };
    let candidate = arcmean(iv.lx, iv.rx, iv.lt1x, iv.rt1x, r);
    let m = if candidate.is_finite() && candidate > iv.lx && candidate < iv.rx {
        candidate
    } else {
        log::warn!(
            "arcmean produced a non-finite or out-of-range split point ({}) for interval [{}, {}]; falling back to a geometric split",
            candidate.to_f64_lossy(),
            iv.lx.to_f64_lossy(),
            iv.rx.to_f64_lossy(),
        );
        fallback_split_point(iv.lx, iv.rx)
    };

    let left_untransformed = raw_at(iv.lx, f0, f1, f2);
    let mid_untransformed = Some((f0(m), f1(m), f2(m)));
    let right_untransformed = raw_at(iv.rx, f0, f1, f2);

    let left = Interval::from_raw(iv.lx, m, iv.c, left_untransformed, mid_untransformed);
    let right = Interval::from_raw(m, iv.rx, iv.c, mid_untransformed, right_untransformed);
    let left = finish_interval(left)?;
    let right = finish_interval(right)?;
    Ok((left, right))
}

/// Runs the full setup pipeline: validate, build the initial partition,
/// then refine by splitting the worst-excess intervals until `Σhat /
/// Σsqueeze <= rho` or a budget is exhausted.
pub fn run_setup<S, F0, F1, F2>(
    f0: &F0,
    f1: &F1,
    f2: &F2,
    points: &[S],
    cs: &[S],
    rho: S,
    config: SetupConfig,
) -> Result<SetupResult<S>, DomainError>
where
    S: Scalar,
    F0: Fn(S) -> S,
    F1: Fn(S) -> S,
    F2: Fn(S) -> S,
{
    let n_intervals = points.len().saturating_sub(1);
    let cs_broadcast = broadcast_cs(cs, n_intervals);
    let cs = cs_broadcast.as_slice();

    validate(points, cs, rho)?;

    let (mut intervals, mut hat_sum, mut squeeze_sum) = build_initial(f0, f1, f2, points, cs)?;
    let mut converged = false;

    for _ in 0..config.max_iterations {
        let total_hat = hat_sum.sum();
        let total_squeeze = squeeze_sum.sum();
        if total_squeeze > S::zero() && total_hat / total_squeeze <= rho {
            converged = true;
            break;
        }
        if total_squeeze <= S::zero() && total_hat <= S::zero() {
            converged = true;
            break;
        }
        if intervals.len() >= config.max_points {
            break;
        }

        let n = S::from_f64(intervals.len() as f64);
        let avg_excess = next_down(total_hat - total_squeeze) / n;

        let mut next = Vec::with_capacity(intervals.len());
        for iv in intervals.into_iter() {
            let excess = iv.hat_area - iv.squeeze_area;
            if excess > avg_excess && next.len() + 1 < config.max_points {
                hat_sum.add(-iv.hat_area);
                squeeze_sum.add(-iv.squeeze_area);
                let (left, right) = split_once(&iv, f0, f1, f2)?;
                hat_sum.add(left.hat_area);
                squeeze_sum.add(left.squeeze_area);
                hat_sum.add(right.hat_area);
                squeeze_sum.add(right.squeeze_area);
                next.push(left);
                next.push(right);
            } else {
                next.push(iv);
            }
        }
        intervals = next;
    }

    let total_hat = hat_sum.sum();
    let total_squeeze = squeeze_sum.sum();
    let achieved_ratio = if total_squeeze > S::zero() {
        total_hat / total_squeeze
    } else {
        S::infinity()
    };

    Ok(SetupResult {
        intervals,
        converged,
        achieved_ratio,
    })
}
