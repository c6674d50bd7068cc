//! Draws one variate from a frozen interval via hat inversion and the
//! squeeze/density accept-reject test.
use std::sync::atomic::{AtomicU64, Ordering};

use crate::consts::{slope_eps, taylor_z_eps};
use crate::interval::FlexInterval;
use crate::scalar::Scalar;
use crate::transform;

/// Global, exponentially-backed-off counter for runtime invariant
/// violations. A per-interval counter would need interior mutability on
/// [`crate::Sampler`], which the design keeps free of; logging on powers of
/// two still keeps a persistently misbehaving sampler from flooding the
/// log, just without attributing the count to one interval.
static INVARIANT_VIOLATIONS: AtomicU64 = AtomicU64::new(0);

fn log_invariant_violation(message: &str) {
    let n = INVARIANT_VIOLATIONS.fetch_add(1, Ordering::Relaxed) + 1;
    if n.is_power_of_two() {
        log::warn!("runtime invariant violation (#{n}): {message}");
    }
}

/// Inverts the hat's cumulative distribution within `iv` for uniform draw
/// `u`, producing a candidate `X`.
///
/// The closed forms below are stated over the interval's *total* hat mass:
/// `u` is first rescaled to `ua = u * hatArea`, the unnormalized area swept
/// from `lx`, so that `ua` ranges over `[0, hatArea)` exactly as the area
/// accumulated by the discrete sampler over all intervals does -- without
/// this rescaling the formulas would never reference `rx` and `X` would not
/// approach `rx` as `u -> 1`. The flat-hat fallback is the one case that
/// already works directly in `u` (a plain affine blend of the endpoints).
fn invert_hat<S: Scalar>(iv: &FlexInterval<S>, u: S) -> S {
    let slope = iv.hat.slope;
    let h_lx = iv.hat.evaluate(iv.lx);
    let two = S::from_f64(2.0);
    let three = S::from_f64(3.0);

    if slope.abs() < slope_eps::<S>() {
        return (S::one() - u) * iv.lx + u * iv.rx;
    }

    let ua = u * iv.hat_area;

    if iv.c.is_zero() {
        let e = (-h_lx).exp();
        let z = ua * slope * e;
        return if z.abs() < taylor_z_eps::<S>() {
            iv.lx + ua * e * (S::one() - z / two + z * z / three)
        } else {
            iv.hat.inverse((slope * ua + h_lx.exp()).ln())
        };
    }
    if iv.c == S::from_f64(-0.5) {
        let e = h_lx.exp();
        let z = ua * slope * e;
        return if z.abs() < taylor_z_eps::<S>() {
            iv.lx + ua * e * (S::one() - z / two + z * z)
        } else {
            iv.hat.inverse(transform::inverse_antiderivative(
                ua * slope + transform::antiderivative(h_lx, iv.c),
                iv.c,
            ))
        };
    }
    if iv.c == S::one() {
        let k = h_lx;
        let z = ua * slope / (k * k);
        return if z.abs() < taylor_z_eps::<S>() {
            iv.lx + ua * k * (S::one() - z / two + z * z / two)
        } else {
            iv.hat.inverse(transform::inverse_antiderivative(
                ua * slope + transform::antiderivative(h_lx, iv.c),
                iv.c,
            ))
        };
    }
    let z = transform::antiderivative(h_lx, iv.c) + ua * slope;
    iv.hat.inverse(transform::inverse_antiderivative(z, iv.c))
}

/// Runs the rejection loop, reusing the same `u` for the hat inversion and
/// the squeeze/density acceptance test as required by the squeeze trick.
pub fn sample_from_interval<S: Scalar, F0, R>(iv: &FlexInterval<S>, f0: &F0, rng: &mut R) -> S
where
    F0: Fn(S) -> S,
    R: rand::Rng,
{
    loop {
        let u: S = rng.gen();
        let x = invert_hat(iv, u);

        if x < iv.lx || x > iv.rx {
            log_invariant_violation("hat inversion produced a candidate outside its interval");
            continue;
        }

        let hat_x = iv.hat.evaluate(x);
        let inv_hat_x = transform::inverse(hat_x, iv.c);

        if iv.squeeze_area > S::zero() && !iv.squeeze.is_undefined() {
            let sqz_x = iv.squeeze.evaluate(x);
            let inv_sqz_x = transform::inverse(sqz_x, iv.c);
            if inv_hat_x < inv_sqz_x {
                log_invariant_violation("hat value fell below squeeze value");
                continue;
            }
            let t = u * inv_hat_x;
            if t <= inv_sqz_x {
                return x;
            }
        }

        let t = u * inv_hat_x;
        if t <= f0(x).exp() {
            return x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::LinearFun;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn gaussian_iv() -> FlexInterval<f64> {
        FlexInterval {
            lx: -3.0,
            rx: 3.0,
            c: 0.0,
            hat: LinearFun::new(0.0, 0.0, -0.5 * 9.0 + 1.0),
            squeeze: LinearFun::undefined(),
            hat_area: 1.0,
            squeeze_area: 0.0,
        }
    }

    #[test]
    fn samples_stay_within_interval_bounds() {
        let iv = gaussian_iv();
        let f0 = |x: f64| -0.5 * x * x;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        for _ in 0..10_000 {
            let x = sample_from_interval(&iv, &f0, &mut rng);
            assert!((iv.lx..=iv.rx).contains(&x));
        }
    }

    #[test]
    fn flat_hat_inversion_is_affine_in_u() {
        let iv = gaussian_iv();
        let x0 = invert_hat(&iv, 0.0);
        let x1 = invert_hat(&iv, 1.0);
        assert::close(x0, iv.lx, 1e-9);
        assert::close(x1, iv.rx, 1e-6);
    }
}
