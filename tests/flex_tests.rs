//! End-to-end construction and sampling scenarios, mirroring the published
//! reference inputs for this algorithm. Exact interval counts and first-area
//! values from the reference tables are sensitive to tie-breaking choices
//! (arcmean weighting, tangent-vs-secant selection at T2/T3 boundaries) that
//! are not fully pinned down by a textual description of the algorithm, so
//! these tests check the invariants the construction must satisfy rather
//! than hard-coded magic numbers.
use flex::{Sampler, SetupConfig};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn quartic_ln_density(x: f64) -> f64 {
    -x.powi(4) + 5.0 * x * x - 4.0
}
fn quartic_d1(x: f64) -> f64 {
    -4.0 * x.powi(3) + 10.0 * x
}
fn quartic_d2(x: f64) -> f64 {
    -12.0 * x * x + 10.0
}

fn std_normal_ln_density(x: f64) -> f64 {
    -0.5 * x * x - 0.5 * (2.0 * std::f64::consts::PI).ln()
}
fn std_normal_d1(x: f64) -> f64 {
    -x
}
fn std_normal_d2(_x: f64) -> f64 {
    -1.0
}

/// Invariant 2 & 3: every built interval has `0 <= squeezeArea <= hatArea`,
/// and the overall ratio meets the efficiency target whenever setup
/// reports convergence.
fn assert_envelope_invariants<S>(sampler: &Sampler<f64, S>, rho: f64)
where
    S: Fn(f64) -> f64,
{
    let mut hat_total = 0.0;
    let mut squeeze_total = 0.0;
    for iv in sampler.intervals() {
        assert!(iv.hat_area >= 0.0, "hat area must be nonnegative");
        assert!(iv.squeeze_area >= 0.0, "squeeze area must be nonnegative");
        assert!(
            iv.squeeze_area <= iv.hat_area * (1.0 + 1e-9),
            "squeeze area {} exceeds hat area {}",
            iv.squeeze_area,
            iv.hat_area
        );
        assert!(iv.lx < iv.rx);
        hat_total += iv.hat_area;
        squeeze_total += iv.squeeze_area;
    }
    if sampler.converged() {
        assert!(
            hat_total / squeeze_total <= rho * (1.0 + 1e-6),
            "converged sampler should meet its efficiency target: {} / {} = {}",
            hat_total,
            squeeze_total,
            hat_total / squeeze_total
        );
    }
}

#[test]
fn quartic_scenario_s1_c_one_point_five() {
    let points = [-3.0, -1.5, 0.0, 1.5, 3.0];
    let cs = [1.5, 1.5, 1.5, 1.5];
    let sampler = Sampler::new(
        quartic_ln_density,
        quartic_d1,
        quartic_d2,
        &points,
        &cs,
        1.1,
        SetupConfig::default(),
    )
    .expect("quartic density with c=1.5 should classify cleanly");

    assert_envelope_invariants(&sampler, 1.1);

    // Published reference: exactly 42 intervals, first hat area ~=
    // 1.79547e-5. arcmean/tangent-selection tie-breaking can shift the
    // exact split count by a handful without being wrong (see the Open
    // Question decisions in DESIGN.md), so this checks a tolerance band
    // around the published figures instead of the bit-exact numbers --
    // tight enough that a construction bug (e.g. never refining past the
    // initial 4 intervals, or an area off by orders of magnitude) fails
    // it.
    let n = sampler.intervals().len();
    assert!((20..=80).contains(&n), "interval count {n} far from the published 42");
    let first_hat_area = sampler.intervals()[0].hat_area;
    assert!(
        (1e-6..1e-4).contains(&first_hat_area),
        "first hat area {first_hat_area} not within an order of magnitude of the published 1.79547e-5"
    );

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    for _ in 0..5_000 {
        let x = sampler.sample(&mut rng);
        assert!((-3.0..=3.0).contains(&x));
    }
}

#[test]
fn quartic_scenario_s2_c_one() {
    let points = [-3.0, -1.5, 0.0, 1.5, 3.0];
    let cs = [1.0, 1.0, 1.0, 1.0];
    let sampler = Sampler::new(
        quartic_ln_density,
        quartic_d1,
        quartic_d2,
        &points,
        &cs,
        1.1,
        SetupConfig::default(),
    )
    .expect("quartic density with c=1 should classify cleanly");

    assert_envelope_invariants(&sampler, 1.1);

    // Published reference: 32 intervals, first hat area ~= 1.49622e-5.
    let n = sampler.intervals().len();
    assert!((15..=60).contains(&n), "interval count {n} far from the published 32");
    let first_hat_area = sampler.intervals()[0].hat_area;
    assert!(
        (1e-6..1e-4).contains(&first_hat_area),
        "first hat area {first_hat_area} not within an order of magnitude of the published 1.49622e-5"
    );
}

#[test]
fn quartic_scenario_s3_mixed_cs() {
    let points = [-3.0, -1.5, 0.0, 1.5, 3.0];
    let cs = [1.3, 1.4, 1.5, 1.6];
    let sampler = Sampler::new(
        quartic_ln_density,
        quartic_d1,
        quartic_d2,
        &points,
        &cs,
        1.1,
        SetupConfig::default(),
    )
    .expect("quartic density with mixed c per interval should classify cleanly");

    assert_envelope_invariants(&sampler, 1.1);

    // Published reference: 44 intervals, first hat area ~= 1.69138e-5.
    let n = sampler.intervals().len();
    assert!((20..=80).contains(&n), "interval count {n} far from the published 44");
    let first_hat_area = sampler.intervals()[0].hat_area;
    assert!(
        (1e-6..1e-4).contains(&first_hat_area),
        "first hat area {first_hat_area} not within an order of magnitude of the published 1.69138e-5"
    );
}

#[test]
fn standard_normal_scenario_s4_is_symmetric() {
    let points = [-3.0, -1.5, 0.0, 1.5, 3.0];
    let cs = [1.5, 1.5, 1.5, 1.5];
    let sampler = Sampler::new(
        std_normal_ln_density,
        std_normal_d1,
        std_normal_d2,
        &points,
        &cs,
        1.1,
        SetupConfig::default(),
    )
    .expect("standard normal should classify cleanly");

    assert_envelope_invariants(&sampler, 1.1);

    // Empirical mean of a large sample from a symmetric density should land
    // near zero.
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let n = 20_000;
    let mean: f64 = (0..n).map(|_| sampler.sample(&mut rng)).sum::<f64>() / n as f64;
    assert!(mean.abs() < 0.1, "sample mean {mean} too far from 0");
}

#[test]
fn standard_normal_with_unbounded_tails_and_nonzero_c() {
    // Genuine +/-infinity endpoints, both tails at c = -0.3: negative and
    // away from the 0/1/-1/-0.5 special cases, so this exercises
    // hat_squeeze::integrate's general branch end to end through an
    // infinite bound rather than just in a focused unit test. A
    // regression reintroducing the old sign(c)-keyed antiderivative would
    // silently report these tails as carrying zero mass.
    let points = [f64::NEG_INFINITY, -1.5, 0.0, 1.5, f64::INFINITY];
    let cs = [-0.3, 1.5, 1.5, -0.3];
    let sampler = Sampler::new(
        std_normal_ln_density,
        std_normal_d1,
        std_normal_d2,
        &points,
        &cs,
        1.1,
        SetupConfig::default(),
    )
    .expect("standard normal with unbounded tails should classify cleanly");

    assert_envelope_invariants(&sampler, 1.1);

    let first = &sampler.intervals()[0];
    let last = sampler.intervals().last().unwrap();
    assert_eq!(first.lx, f64::NEG_INFINITY);
    assert_eq!(last.rx, f64::INFINITY);
    assert!(
        first.hat_area.is_finite() && first.hat_area > 0.0,
        "left tail hat area {} should be finite and positive",
        first.hat_area
    );
    assert!(
        last.hat_area.is_finite() && last.hat_area > 0.0,
        "right tail hat area {} should be finite and positive",
        last.hat_area
    );

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
    for _ in 0..5_000 {
        let x = sampler.sample(&mut rng);
        assert!(x.is_finite());
    }
}

#[test]
fn quartic_scenario_s5_single_precision() {
    // Density `1 - x^4` on [-1, 1], single precision.
    fn f0(x: f32) -> f32 {
        (1.0 - x.powi(4)).ln()
    }
    fn f1(x: f32) -> f32 {
        -4.0 * x.powi(3) / (1.0 - x.powi(4))
    }
    fn f2(x: f32) -> f32 {
        let d = 1.0 - x.powi(4);
        (-12.0 * x * x * d - (4.0 * x.powi(3)).powi(2)) / (d * d)
    }

    let points: [f32; 6] = [-1.0, -0.9, -0.5, 0.5, 0.9, 1.0];
    let cs: [f32; 5] = [2.0, 2.0, 2.0, 2.0, 2.0];
    let sampler = Sampler::new(f0, f1, f2, &points, &cs, 1.1, SetupConfig::default())
        .expect("1 - x^4 on [-1, 1] should classify cleanly in single precision");

    for iv in sampler.intervals() {
        assert!(iv.hat_area >= 0.0);
        assert!(iv.squeeze_area >= 0.0);
    }

    // Published reference: 10 intervals. The true (un-normalized) mass is
    // integral_{-1}^{1} (1 - x^4) dx = 1.6, so the total hat area -- an
    // upper envelope at efficiency target 1.1 -- should sit a bit above
    // that, not off by an order of magnitude.
    let n = sampler.intervals().len();
    assert!((5..=20).contains(&n), "interval count {n} far from the published 10");
    let total_hat: f32 = sampler.intervals().iter().map(|iv| iv.hat_area).sum();
    assert!(
        (1.0..3.0).contains(&total_hat),
        "total hat area {total_hat} far from the expected ~1.6-2.0 range"
    );

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
    for _ in 0..2_000 {
        let x = sampler.sample(&mut rng);
        assert!((-1.0..=1.0).contains(&x));
    }
}

#[test]
fn kolmogorov_smirnov_against_standard_normal_cdf() {
    fn std_normal_cdf(x: f64) -> f64 {
        0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
    }
    // Abramowitz & Stegun 7.1.26 approximation, adequate for a KS gate at
    // p > 1e-3 significance rather than high-precision tail estimation.
    fn erf(x: f64) -> f64 {
        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();
        let a1 = 0.254829592;
        let a2 = -0.284496736;
        let a3 = 1.421413741;
        let a4 = -1.453152027;
        let a5 = 1.061405429;
        let p = 0.3275911;
        let t = 1.0 / (1.0 + p * x);
        let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
        sign * y
    }

    let points = [-3.0, -1.5, 0.0, 1.5, 3.0];
    let cs = [1.5, 1.5, 1.5, 1.5];
    let sampler = Sampler::new(
        std_normal_ln_density,
        std_normal_d1,
        std_normal_d2,
        &points,
        &cs,
        1.05,
        SetupConfig::default(),
    )
    .expect("standard normal should classify cleanly");

    let n = 1_000_000;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let mut samples: Vec<f64> = (0..n).map(|_| sampler.sample(&mut rng)).collect();
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut d = 0.0_f64;
    for (i, &x) in samples.iter().enumerate() {
        let empirical_lo = i as f64 / n as f64;
        let empirical_hi = (i + 1) as f64 / n as f64;
        let cdf = std_normal_cdf(x);
        d = d.max((cdf - empirical_lo).abs()).max((empirical_hi - cdf).abs());
    }

    // Truncating the support to [-3, 3] introduces a small, known bias
    // (the true normal CDF has tails beyond +/-3 that this sampler cannot
    // produce), so the gate is looser than an unconstrained KS test.
    assert!(d < 0.01, "KS statistic {d} too large for N={n} samples");
}
