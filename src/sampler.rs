//! Public sampler type: the frozen result of setup, plus the runtime
//! sampling API.
use crate::discrete::DiscreteSampler;
use crate::error::DomainError;
use crate::interval::FlexInterval;
use crate::kernel;
use crate::scalar::Scalar;
use crate::setup::{self, SetupConfig};

/// An immutable Transformed Density Rejection sampler built from a
/// log-density, its first two derivatives, and an initial partition.
///
/// `Sampler<S>` holds only plain, immutable data once constructed (no
/// interior mutability), so it is `Send + Sync` and may be shared across
/// threads; each thread must supply its own `rand::Rng`.
pub struct Sampler<S, F0> {
    f0: F0,
    intervals: Vec<FlexInterval<S>>,
    discrete: DiscreteSampler<S>,
    converged: bool,
    efficiency: S,
}

impl<S: Scalar, F0> Sampler<S, F0>
where
    F0: Fn(S) -> S,
{
    /// Builds a sampler from the log-density `f0`, its derivatives `f1,
    /// f2`, a partition `points` (length >= 2, strictly increasing,
    /// infinite only at the endpoints), one transform parameter per initial
    /// interval in `cs`, and an efficiency target `rho > 1`.
    ///
    /// `cs` may also be a single-element slice, in which case it is
    /// broadcast across every initial interval (`points.len() - 1` of
    /// them) before validation; any other length must match
    /// `points.len() - 1` exactly.
    ///
    /// Runs the adaptive setup loop under `config` (default caps 1000
    /// points / 1000 iterations) and returns a [`DomainError`] if any
    /// constructor precondition is violated. If the caps are exhausted
    /// before `rho` is reached, construction still succeeds -- the sampler
    /// remains a valid majorizer -- but [`Sampler::converged`] reports
    /// `false` and a warning is logged.
    pub fn new<F1, F2>(
        f0: F0,
        f1: F1,
        f2: F2,
        points: &[S],
        cs: &[S],
        rho: S,
        config: SetupConfig,
    ) -> Result<Self, DomainError>
    where
        F1: Fn(S) -> S,
        F2: Fn(S) -> S,
    {
        let result = setup::run_setup(&f0, &f1, &f2, points, cs, rho, config)?;
        if !result.converged {
            log::warn!(
                "flex setup exhausted its budget before reaching the target efficiency \
                 (achieved ratio {:?}); the sampler is still a valid majorizer but less \
                 efficient than requested",
                result.achieved_ratio.to_f64_lossy()
            );
        }

        let flex_intervals: Vec<FlexInterval<S>> =
            result.intervals.iter().map(FlexInterval::from).collect();
        let hat_areas: Vec<S> = flex_intervals.iter().map(|iv| iv.hat_area).collect();
        let discrete = DiscreteSampler::new(&hat_areas);

        Ok(Sampler {
            f0,
            intervals: flex_intervals,
            discrete,
            converged: result.converged,
            efficiency: result.achieved_ratio,
        })
    }

    /// Draws one variate.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> S {
        let u: S = rng.gen();
        let idx = self.discrete.sample_index(u);
        kernel::sample_from_interval(&self.intervals[idx], &self.f0, rng)
    }

    /// The frozen partition, ordered by `lx`.
    pub fn intervals(&self) -> &[FlexInterval<S>] {
        &self.intervals
    }

    /// Whether setup reached the requested efficiency `rho` before
    /// exhausting its budget.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// The achieved `Σhat / Σsqueeze` ratio at the end of setup.
    pub fn efficiency(&self) -> S {
        self.efficiency
    }
}
