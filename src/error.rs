//! Error taxonomy.
//!
//! Only precondition violations at construction time are represented here.
//! The other two failure classes this algorithm can hit --
//! `NumericWarning` (setup finished without reaching the target efficiency)
//! and a runtime invariant violation during sampling -- are not `Err`
//! values: the sampler built under either condition is still a valid
//! majorizer, so they surface as logged events (`log::warn!`) plus queryable
//! state (see [`crate::Sampler::converged`]) instead of aborting the caller.
use thiserror::Error;

/// A precondition of [`crate::Sampler::new`] was violated.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    /// `cs.len() != points.len() - 1`.
    #[error(
        "cs has length {found} but points has length {points_len}; expected |cs| = |points| - 1 = {expected}"
    )]
    CsLengthMismatch {
        found: usize,
        points_len: usize,
        expected: usize,
    },

    /// `points.len() < 2`.
    #[error("points must contain at least 2 entries, got {found}")]
    TooFewPoints { found: usize },

    /// An interior point (not the first or last) was not finite.
    #[error("point at index {index} must be finite, got {value}")]
    NonFiniteInteriorPoint { index: usize, value: f64 },

    /// `points` was not strictly increasing.
    #[error(
        "points must be strictly increasing; point[{index}] = {value} is not greater than the previous point {prev}"
    )]
    NonMonotonePoints { index: usize, value: f64, prev: f64 },

    /// `rho` was not finite or not greater than 1.
    #[error("rho must be finite and > 1, got {rho}")]
    InvalidRho { rho: f64 },

    /// `c` at an unbounded endpoint was not greater than -1.
    #[error(
        "c[{index}] = {c} at an unbounded endpoint must be > -1"
    )]
    InvalidUnboundedC { index: usize, c: f64 },

    /// An initial interval could not be classified: it either straddles
    /// more than one inflection point, or is not monotone+concave/convex
    /// as required at an unbounded endpoint.
    #[error(
        "interval {index} ([{lx}, {rx}]) could not be classified: it likely contains more \
         than one inflection point, or fails the monotonicity/concavity requirement at an \
         unbounded endpoint"
    )]
    UnclassifiableInterval { index: usize, lx: f64, rx: f64 },
}
