//! Transformed Density Rejection with inflection points ("Flex").
//!
//! Samples from an arbitrary univariate continuous distribution given only
//! its log-density and the first two derivatives of that log-density,
//! following the Flex algorithm of Botts, Hörmann & Leydold (2013). The
//! caller supplies an initial partition of the support into intervals, each
//! containing at most one inflection point of the transformed density;
//! [`Sampler::new`] adaptively refines that partition with a piecewise-linear
//! hat and squeeze until the rejection efficiency target is met, then
//! [`Sampler::sample`] draws variates against the frozen envelope.
//!
//! ```
//! use flex::{Sampler, SetupConfig};
//!
//! // Standard normal, log-density -x^2/2.
//! let f0 = |x: f64| -0.5 * x * x;
//! let f1 = |x: f64| -x;
//! let f2 = |_x: f64| -1.0_f64;
//!
//! let points = [-3.0, -1.5, 0.0, 1.5, 3.0];
//! let cs = [1.5, 1.5, 1.5, 1.5];
//!
//! let sampler = Sampler::new(f0, f1, f2, &points, &cs, 1.1, SetupConfig::default())
//!     .expect("valid construction");
//!
//! let mut rng = rand::thread_rng();
//! let x: f64 = sampler.sample(&mut rng);
//! assert!((-3.0..=3.0).contains(&x));
//! ```
//!
//! # Design
//!
//! Every numeric routine is generic over a [`Scalar`] type (`f32` or `f64`).
//! Construction validates its inputs and returns a [`DomainError`] rather
//! than panicking; a sampler that reaches its setup budget before the
//! requested efficiency is still returned (still a valid majorizer), with
//! [`Sampler::converged`] reporting `false` and a warning logged via the
//! [`log`] facade.

pub mod arcmean;
pub mod consts;
pub mod discrete;
pub mod error;
pub mod hat_squeeze;
pub mod interval;
pub mod kernel;
pub mod linear;
pub mod misc;
pub mod scalar;
pub mod setup;
mod transform;

mod sampler;

pub use error::DomainError;
pub use interval::{FlexInterval, FunType};
pub use linear::LinearFun;
pub use sampler::Sampler;
pub use scalar::Scalar;
pub use setup::SetupConfig;
