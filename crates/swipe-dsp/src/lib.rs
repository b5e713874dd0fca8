//! swipe-dsp: the small numeric primitives the SWIPE' estimator is built on.
//!
//! None of this is specific to pitch tracking; it's the same kind of
//! bisection search, cubic spline, and sieve-of-Eratosthenes you'd reach
//! for in any offline DSP tool. Kept as its own crate (rather than folded
//! into `swipe-pitch`) so it can be unit-tested against known-good values
//! independent of the pipeline that consumes it.

pub mod bisect;
pub mod erb;
pub mod polyfit;
pub mod sieve;
pub mod spline;
pub mod window;

pub use bisect::{bilook, bisect};
pub use erb::{hz_to_erb, hz_to_mel, erb_to_hz};
pub use polyfit::{eval_quadratic, fit_quadratic};
pub use sieve::prime_table;
pub use spline::CubicSpline;
pub use window::hann;
