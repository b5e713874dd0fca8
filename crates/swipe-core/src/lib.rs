//! swipe-core: shared types used across the SWIPE' pitch tracker crates.
//!
//! This crate provides the foundational building blocks consumed by both
//! `swipe-dsp` (numeric primitives) and `swipe-pitch` (the estimation
//! pipeline itself): the sample type, the frame-vs-matrix representation,
//! and the error type returned at the pipeline's public boundary.

mod error;
mod sample;

pub use error::{SwipeError, SwipeResult};
pub use sample::{Matrix, PitchFrame, Sample};
