//! Error types for the SWIPE' pitch tracker core.

use thiserror::Error;

/// Errors the core pipeline rejects with rather than silently correcting.
///
/// Parameters that can be sensibly clamped (max pitch above Nyquist) are
/// handled by the planner with a logged warning instead of an error; see
/// `swipe_pitch::planner`.
#[derive(Debug, Error)]
pub enum SwipeError {
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    #[error("empty signal: need at least 1 sample")]
    EmptySignal,

    #[error("min pitch too low: {0} Hz, must be >= 1 Hz")]
    MinPitchTooLow(f64),

    #[error("invalid pitch range: min {min} Hz, max {max} Hz (need max - min >= 1 Hz)")]
    InvalidFrequencyRange { min: f64, max: f64 },

    #[error("timestep too small: {0} s, must be >= 0.001 s")]
    TimestepTooSmall(f64),

    #[error("invalid strength threshold: {0}, must be in [0, 1]")]
    InvalidStrengthThreshold(f64),
}

/// Result type alias used throughout the pipeline.
pub type SwipeResult<T> = Result<T, SwipeError>;
