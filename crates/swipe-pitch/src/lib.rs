//! SWIPE' (prime-harmonics variant) monophonic pitch estimator.
//!
//! Four stages, run in sequence for one call to [`estimate_pitch`]:
//! the [`planner`] derives the analysis grid from the sample rate, the
//! [`loudness`] stage builds an ERB-scaled spectral representation per
//! window size, the [`strength`] stage scores every pitch candidate
//! against prime-harmonic kernels and accumulates across window sizes,
//! and the [`extractor`] turns the resulting strength matrix into
//! per-frame pitch estimates.

mod config;
mod extractor;
mod loudness;
mod planner;
mod strength;

pub use config::SwipeConfig;
pub use planner::Plan;
pub use swipe_core::{PitchFrame, SwipeError, SwipeResult};

/// Runs the full pipeline over a mono signal and returns one
/// [`PitchFrame`] per `config.dt`-spaced output frame.
pub fn estimate_pitch(signal: &[f64], sample_rate: f64, config: &SwipeConfig) -> SwipeResult<Vec<PitchFrame>> {
    config.validate()?;
    if sample_rate <= 0.0 {
        return Err(SwipeError::InvalidSampleRate(sample_rate));
    }
    if signal.is_empty() {
        return Err(SwipeError::EmptySignal);
    }

    let plan = Plan::build(sample_rate, config);
    let duration = signal.len() as f64 / sample_rate;
    let noutput = (duration / config.dt).ceil() as usize;

    log::debug!(
        "estimate_pitch: {} samples @ {sample_rate} Hz -> {noutput} output frames",
        signal.len()
    );

    let strength_matrix = strength::compute_strength(signal, &plan, config, noutput);
    Ok(extractor::extract_pitch(&strength_matrix, &plan.candidates, config))
}
