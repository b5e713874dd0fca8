//! Parameter Planner: derives window sizes, the candidate grid, the ERB
//! axis, and the prime table from `(sample_rate, config)`.
//!
//! Everything here is pure arithmetic on the config -- no signal is
//! touched yet. The `Plan` is built once per `estimate_pitch` call and
//! shared (by reference) across the loudness and strength stages.

use swipe_dsp::{erb_to_hz, hz_to_erb, prime_table};

use crate::config::SwipeConfig;

/// Everything the loudness and strength stages need to know about the
/// analysis grid, derived once from the signal's sample rate.
#[derive(Debug, Clone)]
pub struct Plan {
    pub sample_rate: f64,
    pub min_hz: f64,
    pub max_hz: f64,
    /// Descending powers of two; `window_sizes[i+1] == window_sizes[i] / 2`.
    pub window_sizes: Vec<usize>,
    /// Pitch candidates in Hz, strictly increasing, log-spaced.
    pub candidates: Vec<f64>,
    /// Each candidate's continuous "window index" coordinate.
    pub distances: Vec<f64>,
    /// ERB-spaced frequency axis in Hz, strictly increasing.
    pub erb_axis: Vec<f64>,
    /// Harmonic-number table: `primes[h - 1]` is true if `h` is treated
    /// as a harmonic slot in the strength kernel.
    pub primes: Vec<bool>,
}

impl Plan {
    /// Builds a plan for `sample_rate` Hz audio under `config`.
    ///
    /// `config` is assumed already validated (`SwipeConfig::validate`);
    /// `max_hz` is clamped to Nyquist here, with a warning, since that's
    /// a correction rather than a rejection (spec.md §7).
    pub fn build(sample_rate: f64, config: &SwipeConfig) -> Self {
        let nyquist = sample_rate / 2.0;
        let min = config.min_hz;
        let max = if config.max_hz > nyquist {
            log::warn!(
                "max pitch {} Hz exceeds Nyquist {} Hz; clamped",
                config.max_hz,
                nyquist
            );
            nyquist
        } else {
            config.max_hz
        };

        // The reference implementation's "16 * fs / min" base is, read
        // out of its actual constant (`nyquist16 = sample_rate * 8`),
        // really `16 * nyquist / min`. We use that literal constant so
        // window sizes match the reference bit-for-bit; see DESIGN.md.
        let base_const = sample_rate * 8.0;

        let ws_count =
            ((base_const / min).log2() - (base_const / max).log2()).round() as usize + 1;
        let ws0_exp = (base_const / min).log2().round() as i32;
        let window_sizes: Vec<usize> = (0..ws_count)
            .map(|i| (2f64.powi(ws0_exp) / 2f64.powi(i as i32)) as usize)
            .collect();

        let k = (((max.log2() - min.log2()) / config.dlog2p).ceil()) as usize;
        let log2_min = min.log2();
        let log2_ws0 = (base_const / window_sizes[0] as f64).log2();
        let mut candidates = Vec::with_capacity(k);
        let mut distances = Vec::with_capacity(k);
        for i in 0..k {
            let log2_pc = log2_min + i as f64 * config.dlog2p;
            candidates.push(2f64.powf(log2_pc));
            distances.push(1.0 + log2_pc - log2_ws0);
        }

        let erb_lo = hz_to_erb(min / 4.0);
        let erb_hi = hz_to_erb(nyquist);
        let erb_len = ((erb_hi - erb_lo) / config.derbs).ceil() as usize;
        let erb_axis: Vec<f64> = (0..erb_len)
            .map(|i| erb_to_hz(erb_lo + i as f64 * config.derbs))
            .collect();

        let erb_max = *erb_axis.last().unwrap_or(&0.0);
        let prime_limit = ((erb_max / candidates[0]) - 0.75).floor().max(0.0) as usize;
        let primes = prime_table(prime_limit, config.include_fundamental);

        log::debug!(
            "plan: {} windows ({:?}), {} candidates, {} ERB bins, {} harmonic slots",
            window_sizes.len(),
            window_sizes,
            candidates.len(),
            erb_axis.len(),
            primes.iter().filter(|&&p| p).count(),
        );

        Self {
            sample_rate,
            min_hz: min,
            max_hz: max,
            window_sizes,
            candidates,
            distances,
            erb_axis,
            primes,
        }
    }
}
