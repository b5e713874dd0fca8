//! Pitch Extractor: per-frame argmax, threshold gate, and log-frequency
//! quadratic refinement.

use swipe_core::{Matrix, PitchFrame};
use swipe_dsp::{eval_quadratic, fit_quadratic};

use crate::config::SwipeConfig;

/// Turns a strength matrix (candidates x output frames) into one
/// [`PitchFrame`] per output frame.
///
/// For each frame: find the candidate with peak strength. At or below
/// `config.strength_threshold`, the frame is unvoiced. At either edge of
/// the candidate grid there are no neighbors to fit a parabola through,
/// so the raw candidate frequency is reported as-is. Otherwise a
/// quadratic is fit through the peak and its two neighbors and refined
/// by a dense search -- both happen in the warped "ntc" period-ratio
/// space the reference implementation uses
/// (`ntc[m] = ((1/pc[i*+m-1]) / (1/pc[i*]) - 1) * 2*pi`), not directly in
/// log2-frequency; only the final reported frequency maps back through
/// `log2(pc[i*-1]) + s*polyv`.
pub fn extract_pitch(strength: &Matrix, candidates: &[f64], config: &SwipeConfig) -> Vec<PitchFrame> {
    let log2_candidates: Vec<f64> = candidates.iter().map(|c| c.log2()).collect();
    let nframes = strength.ncols();
    let ncand = candidates.len();

    (0..nframes)
        .map(|j| {
            let time = j as f64 * config.dt;

            let mut best_i = 0usize;
            let mut best_s = f64::NEG_INFINITY;
            for i in 0..ncand {
                let s = strength[[i, j]];
                if s > best_s {
                    best_s = s;
                    best_i = i;
                }
            }

            if best_s <= config.strength_threshold {
                return PitchFrame::unvoiced(time);
            }

            if best_i == 0 || best_i == ncand - 1 {
                return PitchFrame::voiced(time, candidates[best_i]);
            }

            let tc2 = 1.0 / candidates[best_i];
            let ntc = [
                ((1.0 / candidates[best_i - 1]) / tc2 - 1.0) * 2.0 * std::f64::consts::PI,
                ((1.0 / candidates[best_i]) / tc2 - 1.0) * 2.0 * std::f64::consts::PI,
                ((1.0 / candidates[best_i + 1]) / tc2 - 1.0) * 2.0 * std::f64::consts::PI,
            ];
            let ys = [
                strength[[best_i - 1, j]],
                strength[[best_i, j]],
                strength[[best_i + 1, j]],
            ];
            let coefs = fit_quadratic(ntc, ys);

            let log2_lo = log2_candidates[best_i - 1];
            let log2_hi = log2_candidates[best_i + 1];
            let search_points = ((log2_hi - log2_lo) / config.polyv + 1.0).round() as usize;

            let mut best_step = 0usize;
            let mut best_val = f64::NEG_INFINITY;
            for s in 0..search_points {
                let log2_pc = s as f64 * config.polyv + log2_lo;
                let x = ((1.0 / 2f64.powf(log2_pc)) / tc2 - 1.0) * 2.0 * std::f64::consts::PI;
                let val = eval_quadratic(coefs, x);
                if val > best_val {
                    best_val = val;
                    best_step = s;
                }
            }

            PitchFrame::voiced(time, 2f64.powf(log2_lo + best_step as f64 * config.polyv))
        })
        .collect()
}
