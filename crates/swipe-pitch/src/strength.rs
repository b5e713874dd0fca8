//! Strength Stage: prime-harmonic kernels, per-window strength, and
//! triangular-weighted accumulation into the global strength matrix.

use ndarray::Axis;
use rayon::prelude::*;
use swipe_core::Matrix;
use swipe_dsp::bisect;

use crate::config::SwipeConfig;
use crate::loudness::loudness_matrix;
use crate::planner::Plan;

/// Builds the prime-harmonic cosine kernel for one pitch candidate.
///
/// Peaks (within 0.25 of a harmonic ratio) overwrite; valleys (within
/// 0.75) accumulate across harmonics. That asymmetry -- `=` for peaks,
/// `+=` for valleys -- is preserved from the reference algorithm even
/// though it means two primes' valley bands can stack for the same ERB
/// bin; see DESIGN.md for why we keep it rather than "fix" it.
///
/// Unlike the reference `Sadd`, which divides by the norm unconditionally,
/// this skips normalization when the positive-only squared-sum is zero --
/// reachable for real candidate grids (a candidate near the top of the
/// configured range can have no harmonic `h <= limit` at all, leaving the
/// kernel all-zero), and dividing by zero there would seed `NaN`/`Inf`
/// into every downstream strength value instead of a harmless zero
/// strength; see DESIGN.md.
fn build_kernel(erb_axis: &[f64], primes: &[bool], candidate_hz: f64) -> Vec<f64> {
    let mut kernel = vec![0.0; erb_axis.len()];
    let limit = (erb_axis.last().copied().unwrap_or(0.0) / candidate_hz - 0.75).floor();

    for (j, &is_harmonic) in primes.iter().enumerate() {
        let h = (j + 1) as f64;
        if !is_harmonic || h > limit {
            continue;
        }
        for (k, &erb_hz) in erb_axis.iter().enumerate() {
            let q = erb_hz / candidate_hz;
            let dist = (q - h).abs();
            if dist < 0.25 {
                kernel[k] = (2.0 * std::f64::consts::PI * q).cos();
            } else if dist < 0.75 {
                kernel[k] += 0.5 * (2.0 * std::f64::consts::PI * q).cos();
            }
        }
    }

    let mut norm_sq = 0.0;
    for (k, &erb_hz) in erb_axis.iter().enumerate() {
        kernel[k] *= (1.0 / erb_hz).sqrt();
        if kernel[k] > 0.0 {
            norm_sq += kernel[k] * kernel[k];
        }
    }
    let norm = norm_sq.sqrt();
    if norm != 0.0 {
        kernel.iter_mut().for_each(|v| *v /= norm);
    }
    kernel
}

/// Which candidates window `n` (of `ws_count` total) covers, and their
/// triangular weight. See spec.md §4.3: the leftmost window peaks at
/// `d=1`, window `n` peaks at `d=n+1`, and the rightmost window's upper
/// edge is left unclipped.
fn window_band(n: usize, ws_count: usize, distances: &[f64]) -> (usize, usize, Vec<f64>) {
    let (lo, hi) = if ws_count == 1 {
        (0, distances.len())
    } else if n == 0 {
        (0, bisect(distances, 2.0))
    } else if n == ws_count - 1 {
        (bisect(distances, n as f64), distances.len())
    } else {
        (bisect(distances, n as f64), bisect(distances, n as f64 + 2.0))
    };

    let peak = if ws_count == 1 { 1.0 } else { n as f64 + 1.0 };
    let mu: Vec<f64> = distances[lo..hi].iter().map(|d| 1.0 - (d - peak).abs()).collect();
    (lo, hi, mu)
}

/// `Slocal[i, frame] = kernel_i . L[frame, :]` for each candidate in the
/// window's band.
fn local_strength(loudness: &Matrix, kernels: &[Vec<f64>]) -> Matrix {
    let frames = loudness.nrows();
    let mut slocal = Matrix::zeros((kernels.len(), frames));
    for (i, kernel) in kernels.iter().enumerate() {
        for (f, row) in loudness.axis_iter(Axis(0)).enumerate() {
            slocal[[i, f]] = row.iter().zip(kernel.iter()).map(|(l, k)| l * k).sum();
        }
    }
    slocal
}

/// Linearly resamples `slocal` (candidates x loudness frames, spaced
/// `dtp` seconds apart) onto the output grid (spaced `dt` seconds apart)
/// and adds the `mu`-weighted result into `out` (candidates x output
/// frames).
fn resample_and_accumulate(out: &mut Matrix, slocal: &Matrix, mu: &[f64], dt: f64, dtp: f64) {
    let noutput = out.ncols();
    let max_k = slocal.ncols().saturating_sub(1);
    let mut k = 0usize;
    let mut t = 0.0;
    let mut tp = 0.0;
    for j in 0..noutput {
        let mut td = t - tp;
        while td >= 0.0 {
            k += 1;
            tp += dtp;
            td -= dtp;
        }
        let k = k.min(max_k);
        let k_prev = k.saturating_sub(1);
        for (i, &weight) in mu.iter().enumerate() {
            let cur = slocal[[i, k]];
            let prev = slocal[[i, k_prev]];
            out[[i, j]] += (cur + td * (cur - prev) / dtp) * weight;
        }
        t += dt;
    }
}

/// Computes the full strength matrix (candidates x output frames),
/// fanning out across window sizes with rayon: each window's
/// contribution is independent and additive, so per-window matrices are
/// computed in parallel and then summed rather than requiring the
/// accumulation itself to be serialized.
pub fn compute_strength(signal: &[f64], plan: &Plan, config: &SwipeConfig, noutput: usize) -> Matrix {
    let ncand = plan.candidates.len();
    let ws_count = plan.window_sizes.len();

    let contributions: Vec<Matrix> = (0..ws_count)
        .into_par_iter()
        .map(|n| {
            let window = plan.window_sizes[n];
            let w2 = window / 2;
            let (lo, hi, mu) = window_band(n, ws_count, &plan.distances);

            let mut contribution = Matrix::zeros((ncand, noutput));
            if lo >= hi {
                return contribution;
            }

            let loudness = loudness_matrix(signal, plan.sample_rate, &plan.erb_axis, window);
            let kernels: Vec<Vec<f64>> = plan.candidates[lo..hi]
                .iter()
                .map(|&hz| build_kernel(&plan.erb_axis, &plan.primes, hz))
                .collect();
            let slocal = local_strength(&loudness, &kernels);

            let dtp = w2 as f64 / plan.sample_rate;
            let mut band = Matrix::zeros((hi - lo, noutput));
            resample_and_accumulate(&mut band, &slocal, &mu, config.dt, dtp);
            contribution.slice_mut(ndarray::s![lo..hi, ..]).assign(&band);
            contribution
        })
        .collect();

    let mut strength = Matrix::zeros((ncand, noutput));
    for c in &contributions {
        strength += c;
    }
    strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwipeConfig;
    use crate::planner::Plan;

    #[test]
    fn kernel_is_deterministic() {
        let plan = Plan::build(16000.0, &SwipeConfig::default());
        let a = build_kernel(&plan.erb_axis, &plan.primes, plan.candidates[10]);
        let b = build_kernel(&plan.erb_axis, &plan.primes, plan.candidates[10]);
        assert_eq!(a, b);
    }

    #[test]
    fn kernel_norm_is_one_when_nonzero() {
        let plan = Plan::build(16000.0, &SwipeConfig::default());
        let kernel = build_kernel(&plan.erb_axis, &plan.primes, plan.candidates[10]);
        let norm_sq: f64 = kernel.iter().filter(|&&v| v > 0.0).map(|v| v * v).sum();
        assert!((norm_sq - 1.0).abs() < 1e-9 || norm_sq == 0.0);
    }

    #[test]
    fn every_candidate_is_covered_by_some_window() {
        let plan = Plan::build(16000.0, &SwipeConfig::default());
        let ws_count = plan.window_sizes.len();
        let mut covered = vec![false; plan.candidates.len()];
        for n in 0..ws_count {
            let (lo, _hi, mu) = window_band(n, ws_count, &plan.distances);
            for (i, &m) in mu.iter().enumerate() {
                if m > 0.0 {
                    covered[lo + i] = true;
                }
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn interior_weights_sum_to_one() {
        let plan = Plan::build(16000.0, &SwipeConfig::default());
        let ws_count = plan.window_sizes.len();
        if ws_count < 2 {
            return;
        }
        let mut totals = vec![0.0; plan.candidates.len()];
        for n in 0..ws_count {
            let (lo, hi, mu) = window_band(n, ws_count, &plan.distances);
            for (i, &m) in mu.iter().enumerate() {
                totals[lo + i] += m;
            }
        }
        for (i, &d) in plan.distances.iter().enumerate() {
            if d >= 1.0 && d <= (ws_count - 1) as f64 {
                assert!((totals[i] - 1.0).abs() < 1e-6, "d={d} total={}", totals[i]);
            }
        }
    }
}
