//! Loudness Stage: one L2-normalized, ERB-scaled, sqrt-magnitude spectrum
//! per analysis frame, for a single window size.

use ndarray::Axis;
use realfft::RealFftPlanner;
use swipe_core::Matrix;
use swipe_dsp::{bilook, bisect, hann, CubicSpline};

/// Computes the loudness matrix (frames x ERB bins) for one window size.
///
/// Frames hop by `window / 2` samples (50% overlap). Frame `i`'s nominal
/// start is `(i - 1) * (window / 2)`; this is negative for the first
/// frame and runs past the signal end for the last frames, both handled
/// by zero-padding rather than as separate first/middle/last branches --
/// the original C source special-cases them, but the offset arithmetic
/// is identical once negative offsets are allowed.
pub fn loudness_matrix(signal: &[f64], sample_rate: f64, erb_axis: &[f64], window: usize) -> Matrix {
    let w2 = window / 2;
    let n = signal.len();
    let frame_count = (n as f64 / w2 as f64).ceil() as usize + 1;

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(window);
    let mut fft_input = fft.make_input_vec();
    let mut fft_output = fft.make_output_vec();

    let window_fn = hann(window);
    let freq_axis: Vec<f64> = (0..w2).map(|j| j as f64 * sample_rate / window as f64).collect();

    let mut magnitude = vec![0.0; w2];
    let mut loudness = Matrix::zeros((frame_count, erb_axis.len()));

    // First ERB query always starts a fresh bisection; later frames reuse
    // the bisect/bilook "resume" pattern since queries are made in
    // increasing order within a frame.
    let first_hi = if erb_axis.is_empty() {
        0
    } else {
        bisect(&freq_axis, erb_axis[0])
    };

    for i in 0..frame_count {
        let offset = (i as i64 - 1) * w2 as i64;
        for (j, slot) in fft_input.iter_mut().enumerate() {
            let idx = offset + j as i64;
            *slot = if idx >= 0 && (idx as usize) < n {
                signal[idx as usize] * window_fn[j]
            } else {
                0.0
            };
        }

        if let Err(e) = fft.process(&mut fft_input, &mut fft_output) {
            log::warn!("FFT failed for frame {i}: {e:?}; treating as silence");
            fft_output.iter_mut().for_each(|c| *c = Default::default());
        }

        for (m, c) in magnitude.iter_mut().zip(fft_output.iter().take(w2)) {
            *m = (c.re * c.re + c.im * c.im).sqrt();
        }

        if w2 >= 3 && !erb_axis.is_empty() {
            let spline = CubicSpline::fit(&freq_axis, &magnitude);
            let lo_bound = freq_axis[0];
            let hi_bound = freq_axis[w2 - 1];

            let mut hi = first_hi;
            for (j, &erb_hz) in erb_axis.iter().enumerate() {
                let raw = if erb_hz < lo_bound || erb_hz > hi_bound {
                    0.0
                } else {
                    if j > 0 {
                        hi = bilook(&freq_axis, erb_hz, hi);
                    }
                    spline.eval(erb_hz, hi)
                };
                let loud = raw.sqrt();
                loudness[[i, j]] = if loud.is_nan() { 0.0 } else { loud };
            }
        }
    }

    l2_normalize_rows(&mut loudness);
    loudness
}

/// L2-normalizes every row in place, skipping rows whose norm is exactly
/// zero (a silent/unvoiced frame stays all-zero rather than dividing by
/// zero).
fn l2_normalize_rows(m: &mut Matrix) {
    for mut row in m.axis_iter_mut(Axis(0)) {
        let norm_sq: f64 = row.iter().map(|v| v * v).sum();
        if norm_sq != 0.0 {
            let norm = norm_sq.sqrt();
            row.iter_mut().for_each(|v| *v /= norm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, seconds: f64) -> Vec<f64> {
        let n = (sample_rate * seconds) as usize;
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn rows_are_unit_norm_or_zero() {
        let sample_rate = 16000.0;
        let signal = sine(200.0, sample_rate, 0.5);
        let erb_axis: Vec<f64> = (0..200).map(|i| 50.0 + i as f64 * 30.0).collect();
        let l = loudness_matrix(&signal, sample_rate, &erb_axis, 1024);
        for row in l.axis_iter(Axis(0)) {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!(norm < 1e-10 || (norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn silence_is_all_zero() {
        let sample_rate = 16000.0;
        let signal = vec![0.0; 8000];
        let erb_axis: Vec<f64> = (0..100).map(|i| 50.0 + i as f64 * 30.0).collect();
        let l = loudness_matrix(&signal, sample_rate, &erb_axis, 1024);
        assert!(l.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn frame_count_matches_formula() {
        let sample_rate = 16000.0;
        let signal = sine(200.0, sample_rate, 1.0);
        let erb_axis: Vec<f64> = (0..50).map(|i| 50.0 + i as f64 * 30.0).collect();
        let window = 1024;
        let w2 = window / 2;
        let expected = (signal.len() as f64 / w2 as f64).ceil() as usize + 1;
        let l = loudness_matrix(&signal, sample_rate, &erb_axis, window);
        assert_eq!(l.nrows(), expected);
    }
}
