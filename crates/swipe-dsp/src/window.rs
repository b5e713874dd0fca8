//! Analysis windows.

/// Periodic Hann window of length `len`: `h[j] = 0.5 - 0.5*cos(2*pi*j/len)`.
///
/// Periodic (not symmetric) normalization is used because the loudness
/// stage overlap-adds windows at 50% hop; the periodic form keeps
/// consecutive windows' tapers complementary.
pub fn hann(len: usize) -> Vec<f64> {
    let n = len as f64;
    (0..len)
        .map(|j| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * j as f64 / n).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_endpoints_are_zero_and_symmetric_about_peak() {
        let w = hann(8);
        assert!((w[0] - 0.0).abs() < 1e-12);
        assert!(w[4] > w[0]);
        assert!(w[4] > w[7]);
    }

    #[test]
    fn hann_length_matches_request() {
        assert_eq!(hann(1024).len(), 1024);
    }
}
