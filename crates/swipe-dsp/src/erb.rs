//! Frequency scale conversions: Hz <-> ERB, Hz -> Mel.

/// Equivalent Rectangular Bandwidth scale, in ERBs, for a frequency in Hz.
pub fn hz_to_erb(hz: f64) -> f64 {
    21.4 * (1.0 + hz / 229.0).log10()
}

/// Inverse of [`hz_to_erb`].
pub fn erb_to_hz(erb: f64) -> f64 {
    (10f64.powf(erb / 21.4) - 1.0) * 229.0
}

/// Mel scale conversion, used only for the CLI's `-m` output option.
pub fn hz_to_mel(hz: f64) -> f64 {
    1127.01048 * (1.0 + hz / 700.0).ln()
}
