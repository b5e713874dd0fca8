//! Sample and matrix types shared by the pipeline stages.

use ndarray::Array2;

/// Type alias for audio samples (always f64: the algorithm's spline and FFT
/// stages accumulate error across many frames, and f32 visibly drifts the
/// sub-bin refinement in long recordings).
pub type Sample = f64;

/// Row-major matrix used for the loudness and strength matrices.
///
/// A thin alias rather than a hand-rolled struct: `ndarray::Array2` already
/// stores its data as one flat, row-stride buffer, which is exactly the
/// layout the estimator wants and avoids the array-of-row-pointers
/// indirection of the original C implementation.
pub type Matrix = Array2<Sample>;

/// A single output frame: a point in time and the fundamental frequency
/// estimate at that point, if the frame was judged voiced.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PitchFrame {
    /// Frame time in seconds, measured from the start of the signal.
    pub time: f64,
    /// Estimated fundamental frequency in Hz, or `None` if unvoiced.
    pub hz: Option<f64>,
}

impl PitchFrame {
    pub fn voiced(time: f64, hz: f64) -> Self {
        Self { time, hz: Some(hz) }
    }

    pub fn unvoiced(time: f64) -> Self {
        Self { time, hz: None }
    }

    pub fn is_voiced(&self) -> bool {
        self.hz.is_some()
    }
}
