//! Closed-form quadratic fit through exactly 3 points.
//!
//! The original SWIPE' source solves this via a LAPACK `dgels` call
//! (`polyfit`/`polyval` in `vector.c`), which is the right tool for an
//! arbitrary-order, arbitrary-size fit but overkill for the 3-point
//! system the pitch extractor actually needs. `nalgebra`'s small
//! stack-allocated solve is the proportionate substitute -- already part
//! of this workspace's numeric stack, no new dependency.

use nalgebra::{Matrix3, Vector3};

/// Fits `y = a*x^2 + b*x + c` through three points and returns `[a, b, c]`.
pub fn fit_quadratic(xs: [f64; 3], ys: [f64; 3]) -> [f64; 3] {
    let vandermonde = Matrix3::new(
        xs[0] * xs[0], xs[0], 1.0,
        xs[1] * xs[1], xs[1], 1.0,
        xs[2] * xs[2], xs[2], 1.0,
    );
    let rhs = Vector3::new(ys[0], ys[1], ys[2]);
    let coefs = vandermonde
        .lu()
        .solve(&rhs)
        .expect("Vandermonde matrix is singular only when two x values coincide");
    [coefs[0], coefs[1], coefs[2]]
}

/// Evaluates `a*x^2 + b*x + c` for `coefs = [a, b, c]`.
pub fn eval_quadratic(coefs: [f64; 3], x: f64) -> f64 {
    coefs[0] * x * x + coefs[1] * x + coefs[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fits_a_known_parabola() {
        // y = 2x^2 - 3x + 1
        let xs = [-1.0, 0.0, 1.0];
        let ys = [6.0, 1.0, 0.0];
        let coefs = fit_quadratic(xs, ys);
        assert_relative_eq!(coefs[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(coefs[1], -3.0, epsilon = 1e-9);
        assert_relative_eq!(coefs[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn eval_matches_source_points() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [1.0, 3.0, 9.0];
        let coefs = fit_quadratic(xs, ys);
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(eval_quadratic(coefs, *x), *y, epsilon = 1e-9);
        }
    }
}
