//! Unimodal test functions
//!
//! Single-optimum functions used to check basic convergence behavior of the
//! optimizers.

use ndarray::Array1;

/// Sphere function - the simplest convex benchmark
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn sphere(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Quadratic function (alias for sphere, kept for readable test names)
pub fn quadratic(x: &Array1<f64>) -> f64 {
    sphere(x)
}

/// Rosenbrock function - narrow curved valley
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-5, 10]
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    let mut sum = 0.0;
    for i in 0..x.len().saturating_sub(1) {
        sum += 100.0 * (x[i + 1] - x[i] * x[i]).powi(2) + (1.0 - x[i]).powi(2);
    }
    sum
}
