//! Multimodal test functions
//!
//! Functions with many local minima, used to exercise the global search
//! behavior of the optimizers.

use ndarray::Array1;
use std::f64::consts::{E, PI};

/// Rastrigin function - highly multimodal with a regular grid of local minima
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    10.0 * n
        + x.iter()
            .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Ackley function - nearly flat outer region with a large central basin
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn rastrigin_minimum_at_origin() {
        let origin = Array1::zeros(2);
        assert!(rastrigin(&origin).abs() < 1e-12);
    }

    #[test]
    fn ackley_minimum_at_origin() {
        let origin = Array1::zeros(3);
        assert!(ackley(&origin).abs() < 1e-12);
    }

    #[test]
    fn rastrigin_local_minima_are_worse() {
        // (1, 0) sits in the neighboring basin; still worse than the origin
        let x = Array1::from(vec![1.0, 0.0]);
        assert!(rastrigin(&x) > 0.5);
    }
}
