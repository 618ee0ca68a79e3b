//! Optimization test functions library
//!
//! A small collection of benchmark objective functions for validating the
//! optimizers, organized by category:
//!
//! - **Unimodal**: single global optimum (sphere, rosenbrock, ...)
//! - **Multimodal**: many local minima (rastrigin, ackley, ...)
//!
//! All functions take an `ndarray::Array1<f64>` position and return one real
//! value; they are N-dimensional unless noted otherwise.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use evoswarm_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds_2d("sphere", (-100.0, 100.0));
//! assert_eq!(bounds.len(), 2);
//! ```

use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Metadata for a test function: recommended bounds and known global minima
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// Recommended bounds per dimension (min, max)
    pub bounds: Vec<(f64, f64)>,
    /// Global minima locations and values
    pub global_minima: Vec<(Vec<f64>, f64)>,
    /// Description of the function
    pub description: String,
    /// Whether the function is multimodal
    pub multimodal: bool,
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    let mut metadata = HashMap::new();

    metadata.insert(
        "sphere".to_string(),
        FunctionMetadata {
            name: "sphere".to_string(),
            bounds: vec![(-100.0, 100.0); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
            description: "Convex bowl, the simplest benchmark".to_string(),
            multimodal: false,
        },
    );

    metadata.insert(
        "rosenbrock".to_string(),
        FunctionMetadata {
            name: "rosenbrock".to_string(),
            bounds: vec![(-5.0, 10.0); 2],
            global_minima: vec![(vec![1.0, 1.0], 0.0)],
            description: "Narrow curved valley".to_string(),
            multimodal: false,
        },
    );

    metadata.insert(
        "rastrigin".to_string(),
        FunctionMetadata {
            name: "rastrigin".to_string(),
            bounds: vec![(-5.12, 5.12); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
            description: "Regular grid of local minima".to_string(),
            multimodal: true,
        },
    );

    metadata.insert(
        "ackley".to_string(),
        FunctionMetadata {
            name: "ackley".to_string(),
            bounds: vec![(-32.768, 32.768); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
            description: "Flat outer region with a deep central basin".to_string(),
            multimodal: true,
        },
    );

    metadata
}

/// Recommended 2-D bounds for a function, with a fallback when unknown
pub fn get_function_bounds_2d(name: &str, fallback: (f64, f64)) -> Vec<(f64, f64)> {
    get_function_bounds_vec(name, fallback)
}

/// Recommended bounds for a function as a vector of (min, max) pairs
pub fn get_function_bounds_vec(name: &str, fallback: (f64, f64)) -> Vec<(f64, f64)> {
    match get_function_metadata().get(name) {
        Some(meta) => meta.bounds.clone(),
        None => vec![fallback; 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_covers_all_categories() {
        let metadata = get_function_metadata();
        assert!(metadata["rastrigin"].multimodal);
        assert!(!metadata["sphere"].multimodal);
        assert_eq!(metadata["ackley"].global_minima[0].1, 0.0);
    }

    #[test]
    fn bounds_lookup_falls_back() {
        let bounds = get_function_bounds_2d("unknown", (-1.0, 1.0));
        assert_eq!(bounds, vec![(-1.0, 1.0), (-1.0, 1.0)]);
    }
}
