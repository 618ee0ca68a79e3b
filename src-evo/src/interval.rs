use rand::Rng;
use serde::Serialize;

use crate::EvoError;

/// Closed numeric range [min, max], immutable once constructed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Result<Self, EvoError> {
        if min > max {
            return Err(EvoError::InvalidInterval { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Closed containment: min <= x <= max
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Half-open containment: min <= x < max (pheromone deposition test)
    pub fn contains_half_open(&self, x: f64) -> bool {
        self.min <= x && x < self.max
    }

    /// Uniform draw within the interval; degenerate intervals return `min`
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.width() > 0.0 {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }
}
