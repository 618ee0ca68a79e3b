use std::cell::Cell;
use std::fmt;

use ndarray::Array1;
use rand::Rng;

use crate::{EvoError, Mode};

/// Default additive offset of the fitness/cost transform.
///
/// Callers must keep the expected objective magnitude below the offset,
/// otherwise fitness and cost can change sign and break the proportional
/// selectors. This is a documented caller responsibility and is not detected
/// at runtime.
pub const DEFAULT_OFFSET: f64 = 1000.0;

/// A configured optimization problem: the objective callable, explicit
/// per-dimension bounds, the optimization mode and the fitness/cost
/// transform.
///
/// The objective is treated as an opaque pure function of a fixed-length
/// position vector; the problem dimensionality equals the bounds length and
/// never changes during a run.
pub struct Problem<'a> {
    func: &'a dyn Fn(&Array1<f64>) -> f64,
    lower: Array1<f64>,
    upper: Array1<f64>,
    mode: Mode,
    offset: f64,
    nfev: Cell<usize>,
}

impl<'a> Problem<'a> {
    /// Build a problem from explicit bounds. There is no implicit default
    /// domain; empty or inverted bounds fail fast.
    pub fn new(
        func: &'a dyn Fn(&Array1<f64>) -> f64,
        bounds: &[(f64, f64)],
        mode: Mode,
        offset: f64,
    ) -> Result<Self, EvoError> {
        if bounds.is_empty() {
            return Err(EvoError::EmptyBounds);
        }
        if !offset.is_finite() || offset <= 0.0 {
            return Err(EvoError::InvalidParameter("fitness offset must be positive"));
        }

        let n = bounds.len();
        let mut lower = Array1::<f64>::zeros(n);
        let mut upper = Array1::<f64>::zeros(n);
        for (i, &(lo, hi)) in bounds.iter().enumerate() {
            if lo > hi {
                return Err(EvoError::InvalidInterval { min: lo, max: hi });
            }
            lower[i] = lo;
            upper[i] = hi;
        }

        Ok(Self {
            func,
            lower,
            upper,
            mode,
            offset,
            nfev: Cell::new(0),
        })
    }

    /// Build a problem from separate lower/upper bound arrays.
    pub fn from_arrays(
        func: &'a dyn Fn(&Array1<f64>) -> f64,
        lower: Array1<f64>,
        upper: Array1<f64>,
        mode: Mode,
        offset: f64,
    ) -> Result<Self, EvoError> {
        if lower.len() != upper.len() {
            return Err(EvoError::BoundsMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        let bounds: Vec<(f64, f64)> = lower.iter().zip(upper.iter()).map(|(&l, &u)| (l, u)).collect();
        Self::new(func, &bounds, mode, offset)
    }

    pub fn dimensions(&self) -> usize {
        self.lower.len()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    /// Number of objective evaluations so far
    pub fn nfev(&self) -> usize {
        self.nfev.get()
    }

    /// Raw objective value at `x`
    pub fn evaluate(&self, x: &Array1<f64>) -> f64 {
        self.nfev.set(self.nfev.get() + 1);
        (self.func)(x)
    }

    /// Strictly positive "higher is better" transform of a raw value
    pub fn fitness_value(&self, value: f64) -> f64 {
        match self.mode {
            Mode::Minimize => -value + self.offset * self.offset,
            Mode::Maximize => value + self.offset,
        }
    }

    /// Strictly positive "lower is better" transform of a raw value
    pub fn cost_value(&self, value: f64) -> f64 {
        match self.mode {
            Mode::Minimize => value + self.offset,
            Mode::Maximize => -value + self.offset * self.offset,
        }
    }

    /// Fitness of a position (evaluates the objective)
    pub fn fitness(&self, x: &Array1<f64>) -> f64 {
        self.fitness_value(self.evaluate(x))
    }

    /// Cost of a position (evaluates the objective)
    pub fn cost(&self, x: &Array1<f64>) -> f64 {
        self.cost_value(self.evaluate(x))
    }

    /// Uniform random position within the bounds
    pub fn rand_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        Array1::from_iter((0..self.dimensions()).map(|d| {
            if self.upper[d] > self.lower[d] {
                rng.random_range(self.lower[d]..self.upper[d])
            } else {
                self.lower[d]
            }
        }))
    }
}

impl fmt::Debug for Problem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("dimensions", &self.dimensions())
            .field("mode", &self.mode)
            .field("offset", &self.offset)
            .field("nfev", &self.nfev.get())
            .finish()
    }
}
