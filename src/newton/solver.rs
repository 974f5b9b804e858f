// Newton-Raphson iteration on a real scalar function, recording a full trace
// of every step so that it can be printed and plotted afterward.

use serde::{Deserialize, Serialize};

/// Slopes smaller than this are treated as zero; the iteration stops rather
/// than dividing by (nearly) zero.
pub const SINGULAR_SLOPE_THRESHOLD: f64 = 1e-12;

/// A real-valued function with its derivative (slope).
pub trait ScalarFunctionWithSlope {
    /// f(x)
    fn value(&self, x: f64) -> f64;

    /// f'(x)
    fn slope(&self, x: f64) -> f64;
}

/// f(x) = x^2 - target_value, whose positive root is sqrt(target_value).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SquareRootResidual {
    pub target_value: f64,
}

impl ScalarFunctionWithSlope for SquareRootResidual {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        x * x - self.target_value
    }

    #[inline]
    fn slope(&self, x: f64) -> f64 {
        2.0 * x
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            tolerance: 1e-6,
            max_iterations: 10,
        }
    }
}

/// One pass through the Newton loop. `x_next` is where the tangent line at
/// `(x_curr, f_x)` crosses zero, and `error = |x_next - x_curr|`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    pub index: u32,
    pub x_curr: f64,
    pub f_x: f64,
    pub error: f64,
    pub x_next: f64,
}

/// Ordered, append-only trace of the iteration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    records: Vec<IterationRecord>,
}

impl ResultTable {
    fn push(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }
}

/// Reason that the iteration stopped.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// The step size dropped below tolerance; `root` is the final `x_next`.
    Converged { root: f64 },
    /// |f'(x)| fell below `SINGULAR_SLOPE_THRESHOLD` at `x`.
    SingularSlope { x: f64 },
    /// Ran out of iterations; `x` is the most recent estimate.
    IterationLimit { x: f64 },
}

impl Termination {
    pub fn best_guess(&self) -> f64 {
        match *self {
            Termination::Converged { root } => root,
            Termination::SingularSlope { x } => x,
            Termination::IterationLimit { x } => x,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Termination::Converged { .. })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub records: ResultTable,
    pub termination: Termination,
}

impl Solution {
    pub fn estimate(&self) -> f64 {
        self.termination.best_guess()
    }
}

/// Newton-Raphson step: x - f(x) / f'(x). Returns `None` if the slope is
/// too small to divide by.
#[inline]
pub fn newton_raphson_step<F>(x: f64, function: &F) -> Option<f64>
where
    F: ScalarFunctionWithSlope,
{
    let slope = function.slope(x);
    if slope.abs() < SINGULAR_SLOPE_THRESHOLD {
        return None;
    }
    Some(x - function.value(x) / slope)
}

/// Runs Newton's method on `function` starting from `initial_guess`.
pub fn solve_with<F>(function: &F, initial_guess: f64, params: &SolverParams) -> Solution
where
    F: ScalarFunctionWithSlope,
{
    let mut records = ResultTable::default();
    let mut x_curr = initial_guess;

    for index in 1..=params.max_iterations {
        let f_x = function.value(x_curr);
        let Some(x_next) = newton_raphson_step(x_curr, function) else {
            return Solution {
                records,
                termination: Termination::SingularSlope { x: x_curr },
            };
        };
        let error = (x_next - x_curr).abs();
        records.push(IterationRecord {
            index,
            x_curr,
            f_x,
            error,
            x_next,
        });

        if error < params.tolerance {
            return Solution {
                records,
                termination: Termination::Converged { root: x_next },
            };
        }
        x_curr = x_next;
    }

    Solution {
        records,
        termination: Termination::IterationLimit { x: x_curr },
    }
}

/// Computes sqrt(`target_value`) by Newton's method on f(x) = x^2 - target_value.
pub fn solve(target_value: f64, initial_guess: f64, params: &SolverParams) -> Solution {
    solve_with(&SquareRootResidual { target_value }, initial_guess, params)
}
