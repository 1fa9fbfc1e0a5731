//! Linear programming solver abstraction.
//!
//! This module defines the problem types handed to an LP backend and the
//! trait backends implement. The planner never solves anything itself; it
//! builds an [`LpProblem`] and delegates to a [`Solver`].

mod highs;

pub use highs::HighsSolver;

use crate::error::{Result, SolverError};

/// A linear programming solver backend.
///
/// Implementations wrap specific solver libraries (HiGHS, etc.) and provide
/// a unified interface for optimization problems.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Only an optimal termination returns a solution; infeasible, unbounded
///   and limit terminations must surface as the matching [`SolverError`]
///   variant rather than a partially-filled solution
pub trait Solver: Send + Sync {
    /// Solver name for logging/config.
    fn name(&self) -> &'static str;

    /// Solve the given problem to optimality.
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution>;
}

/// Linear programming problem definition.
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Objective coefficients.
    pub objective: Vec<f64>,
    /// Whether the objective is maximized or minimized.
    pub direction: ObjectiveDirection,
    /// Constraint rows.
    pub constraints: Vec<LpConstraint>,
    /// Variable bounds.
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// Create an empty problem over `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize, direction: ObjectiveDirection) -> Self {
        Self {
            objective: vec![0.0; num_vars],
            direction,
            constraints: Vec::new(),
            bounds: vec![VariableBounds::default(); num_vars],
        }
    }

    /// Number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Check that every constraint row matches the variable count.
    pub fn validate_shape(&self) -> Result<()> {
        let expected = self.num_vars();
        for (row, constraint) in self.constraints.iter().enumerate() {
            if constraint.coefficients.len() != expected {
                return Err(SolverError::ShapeMismatch {
                    row,
                    expected,
                    got: constraint.coefficients.len(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Objective direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveDirection {
    Maximize,
    Minimize,
}

/// A single constraint: `sum(coeffs[i] * x[i]) {>=, <=, =} rhs`.
#[derive(Debug, Clone)]
pub struct LpConstraint {
    /// Coefficients for each variable.
    pub coefficients: Vec<f64>,
    /// Constraint sense (>=, <=, =).
    pub sense: ConstraintSense,
    /// Right-hand side value.
    pub rhs: f64,
}

impl LpConstraint {
    /// Create a >= constraint.
    #[must_use]
    pub fn geq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::GreaterEqual,
            rhs,
        }
    }

    /// Create a <= constraint.
    #[must_use]
    pub fn leq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::LessEqual,
            rhs,
        }
    }

    /// Create an = constraint.
    #[must_use]
    pub fn eq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::Equal,
            rhs,
        }
    }

    /// Evaluate the left-hand side at the given point.
    #[must_use]
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values.iter())
            .map(|(c, v)| c * v)
            .sum()
    }
}

/// Constraint sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    GreaterEqual,
    LessEqual,
    Equal,
}

/// Bounds on a variable.
#[derive(Debug, Clone, Copy)]
pub struct VariableBounds {
    /// Lower bound (None = -infinity).
    pub lower: Option<f64>,
    /// Upper bound (None = +infinity).
    pub upper: Option<f64>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self {
            lower: Some(0.0),
            upper: None,
        }
    }
}

impl VariableBounds {
    /// Free variable (no bounds).
    #[must_use]
    pub const fn free() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Non-negative variable [0, +inf).
    #[must_use]
    pub fn non_negative() -> Self {
        Self::default()
    }

    /// Bounded variable [lower, upper].
    #[must_use]
    pub const fn bounded(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }
}

/// Optimal solution to an LP problem.
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Optimal variable values.
    pub values: Vec<f64>,
    /// Optimal objective value.
    pub objective: f64,
    /// Dual value per constraint row, in row order.
    pub duals: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_validation_rejects_short_rows() {
        let mut problem = LpProblem::new(3, ObjectiveDirection::Maximize);
        problem
            .constraints
            .push(LpConstraint::eq(vec![1.0, 2.0], 4.0));

        let err = problem.validate_shape().unwrap_err();
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn constraint_evaluates_lhs() {
        let c = LpConstraint::eq(vec![2.0, -1.0, 0.5], 0.0);
        let lhs = c.evaluate(&[1.0, 3.0, 4.0]);
        assert!((lhs - 1.0).abs() < 1e-12);
    }
}
