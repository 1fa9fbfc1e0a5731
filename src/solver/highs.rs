//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear/mixed-integer programming
//! solver. This implementation wraps it using the good_lp crate for ergonomic
//! Rust usage, and reads constraint duals back from the solved model for
//! sensitivity reporting.

use good_lp::constraint::ConstraintReference;
use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, DualValues, Expression, ResolutionError, Solution,
    SolutionWithDual, SolverModel,
};
use tracing::debug;

use super::{ConstraintSense, LpProblem, LpSolution, ObjectiveDirection, Solver};
use crate::error::{Result, SolverError};

/// HiGHS-based LP solver.
#[derive(Debug, Default, Clone)]
pub struct HighsSolver;

impl HighsSolver {
    /// Create a new HiGHS solver instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&self, problem: &LpProblem) -> Result<LpSolution> {
        solve_with_good_lp(problem)
    }
}

/// Internal solver implementation using good_lp.
fn solve_with_good_lp(problem: &LpProblem) -> Result<LpSolution> {
    problem.validate_shape()?;
    let n = problem.num_vars();

    // Handle empty problem
    if n == 0 {
        return Ok(LpSolution {
            values: vec![],
            objective: 0.0,
            duals: vec![],
        });
    }

    // Create variables
    let mut vars = variables!();
    let mut var_list = Vec::with_capacity(n);

    for bounds in &problem.bounds {
        let mut v = variable();

        if let Some(lb) = bounds.lower {
            v = v.min(lb);
        }
        if let Some(ub) = bounds.upper {
            v = v.max(ub);
        }

        var_list.push(vars.add(v));
    }

    // Build objective function
    let objective: Expression = var_list
        .iter()
        .zip(problem.objective.iter())
        .map(|(v, c)| *c * *v)
        .sum();

    let mut model = match problem.direction {
        ObjectiveDirection::Maximize => vars.maximise(&objective).using(highs),
        ObjectiveDirection::Minimize => vars.minimise(&objective).using(highs),
    };

    // Add constraints, keeping references so duals can be read back in
    // row order after the solve.
    let mut row_refs: Vec<ConstraintReference> = Vec::with_capacity(problem.constraints.len());
    for constr in &problem.constraints {
        let lhs: Expression = var_list
            .iter()
            .zip(constr.coefficients.iter())
            .map(|(v, c)| *c * *v)
            .sum();

        let rhs = constr.rhs;

        let reference = match constr.sense {
            ConstraintSense::GreaterEqual => model.add_constraint(constraint!(lhs >= rhs)),
            ConstraintSense::LessEqual => model.add_constraint(constraint!(lhs <= rhs)),
            ConstraintSense::Equal => model.add_constraint(constraint!(lhs == rhs)),
        };
        row_refs.push(reference);
    }

    debug!(
        vars = n,
        rows = problem.constraints.len(),
        "submitting problem to HiGHS"
    );

    match model.solve() {
        Ok(mut solution) => {
            let values: Vec<f64> = var_list.iter().map(|v| solution.value(*v)).collect();

            let duals: Vec<f64> = {
                let dual_view = solution.compute_dual();
                row_refs.iter().map(|r| dual_view.dual(r.clone())).collect()
            };

            // Re-evaluate the objective with the solved values
            let objective_value: f64 = values
                .iter()
                .zip(problem.objective.iter())
                .map(|(v, c)| v * c)
                .sum();

            Ok(LpSolution {
                values,
                objective: objective_value,
                duals,
            })
        }
        Err(ResolutionError::Infeasible) => Err(SolverError::Infeasible.into()),
        Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded.into()),
        Err(other) => {
            let message = other.to_string();
            if message.to_lowercase().contains("limit") {
                Err(SolverError::LimitReached(message).into())
            } else {
                Err(SolverError::Backend(message).into())
            }
        }
    }
}
