//! Post-optimal sensitivity reporting.
//!
//! Everything here is read from, or measured through, the solver: shadow
//! prices are the backend's row duals, reduced costs are the dual form of the
//! objective over those duals, and right-hand-side ranges are measured by
//! re-solving perturbed models until the shadow price stops predicting the
//! objective. No basis algebra is performed locally.

use tracing::debug;

use crate::domain::{CashLadder, FinancingPlan, Requirements};
use crate::error::{Error, Result, SolverError};
use crate::solver::{LpProblem, Solver};

/// Relative tolerance for "the shadow price still predicts the objective".
const PREDICTION_RTOL: f64 = 1e-6;

/// Perturbations beyond this magnitude are reported as unbounded.
const PROBE_CAP: f64 = 1_048_576.0;

/// Bisection stops once the bracket is this narrow.
const RANGE_RESOLUTION: f64 = 1e-4;

/// Allowable right-hand-side perturbation range for one constraint.
///
/// Both fields are magnitudes; `None` means the shadow price kept predicting
/// the objective for every probed perturbation in that direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhsRange {
    pub allowable_decrease: Option<f64>,
    pub allowable_increase: Option<f64>,
}

/// Sensitivity of one balance constraint.
#[derive(Debug, Clone)]
pub struct ConstraintSensitivity {
    /// 1-based period of the balance row.
    pub period: usize,
    /// The requirement (right-hand side) the plan was solved against.
    pub rhs: f64,
    /// Rate of objective change per unit relaxation of the requirement.
    pub shadow_price: f64,
    /// Range over which the shadow price remains valid.
    pub range: RhsRange,
}

/// Sensitivity of one decision variable.
#[derive(Debug, Clone)]
pub struct VariableSensitivity {
    pub label: String,
    pub value: f64,
    /// Rate of objective change per unit forced increase from the bound.
    pub reduced_cost: f64,
}

/// Full post-optimal sensitivity report for a solved plan.
#[derive(Debug, Clone)]
pub struct SensitivityReport {
    pub constraints: Vec<ConstraintSensitivity>,
    pub variables: Vec<VariableSensitivity>,
}

impl SensitivityReport {
    /// Analyze a solved plan.
    ///
    /// Re-solves perturbed copies of the model to measure each constraint's
    /// allowable range, so the solver is invoked many times; for the ladder
    /// sizes this crate targets that is a few hundred sub-millisecond solves.
    pub fn analyze(
        ladder: &CashLadder,
        requirements: &Requirements,
        solver: &dyn Solver,
        plan: &FinancingPlan,
    ) -> Result<Self> {
        let problem = ladder.to_lp_problem(requirements)?;
        let duals = plan.shadow_prices();
        let base_objective = plan.objective();

        let mut constraints = Vec::with_capacity(problem.constraints.len());
        for (row, constraint) in problem.constraints.iter().enumerate() {
            let shadow_price = duals[row];
            let allowable_increase =
                probe_direction(&problem, solver, row, shadow_price, base_objective, 1.0)?;
            let allowable_decrease =
                probe_direction(&problem, solver, row, shadow_price, base_objective, -1.0)?;

            constraints.push(ConstraintSensitivity {
                period: row + 1,
                rhs: constraint.rhs,
                shadow_price,
                range: RhsRange {
                    allowable_decrease,
                    allowable_increase,
                },
            });
        }

        let variables = reduced_costs(&problem, duals)
            .into_iter()
            .zip(plan.labels().iter())
            .zip(plan.values().iter())
            .map(|((reduced_cost, label), value)| VariableSensitivity {
                label: label.clone(),
                value: *value,
                reduced_cost,
            })
            .collect();

        Ok(Self {
            constraints,
            variables,
        })
    }

    /// Sensitivity entry for a 1-based period.
    #[must_use]
    pub fn constraint(&self, period: usize) -> Option<&ConstraintSensitivity> {
        self.constraints.iter().find(|c| c.period == period)
    }

    /// Sensitivity entry for a variable label.
    #[must_use]
    pub fn variable(&self, label: &str) -> Option<&VariableSensitivity> {
        self.variables.iter().find(|v| v.label == label)
    }
}

/// Reduced cost per variable: `c_j - sum_i duals[i] * a[i][j]`.
fn reduced_costs(problem: &LpProblem, duals: &[f64]) -> Vec<f64> {
    (0..problem.num_vars())
        .map(|j| {
            let weighted: f64 = problem
                .constraints
                .iter()
                .zip(duals.iter())
                .map(|(c, y)| c.coefficients[j] * y)
                .sum();
            problem.objective[j] - weighted
        })
        .collect()
}

/// Find how far the RHS of `row` can move in `direction` (+1/-1) before the
/// shadow price stops predicting the re-solved objective.
///
/// Doubles the step until the prediction fails or the cap is reached, then
/// bisects the failing bracket. Returns the magnitude, or `None` when the
/// prediction held all the way to the cap.
fn probe_direction(
    problem: &LpProblem,
    solver: &dyn Solver,
    row: usize,
    shadow_price: f64,
    base_objective: f64,
    direction: f64,
) -> Result<Option<f64>> {
    let tolerance = PREDICTION_RTOL * (1.0 + base_objective.abs());

    let holds = |delta_magnitude: f64| -> Result<bool> {
        let delta = direction * delta_magnitude;
        let mut perturbed = problem.clone();
        perturbed.constraints[row].rhs += delta;

        match solver.solve(&perturbed) {
            Ok(solution) => {
                let predicted = base_objective + shadow_price * delta;
                Ok((solution.objective - predicted).abs() <= tolerance)
            }
            // leaving the range by making the model infeasible or unbounded
            // also invalidates the shadow price
            Err(Error::Solver(SolverError::Infeasible | SolverError::Unbounded)) => Ok(false),
            Err(other) => Err(other),
        }
    };

    let mut step = 1.0;
    while holds(step)? {
        step *= 2.0;
        if step > PROBE_CAP {
            return Ok(None);
        }
    }

    // prediction fails at `step`; the last passing point is step/2 (or 0)
    let mut lo = if step > 1.0 { step / 2.0 } else { 0.0 };
    let mut hi = step;
    while hi - lo > RANGE_RESOLUTION {
        let mid = 0.5 * (lo + hi);
        if holds(mid)? {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    debug!(row, direction, range = lo, "probed RHS range");
    Ok(Some(lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{LpConstraint, ObjectiveDirection};

    #[test]
    fn reduced_costs_are_the_dual_slack() {
        // maximize 3x + 2y, one row x + 2y = 4, dual 1.5
        let mut problem = LpProblem::new(2, ObjectiveDirection::Maximize);
        problem.objective = vec![3.0, 2.0];
        problem
            .constraints
            .push(LpConstraint::eq(vec![1.0, 2.0], 4.0));

        let rc = reduced_costs(&problem, &[1.5]);
        assert!((rc[0] - 1.5).abs() < 1e-12); // 3 - 1.5*1
        assert!((rc[1] - (-1.0)).abs() < 1e-12); // 2 - 1.5*2
    }
}
