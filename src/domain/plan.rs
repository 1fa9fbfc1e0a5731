//! Solved financing plans.

use tracing::info;

use crate::solver::LpSolution;

use super::ladder::{CashLadder, Requirements};

/// The result of solving a [`CashLadder`] to optimality.
///
/// A plan only exists for an optimal solve; infeasible, unbounded and limit
/// terminations surface as errors from [`CashLadder::solve`] instead. All
/// accessors read solved state; nothing mutates after construction.
#[derive(Debug, Clone)]
pub struct FinancingPlan {
    labels: Vec<String>,
    schedules: Vec<(String, Vec<f64>)>,
    balances: Vec<f64>,
    values: Vec<f64>,
    duals: Vec<f64>,
    objective: f64,
    requirements: Vec<f64>,
}

impl FinancingPlan {
    pub(crate) fn from_solution(
        ladder: &CashLadder,
        requirements: &Requirements,
        solution: LpSolution,
    ) -> Self {
        let labels = ladder.variable_labels();
        let balance_offset = ladder.balance_offset();

        let mut schedules = Vec::with_capacity(ladder.instruments().len());
        let mut cursor = 0;
        for instrument in ladder.instruments() {
            let starts = ladder.start_periods(instrument);
            schedules.push((
                instrument.name.clone(),
                solution.values[cursor..cursor + starts].to_vec(),
            ));
            cursor += starts;
        }

        let balances = solution.values[balance_offset..].to_vec();

        info!(
            terminal_balance = solution.objective,
            horizon = ladder.horizon(),
            "solved financing plan"
        );

        Self {
            labels,
            schedules,
            balances,
            values: solution.values,
            duals: solution.duals,
            objective: solution.objective,
            requirements: requirements.flows().to_vec(),
        }
    }

    /// Optimal objective value: the terminal cash balance.
    #[must_use]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Alias for [`objective`](Self::objective), named for what it is.
    #[must_use]
    pub fn terminal_balance(&self) -> f64 {
        self.objective
    }

    /// All solved values in flat variable order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Solved value of a single variable by flat index.
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Display label per variable, matching [`values`](Self::values) order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Amounts placed in the named instrument, ordered by start period.
    #[must_use]
    pub fn schedule(&self, instrument: &str) -> Option<&[f64]> {
        self.schedules
            .iter()
            .find(|(name, _)| name == instrument)
            .map(|(_, amounts)| amounts.as_slice())
    }

    /// Every instrument schedule, in ladder declaration order.
    pub fn schedules(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.schedules
            .iter()
            .map(|(name, amounts)| (name.as_str(), amounts.as_slice()))
    }

    /// Cash balance carried out of each period.
    #[must_use]
    pub fn balances(&self) -> &[f64] {
        &self.balances
    }

    /// Dual value per balance constraint: the rate of objective change per
    /// unit relaxation of that period's requirement.
    #[must_use]
    pub fn shadow_prices(&self) -> &[f64] {
        &self.duals
    }

    /// The requirement vector this plan was solved against.
    #[must_use]
    pub fn requirements(&self) -> &[f64] {
        &self.requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> FinancingPlan {
        let ladder = CashLadder::short_term_financing();
        let requirements = Requirements::short_term_financing();
        let solution = LpSolution {
            values: (0..14).map(|i| i as f64).collect(),
            objective: 13.0,
            duals: vec![1.0; 6],
        };
        FinancingPlan::from_solution(&ladder, &requirements, solution)
    }

    #[test]
    fn schedules_slice_the_flat_value_vector() {
        let plan = sample_plan();

        assert_eq!(plan.schedule("short").unwrap(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(plan.schedule("long").unwrap(), &[5.0, 6.0, 7.0]);
        assert_eq!(
            plan.balances(),
            &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0]
        );
        assert!(plan.schedule("missing").is_none());
    }

    #[test]
    fn terminal_balance_is_the_objective() {
        let plan = sample_plan();
        assert!((plan.terminal_balance() - plan.objective()).abs() < 1e-12);
        assert!((plan.value(13) - 13.0).abs() < 1e-12);
        assert_eq!(plan.labels()[13], "balance[6]");
    }
}
