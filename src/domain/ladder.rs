//! Cash ladder construction.
//!
//! A [`CashLadder`] describes a planning horizon, a set of investable
//! instruments with fixed maturities and returns, and the rate at which idle
//! cash carries between periods. Together with a [`Requirements`] vector it
//! lowers into one equality constraint per period:
//!
//! ```text
//! -sum(new placements in t) + sum((1 + rate) * placements maturing in t)
//!     - (1 + carry_rate) * balance[t-1] + balance[t] = requirement[t]
//! ```
//!
//! with absent terms omitted at the edges of the horizon. The objective is
//! always to maximize the terminal balance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LadderError, Result};
use crate::solver::{
    LpConstraint, LpProblem, ObjectiveDirection, Solver, VariableBounds,
};

use super::plan::FinancingPlan;

/// An investable instrument: place cash now, receive it back with a fixed
/// return a fixed number of periods later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Display name, also used to look up schedules on a solved plan.
    pub name: String,
    /// Whole periods until the placement pays out.
    pub maturity: usize,
    /// Fractional return at maturity (0.01 = 1%).
    pub rate: f64,
    /// Optional cap on the amount placed per period.
    #[serde(default)]
    pub cap: Option<f64>,
}

impl Instrument {
    /// Create an uncapped instrument.
    #[must_use]
    pub fn new(name: impl Into<String>, maturity: usize, rate: f64) -> Self {
        Self {
            name: name.into(),
            maturity,
            rate,
            cap: None,
        }
    }

    /// Cap the amount that can be placed in any single period.
    #[must_use]
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Growth factor applied to a placement at maturity.
    #[must_use]
    pub fn growth_factor(&self) -> f64 {
        1.0 + self.rate
    }
}

/// Required net external cash flow per period (negative = cash needed).
#[derive(Debug, Clone, PartialEq)]
pub struct Requirements(Vec<f64>);

impl Requirements {
    #[must_use]
    pub fn new(flows: Vec<f64>) -> Self {
        Self(flows)
    }

    /// The canonical six-month requirement vector.
    #[must_use]
    pub fn short_term_financing() -> Self {
        Self(vec![-150.0, -100.0, 200.0, -200.0, 50.0, 300.0])
    }

    #[must_use]
    pub fn flows(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for Requirements {
    fn from(flows: Vec<f64>) -> Self {
        Self::new(flows)
    }
}

/// A cash-flow planning ladder over a fixed horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct CashLadder {
    horizon: usize,
    carry_rate: f64,
    instruments: Vec<Instrument>,
}

impl CashLadder {
    /// Create a ladder, validating every instrument against the horizon.
    pub fn new(
        horizon: usize,
        carry_rate: f64,
        instruments: Vec<Instrument>,
    ) -> Result<Self> {
        if horizon == 0 {
            return Err(LadderError::EmptyHorizon.into());
        }
        for instrument in &instruments {
            if instrument.maturity == 0 {
                return Err(LadderError::NonPositiveMaturity {
                    name: instrument.name.clone(),
                    maturity: instrument.maturity,
                }
                .into());
            }
            // a placement in period t pays out in period t + maturity, so an
            // instrument with maturity >= horizon can never be started
            if instrument.maturity >= horizon {
                return Err(LadderError::MaturityBeyondHorizon {
                    name: instrument.name.clone(),
                    maturity: instrument.maturity,
                    horizon,
                }
                .into());
            }
            if let Some(cap) = instrument.cap {
                if cap < 0.0 {
                    return Err(LadderError::NegativeCap {
                        name: instrument.name.clone(),
                        cap,
                    }
                    .into());
                }
            }
            if instrument.rate <= -1.0 {
                return Err(LadderError::RateBelowNegativeOne {
                    name: instrument.name.clone(),
                    rate: instrument.rate,
                }
                .into());
            }
        }
        Ok(Self {
            horizon,
            carry_rate,
            instruments,
        })
    }

    /// The classic six-month short-term financing ladder: a one-month
    /// instrument at 1% capped at 100 per month, an uncapped three-month
    /// instrument at 2%, and idle cash carrying at 0.3%.
    #[must_use]
    pub fn short_term_financing() -> Self {
        Self {
            horizon: 6,
            carry_rate: 0.003,
            instruments: vec![
                Instrument::new("short", 1, 0.01).with_cap(100.0),
                Instrument::new("long", 3, 0.02),
            ],
        }
    }

    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[must_use]
    pub fn carry_rate(&self) -> f64 {
        self.carry_rate
    }

    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Number of periods in which the given instrument can be started: a
    /// placement in period `t` must pay out by the end of the horizon.
    #[must_use]
    pub fn start_periods(&self, instrument: &Instrument) -> usize {
        self.horizon.saturating_sub(instrument.maturity)
    }

    /// Total decision variables: one per startable (instrument, period) pair
    /// plus one balance per period.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.instrument_vars() + self.horizon
    }

    fn instrument_vars(&self) -> usize {
        self.instruments
            .iter()
            .map(|i| self.start_periods(i))
            .sum()
    }

    /// Flat index of the first variable of instrument `k`.
    fn instrument_offset(&self, k: usize) -> usize {
        self.instruments[..k]
            .iter()
            .map(|i| self.start_periods(i))
            .sum()
    }

    /// Flat index of the first balance variable.
    #[must_use]
    pub fn balance_offset(&self) -> usize {
        self.instrument_vars()
    }

    /// Display label per variable, in flat index order.
    #[must_use]
    pub fn variable_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.num_vars());
        for instrument in &self.instruments {
            for period in 1..=self.start_periods(instrument) {
                labels.push(format!("{}[{}]", instrument.name, period));
            }
        }
        for period in 1..=self.horizon {
            labels.push(format!("balance[{}]", period));
        }
        labels
    }

    /// Lower the ladder and a requirement vector into an LP.
    ///
    /// Fails before touching the solver when the requirement vector length
    /// differs from the horizon.
    pub fn to_lp_problem(&self, requirements: &Requirements) -> Result<LpProblem> {
        if requirements.len() != self.horizon {
            return Err(LadderError::RequirementMismatch {
                expected: self.horizon,
                got: requirements.len(),
            }
            .into());
        }

        let n = self.num_vars();
        let balance_offset = self.balance_offset();
        let mut problem = LpProblem::new(n, ObjectiveDirection::Maximize);

        for (k, instrument) in self.instruments.iter().enumerate() {
            let offset = self.instrument_offset(k);
            for slot in 0..self.start_periods(instrument) {
                problem.bounds[offset + slot] = match instrument.cap {
                    Some(cap) => VariableBounds::bounded(0.0, cap),
                    None => VariableBounds::non_negative(),
                };
            }
        }
        // balances keep the default non-negative bounds

        for (t, &flow) in requirements.flows().iter().enumerate() {
            let period = t + 1;
            let mut coefficients = vec![0.0; n];

            for (k, instrument) in self.instruments.iter().enumerate() {
                let offset = self.instrument_offset(k);
                let starts = self.start_periods(instrument);

                // new placement this period
                if period <= starts {
                    coefficients[offset + period - 1] -= 1.0;
                }
                // placement maturing this period
                if period > instrument.maturity {
                    let start = period - instrument.maturity;
                    if start <= starts {
                        coefficients[offset + start - 1] += instrument.growth_factor();
                    }
                }
            }

            coefficients[balance_offset + t] += 1.0;
            if t > 0 {
                coefficients[balance_offset + t - 1] -= 1.0 + self.carry_rate;
            }

            problem.constraints.push(LpConstraint::eq(coefficients, flow));
        }

        // maximize the terminal balance
        problem.objective[balance_offset + self.horizon - 1] = 1.0;

        debug!(
            horizon = self.horizon,
            vars = n,
            rows = problem.constraints.len(),
            "built cash ladder LP"
        );

        Ok(problem)
    }

    /// Build, solve and wrap the result into a [`FinancingPlan`].
    pub fn solve(
        &self,
        requirements: &Requirements,
        solver: &dyn Solver,
    ) -> Result<FinancingPlan> {
        let problem = self.to_lp_problem(requirements)?;
        let solution = solver.solve(&problem)?;
        Ok(FinancingPlan::from_solution(self, requirements, solution))
    }
}
