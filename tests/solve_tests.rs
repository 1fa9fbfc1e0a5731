//! End-to-end solve properties for the cash ladder.

use cashladder::domain::{CashLadder, Instrument, Requirements};
use cashladder::error::{Error, LadderError, SolverError};
use cashladder::solver::HighsSolver;

const TOL: f64 = 1e-6;

/// Exact optimum of the canonical six-month instance (136433/1475).
const CANONICAL_OPTIMUM: f64 = 92.49694915254237;

fn canonical() -> (CashLadder, Requirements) {
    (
        CashLadder::short_term_financing(),
        Requirements::short_term_financing(),
    )
}

#[test]
fn canonical_plan_reaches_known_terminal_balance() {
    let (ladder, requirements) = canonical();
    let plan = ladder.solve(&requirements, &HighsSolver::new()).unwrap();

    assert!(
        (plan.terminal_balance() - CANONICAL_OPTIMUM).abs() < TOL,
        "terminal balance {} differs from {}",
        plan.terminal_balance(),
        CANONICAL_OPTIMUM
    );
}

#[test]
fn solution_satisfies_every_balance_row() {
    let (ladder, requirements) = canonical();
    let plan = ladder.solve(&requirements, &HighsSolver::new()).unwrap();

    let problem = ladder.to_lp_problem(&requirements).unwrap();
    for (row, constraint) in problem.constraints.iter().enumerate() {
        let lhs = constraint.evaluate(plan.values());
        assert!(
            (lhs - constraint.rhs).abs() < TOL,
            "row {} evaluates to {} instead of {}",
            row + 1,
            lhs,
            constraint.rhs
        );
    }
}

#[test]
fn solution_respects_bounds() {
    let (ladder, requirements) = canonical();
    let plan = ladder.solve(&requirements, &HighsSolver::new()).unwrap();

    for (label, value) in plan.labels().iter().zip(plan.values()) {
        assert!(*value >= -TOL, "{label} is negative: {value}");
    }
    for amount in plan.schedule("short").unwrap() {
        assert!(*amount <= 100.0 + TOL, "short placement over cap: {amount}");
    }
}

#[test]
fn schedules_and_balances_partition_the_values() {
    let (ladder, requirements) = canonical();
    let plan = ladder.solve(&requirements, &HighsSolver::new()).unwrap();

    assert_eq!(plan.values().len(), 14);
    assert_eq!(plan.schedule("short").unwrap().len(), 5);
    assert_eq!(plan.schedule("long").unwrap().len(), 3);
    assert_eq!(plan.balances().len(), 6);
    assert!(
        (plan.balances()[5] - plan.terminal_balance()).abs() < TOL,
        "terminal balance must be the last balance variable"
    );
}

#[test]
fn wrong_length_requirements_are_rejected() {
    let (ladder, _) = canonical();
    let solver = HighsSolver::new();

    for len in [0, 5, 7] {
        let requirements = Requirements::new(vec![0.0; len]);
        let err = ladder.solve(&requirements, &solver).unwrap_err();
        assert!(
            matches!(
                err,
                Error::Ladder(LadderError::RequirementMismatch { expected: 6, .. })
            ),
            "length {len} produced {err}"
        );
    }
}

#[test]
fn zero_requirements_leave_everything_idle() {
    let (ladder, _) = canonical();
    let requirements = Requirements::new(vec![0.0; 6]);
    let plan = ladder.solve(&requirements, &HighsSolver::new()).unwrap();

    assert!(plan.terminal_balance().abs() < TOL);
    for (label, value) in plan.labels().iter().zip(plan.values()) {
        assert!(value.abs() < TOL, "{label} should be idle, got {value}");
    }
}

#[test]
fn infeasible_ladder_is_reported_distinctly() {
    // one period, no instruments, cash needed: nothing can fund it
    let ladder = CashLadder::new(1, 0.003, vec![]).unwrap();
    let requirements = Requirements::new(vec![-10.0]);

    let err = ladder
        .solve(&requirements, &HighsSolver::new())
        .unwrap_err();
    assert!(matches!(err, Error::Solver(SolverError::Infeasible)));
}

#[test]
fn unbounded_ladder_is_reported() {
    // an uncapped instrument cheaper than the carry rate is free money;
    // HiGHS may report this as unbounded outright or fail in presolve,
    // but it must never come back as a plan
    let ladder =
        CashLadder::new(2, 0.003, vec![Instrument::new("cheap", 1, 0.001)]).unwrap();
    let requirements = Requirements::new(vec![0.0, 0.0]);

    let err = ladder
        .solve(&requirements, &HighsSolver::new())
        .unwrap_err();
    assert!(
        matches!(
            err,
            Error::Solver(SolverError::Unbounded | SolverError::Backend(_))
        ),
        "expected unbounded, got {err}"
    );
}

#[test]
fn smaller_ladder_solves_and_balances() {
    // three periods, zero carry, one 1% instrument: borrowing never pays,
    // the surplus just carries through
    let ladder = CashLadder::new(3, 0.0, vec![Instrument::new("bill", 1, 0.01)]).unwrap();
    let requirements = Requirements::new(vec![100.0, 0.0, -50.0]);
    let plan = ladder.solve(&requirements, &HighsSolver::new()).unwrap();

    assert!((plan.terminal_balance() - 50.0).abs() < TOL);

    let problem = ladder.to_lp_problem(&requirements).unwrap();
    for constraint in &problem.constraints {
        assert!((constraint.evaluate(plan.values()) - constraint.rhs).abs() < TOL);
    }
}
