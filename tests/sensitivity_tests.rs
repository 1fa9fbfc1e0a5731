//! Sensitivity analysis against independently computed optima for the
//! canonical six-month ladder.

use cashladder::domain::{CashLadder, FinancingPlan, Requirements};
use cashladder::sensitivity::SensitivityReport;
use cashladder::solver::{HighsSolver, Solver};

const TOL: f64 = 1e-6;

/// Row duals of the canonical instance, from exact rational arithmetic.
const SHADOW_PRICES: [f64; 6] = [
    1.0372881355932204,
    1.0302,
    1.02,
    1.0169491525423728,
    1.01,
    1.0,
];

fn analyzed() -> (CashLadder, Requirements, FinancingPlan, SensitivityReport) {
    let ladder = CashLadder::short_term_financing();
    let requirements = Requirements::short_term_financing();
    let solver = HighsSolver::new();
    let plan = ladder.solve(&requirements, &solver).unwrap();
    let report = SensitivityReport::analyze(&ladder, &requirements, &solver, &plan).unwrap();
    (ladder, requirements, plan, report)
}

#[test]
fn shadow_prices_match_known_duals() {
    let (_, _, _, report) = analyzed();

    assert_eq!(report.constraints.len(), 6);
    for (c, expected) in report.constraints.iter().zip(SHADOW_PRICES) {
        assert!(
            (c.shadow_price - expected).abs() < TOL,
            "period {} shadow price {} differs from {}",
            c.period,
            c.shadow_price,
            expected
        );
    }
}

#[test]
fn reduced_costs_match_dual_slack() {
    let (_, _, _, report) = analyzed();

    let expected = [
        ("short[1]", -0.003213864406779661),
        ("short[2]", 0.0),
        ("short[3]", -0.00711864406779661),
        ("short[4]", -0.0031508474576271185),
        ("short[5]", 0.0),
        ("long[1]", 0.0),
        ("long[2]", 0.0),
        ("long[3]", 0.0),
        ("balance[1]", -0.003997535593220339),
        ("balance[2]", -0.00714),
        ("balance[3]", 0.0),
        ("balance[4]", -0.003919152542372881),
        ("balance[5]", -0.007),
        ("balance[6]", 0.0),
    ];

    assert_eq!(report.variables.len(), expected.len());
    for (label, rc) in expected {
        let entry = report.variable(label).unwrap();
        assert!(
            (entry.reduced_cost - rc).abs() < TOL,
            "{label} reduced cost {} differs from {rc}",
            entry.reduced_cost
        );
    }
}

#[test]
fn shadow_prices_predict_small_rhs_shifts() {
    let (ladder, requirements, plan, _) = analyzed();
    let solver = HighsSolver::new();
    let problem = ladder.to_lp_problem(&requirements).unwrap();

    for row in 0..6 {
        for delta in [10.0, -10.0] {
            let mut perturbed = problem.clone();
            perturbed.constraints[row].rhs += delta;
            let solution = solver.solve(&perturbed).unwrap();

            let predicted = plan.objective() + SHADOW_PRICES[row] * delta;
            assert!(
                (solution.objective - predicted).abs() < 1e-6,
                "row {} delta {delta}: objective {} but dual predicts {predicted}",
                row + 1,
                solution.objective
            );
        }
    }
}

#[test]
fn ranges_cover_modest_perturbations() {
    let (_, _, _, report) = analyzed();

    for c in &report.constraints {
        for bound in [c.range.allowable_decrease, c.range.allowable_increase] {
            if let Some(magnitude) = bound {
                assert!(
                    magnitude > 9.9,
                    "period {} range {magnitude} is implausibly tight",
                    c.period
                );
            }
        }
    }
}

#[test]
fn terminal_period_range_is_the_final_balance() {
    let (_, _, plan, report) = analyzed();
    let range = report.constraint(6).unwrap().range;

    // more income at the end just raises the final balance forever
    assert_eq!(range.allowable_increase, None);

    // less income drains the final balance; past that the plan cannot
    // stay non-negative
    let decrease = range.allowable_decrease.unwrap();
    assert!(
        (decrease - plan.terminal_balance()).abs() < 0.01,
        "allowable decrease {decrease} should match the terminal balance"
    );
}

#[test]
fn fifth_period_increase_stops_at_the_long_repayment() {
    let (_, _, _, report) = analyzed();
    let increase = report.constraint(5).unwrap().range.allowable_increase.unwrap();

    assert!(
        (increase - 52.0).abs() < 0.2,
        "allowable increase {increase} should sit near 52"
    );
}

#[test]
fn first_period_ranges_are_finite() {
    let (_, _, _, report) = analyzed();
    let range = report.constraint(1).unwrap().range;

    let decrease = range.allowable_decrease.unwrap();
    assert!((10.0..=95.0).contains(&decrease));

    let increase = range.allowable_increase.unwrap();
    assert!((10.0..=155.0).contains(&increase));
}

#[test]
fn lookup_helpers_find_rows_and_labels() {
    let (_, _, _, report) = analyzed();

    assert!((report.constraint(3).unwrap().shadow_price - 1.02).abs() < TOL);
    assert!(report.constraint(7).is_none());

    let long2 = report.variable("long[2]").unwrap();
    assert!(long2.value > 0.0);
    assert!(long2.reduced_cost.abs() < TOL);
    assert!(report.variable("long[9]").is_none());
}
