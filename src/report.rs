//! Rendering of solved plans and sensitivity reports.
//!
//! Human-readable output uses `tabled`; JSON payloads mirror the same data
//! for scripting.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::domain::FinancingPlan;
use crate::sensitivity::SensitivityReport;

/// Amounts below this are rendered as idle.
const DISPLAY_EPSILON: f64 = 5e-3;

#[derive(Tabled)]
struct PeriodRow {
    #[tabled(rename = "Period")]
    period: usize,
    #[tabled(rename = "Requirement")]
    requirement: String,
    #[tabled(rename = "Placements")]
    placements: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

#[derive(Tabled)]
struct ConstraintRow {
    #[tabled(rename = "Period")]
    period: usize,
    #[tabled(rename = "RHS")]
    rhs: String,
    #[tabled(rename = "Shadow price")]
    shadow_price: String,
    #[tabled(rename = "Allowable decrease")]
    decrease: String,
    #[tabled(rename = "Allowable increase")]
    increase: String,
}

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Variable")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Reduced cost")]
    reduced_cost: String,
}

fn bound(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "unbounded".into(),
    }
}

/// Render the per-period plan table.
#[must_use]
pub fn plan_table(plan: &FinancingPlan) -> String {
    let rows: Vec<PeriodRow> = plan
        .requirements()
        .iter()
        .enumerate()
        .map(|(t, requirement)| {
            let period = t + 1;
            let placements: Vec<String> = plan
                .schedules()
                .filter_map(|(name, amounts)| {
                    let amount = *amounts.get(t)?;
                    (amount > DISPLAY_EPSILON).then(|| format!("{name} {amount:.2}"))
                })
                .collect();

            PeriodRow {
                period,
                requirement: format!("{requirement:.2}"),
                placements: if placements.is_empty() {
                    "-".into()
                } else {
                    placements.join(", ")
                },
                balance: format!("{:.2}", plan.balances()[t]),
            }
        })
        .collect();

    Table::new(rows).to_string()
}

/// Render the constraint sensitivity table.
#[must_use]
pub fn constraint_table(report: &SensitivityReport) -> String {
    let rows: Vec<ConstraintRow> = report
        .constraints
        .iter()
        .map(|c| ConstraintRow {
            period: c.period,
            rhs: format!("{:.2}", c.rhs),
            shadow_price: format!("{:.6}", c.shadow_price),
            decrease: bound(c.range.allowable_decrease),
            increase: bound(c.range.allowable_increase),
        })
        .collect();

    Table::new(rows).to_string()
}

/// Render the variable sensitivity table.
#[must_use]
pub fn variable_table(report: &SensitivityReport) -> String {
    let rows: Vec<VariableRow> = report
        .variables
        .iter()
        .map(|v| VariableRow {
            label: v.label.clone(),
            value: format!("{:.2}", v.value),
            reduced_cost: format!("{:.6}", v.reduced_cost),
        })
        .collect();

    Table::new(rows).to_string()
}

/// JSON payload for a solved plan.
#[must_use]
pub fn plan_json(plan: &FinancingPlan) -> serde_json::Value {
    let schedules: serde_json::Map<String, serde_json::Value> = plan
        .schedules()
        .map(|(name, amounts)| (name.to_string(), json!(amounts)))
        .collect();

    json!({
        "terminal_balance": plan.terminal_balance(),
        "requirements": plan.requirements(),
        "balances": plan.balances(),
        "schedules": schedules,
        "variables": plan
            .labels()
            .iter()
            .zip(plan.values().iter())
            .map(|(label, value)| json!({ "label": label, "value": value }))
            .collect::<Vec<_>>(),
        "shadow_prices": plan.shadow_prices(),
    })
}

/// JSON payload for a sensitivity report.
#[must_use]
pub fn sensitivity_json(report: &SensitivityReport) -> serde_json::Value {
    json!({
        "constraints": report
            .constraints
            .iter()
            .map(|c| json!({
                "period": c.period,
                "rhs": c.rhs,
                "shadow_price": c.shadow_price,
                "allowable_decrease": c.range.allowable_decrease,
                "allowable_increase": c.range.allowable_increase,
            }))
            .collect::<Vec<_>>(),
        "variables": report
            .variables
            .iter()
            .map(|v| json!({
                "label": v.label,
                "value": v.value,
                "reduced_cost": v.reduced_cost,
            }))
            .collect::<Vec<_>>(),
    })
}
