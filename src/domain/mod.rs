//! Planning domain: cash ladders, requirements and solved plans.

mod ladder;
mod plan;

pub use ladder::{CashLadder, Instrument, Requirements};
pub use plan::FinancingPlan;
