//! Cashladder - short-term cash-flow financing planning via linear programming.
//!
//! This crate plans how to fund a sequence of per-period net cash
//! requirements using a small set of investable instruments, by building a
//! linear program and delegating it to an external solver (HiGHS via
//! `good_lp`). The flow is strictly build → solve → read:
//!
//! - **[`domain`]** - problem data and model construction
//!   - [`domain::CashLadder`] - horizon, carry rate and instruments; lowers
//!     into one balance equality per period
//!   - [`domain::Requirements`] - required net cash flow per period
//!   - [`domain::FinancingPlan`] - solved result object with primal and dual
//!     accessors
//! - **[`solver`]** - LP abstraction and the HiGHS backend
//! - **[`sensitivity`]** - shadow prices, reduced costs and allowable
//!   right-hand-side ranges for a solved plan
//! - **[`config`]** - TOML configuration with validation
//! - **[`error`]** - typed errors; infeasible/unbounded/limit terminations
//!   surface distinctly
//!
//! # Example
//!
//! ```no_run
//! use cashladder::domain::{CashLadder, Requirements};
//! use cashladder::solver::HighsSolver;
//!
//! # fn main() -> cashladder::error::Result<()> {
//! let ladder = CashLadder::short_term_financing();
//! let requirements = Requirements::short_term_financing();
//!
//! let plan = ladder.solve(&requirements, &HighsSolver::new())?;
//! println!("terminal balance: {:.2}", plan.terminal_balance());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod report;
pub mod sensitivity;
pub mod solver;
