use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised when a ladder or its inputs violate a domain invariant.
///
/// These are returned by validating constructors and by model construction,
/// before anything is handed to a solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LadderError {
    /// The requirement vector must have exactly one entry per period.
    #[error("requirement vector has {got} entries, ladder horizon is {expected}")]
    RequirementMismatch { expected: usize, got: usize },

    /// A ladder must cover at least one period.
    #[error("planning horizon must be at least 1")]
    EmptyHorizon,

    /// An instrument must take at least one period to mature.
    #[error("instrument '{name}' has maturity {maturity}, must be at least 1")]
    NonPositiveMaturity { name: String, maturity: usize },

    /// An instrument that matures after the horizon can never be started.
    #[error("instrument '{name}' matures after {maturity} periods, beyond the {horizon}-period horizon")]
    MaturityBeyondHorizon {
        name: String,
        maturity: usize,
        horizon: usize,
    },

    /// Per-period caps cannot be negative.
    #[error("instrument '{name}' has negative cap {cap}")]
    NegativeCap { name: String, cap: f64 },

    /// A return of -100% or worse makes the balance recurrence meaningless.
    #[error("instrument '{name}' has rate {rate}, must be greater than -1")]
    RateBelowNegativeOne { name: String, rate: f64 },
}

/// Solver termination surfaced as typed errors.
///
/// Only an optimal solve produces a solution; every other termination is
/// reported distinctly here and never silently swallowed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// No assignment satisfies the constraints and bounds.
    #[error("problem is infeasible")]
    Infeasible,

    /// The objective can be improved without limit.
    #[error("problem is unbounded")]
    Unbounded,

    /// The backend stopped at an iteration or time limit.
    #[error("solver limit reached: {0}")]
    LimitReached(String),

    /// Any other backend failure, propagated verbatim.
    #[error("solver backend failure: {0}")]
    Backend(String),

    /// A constraint row does not match the variable count.
    #[error("constraint row {row} has {got} coefficients, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ladder(#[from] LadderError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_error_messages_name_the_offender() {
        let err = LadderError::RequirementMismatch {
            expected: 6,
            got: 5,
        };
        assert_eq!(
            err.to_string(),
            "requirement vector has 5 entries, ladder horizon is 6"
        );

        let err = LadderError::MaturityBeyondHorizon {
            name: "long".into(),
            maturity: 9,
            horizon: 6,
        };
        assert!(err.to_string().contains("'long'"));
    }

    #[test]
    fn solver_errors_convert_into_top_level() {
        let err: Error = SolverError::Infeasible.into();
        assert!(matches!(err, Error::Solver(SolverError::Infeasible)));
    }
}
