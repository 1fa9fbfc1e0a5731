//! Configuration loading from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{CashLadder, Instrument, Requirements};
use crate::error::{ConfigError, Result};

/// Top-level configuration: the ladder to plan over, the requirement vector
/// to fund, and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ladder: LadderConfig,
    pub requirements: RequirementsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ladder structure: horizon, carry rate and instruments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderConfig {
    pub horizon: usize,
    pub carry_rate: f64,
    #[serde(default)]
    pub instruments: Vec<Instrument>,
}

/// Required net cash flow per period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementsConfig {
    pub flows: Vec<f64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;

        Ok(config)
    }

    /// Check config-level invariants and every ladder invariant.
    pub fn validate(&self) -> Result<()> {
        // ladder invariants (horizon, maturities, caps, rates)
        self.to_ladder()?;

        if self.requirements.flows.len() != self.ladder.horizon {
            return Err(ConfigError::InvalidValue {
                field: "requirements.flows",
                reason: format!(
                    "expected {} entries to match ladder.horizon, got {}",
                    self.ladder.horizon,
                    self.requirements.flows.len()
                ),
            }
            .into());
        }

        if self.logging.level.is_empty() {
            return Err(ConfigError::MissingField {
                field: "logging.level",
            }
            .into());
        }

        Ok(())
    }

    /// Build the validated ladder described by this configuration.
    pub fn to_ladder(&self) -> Result<CashLadder> {
        CashLadder::new(
            self.ladder.horizon,
            self.ladder.carry_rate,
            self.ladder.instruments.clone(),
        )
    }

    /// The requirement vector described by this configuration.
    #[must_use]
    pub fn to_requirements(&self) -> Requirements {
        Requirements::new(self.requirements.flows.clone())
    }

    /// Render as TOML, e.g. for `config init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "config",
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        let ladder = CashLadder::short_term_financing();
        Self {
            ladder: LadderConfig {
                horizon: ladder.horizon(),
                carry_rate: ladder.carry_rate(),
                instruments: ladder.instruments().to_vec(),
            },
            requirements: RequirementsConfig {
                flows: Requirements::short_term_financing().flows().to_vec(),
            },
            logging: LoggingConfig::default(),
        }
    }
}
