//! Command-line interface.
//!
//! Defines the CLI structure for the cashladder binary using `clap` and the
//! handlers behind each subcommand.

pub mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::report;
use crate::sensitivity::SensitivityReport;
use crate::solver::HighsSolver;

/// Short-term cash-flow financing planner
#[derive(Parser, Debug)]
#[command(name = "cashladder")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the cashladder CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and solve the configured financing plan
    Solve(SolveArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Path to a TOML configuration (uses the built-in six-month ladder when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also compute and print the sensitivity report
    #[arg(long)]
    pub sensitivity: bool,
}

/// Subcommands for `cashladder config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write the default configuration to a file
    Init(ConfigInitArgs),
    /// Display the effective configuration
    Show(ConfigPathArg),
    /// Validate a configuration file
    Validate(ConfigPathArg),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the configuration
    #[arg(long, default_value = "cashladder.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to a TOML configuration (uses the built-in six-month ladder when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Dispatch a parsed CLI invocation.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Solve(args) => solve(&args),
        Commands::Config(ConfigCommand::Init(args)) => config_init(&args),
        Commands::Config(ConfigCommand::Show(args)) => config_show(&args),
        Commands::Config(ConfigCommand::Validate(args)) => config_validate(&args),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn solve(args: &SolveArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    config.logging.init();

    let ladder = config.to_ladder()?;
    let requirements = config.to_requirements();
    let solver = HighsSolver::new();

    let plan = ladder.solve(&requirements, &solver)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Plan");
    output::lines(&report::plan_table(&plan));
    output::field("terminal balance", format!("{:.2}", plan.terminal_balance()));
    output::json_payload("plan", report::plan_json(&plan));

    if args.sensitivity {
        let sensitivity = SensitivityReport::analyze(&ladder, &requirements, &solver, &plan)?;

        output::section("Constraint sensitivity");
        output::lines(&report::constraint_table(&sensitivity));
        output::section("Variable sensitivity");
        output::lines(&report::variable_table(&sensitivity));
        output::json_payload("sensitivity", report::sensitivity_json(&sensitivity));
    }

    output::success("solved to optimality");
    Ok(())
}

fn config_init(args: &ConfigInitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!(
                "{} already exists, pass --force to overwrite",
                args.path.display()
            ),
        )
        .into());
    }

    let config = Config::default();
    std::fs::write(&args.path, config.to_toml()?)?;

    output::success(&format!("wrote {}", args.path.display()));
    output::json_payload(
        "config_init",
        serde_json::json!({ "path": args.path.display().to_string() }),
    );
    Ok(())
}

fn config_show(args: &ConfigPathArg) -> Result<()> {
    let config = load_config(args.config.as_ref())?;

    if output::is_json() {
        output::json_payload("config", serde_json::to_value(&config)?);
        return Ok(());
    }

    output::lines(&config.to_toml()?);
    Ok(())
}

fn config_validate(args: &ConfigPathArg) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    config.validate()?;

    output::success("configuration is valid");
    output::json_payload("config_validate", serde_json::json!({ "valid": true }));
    Ok(())
}
