//! CLI definition and dispatch for the setup launcher.
//!
//! The launcher is a thin collaborator around the setup core: it reads the
//! job and policy from an INI file, registers the built-in sample algorithm
//! as the module under test, runs one setup attempt, and reports the
//! outcome. Exit codes: 1 I/O, 2 config, 3 load, 4 setup failure.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::buy_hold_algorithm::BuyHoldAlgorithm;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{parse_date, validate_job_config};
use crate::domain::error::AlgoprepError;
use crate::domain::job::{AccountTier, JobDescriptor, JobKind};
use crate::domain::loader::AlgorithmModule;
use crate::domain::setup::{SetupAttempt, SetupPolicy, run_setup};
use crate::ports::config_port::ConfigPort;
use crate::ports::order_port::{OrderIntent, OrderProcessor};

#[derive(Parser, Debug)]
#[command(name = "algoprep", about = "Backtest setup runner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a setup attempt for the built-in sample algorithm
    Setup {
        #[arg(short, long)]
        config: PathBuf,
        /// Validate and print the resolved job and policy without running
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a job/policy configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Setup { config, dry_run } => run_setup_command(&config, dry_run),
        Command::Validate { config } => run_validate(&config),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            if let AlgoprepError::SetupFailed { diagnostics } = &err {
                for diag in diagnostics {
                    eprintln!("  - {diag}");
                }
            }
            ExitCode::from(&err)
        }
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, AlgoprepError> {
    FileConfigAdapter::from_file(path).map_err(|e| AlgoprepError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Build a job descriptor from the `[job]` config section. Call
/// [`validate_job_config`] first; this only fails on malformed dates.
pub fn build_job_descriptor(config: &dyn ConfigPort) -> Result<JobDescriptor, AlgoprepError> {
    let kind = match config.get_string("job", "kind").map(|s| s.to_lowercase()).as_deref() {
        Some("live") => JobKind::Live,
        _ => JobKind::Backtest,
    };
    let start_date = match config.get_string("job", "start_date") {
        Some(s) => Some(parse_date(&s, "start_date")?),
        None => None,
    };
    let end_date = match config.get_string("job", "end_date") {
        Some(s) => parse_date(&s, "end_date")?,
        None => {
            return Err(AlgoprepError::ConfigMissing {
                section: "job".to_string(),
                key: "end_date".to_string(),
            });
        }
    };
    let tier = match config.get_string("job", "tier").map(|s| s.to_lowercase()).as_deref() {
        Some("paid") => AccountTier::Paid,
        _ => AccountTier::Free,
    };

    Ok(JobDescriptor {
        kind,
        start_date,
        end_date,
        user_id: config.get_int("job", "user_id", 0) as u64,
        project_id: config.get_int("job", "project_id", 0) as u64,
        tier,
        metadata: Default::default(),
    })
}

/// The sample module the launcher loads from: one BuyHoldAlgorithm with
/// symbols taken from the `[algorithm]` section.
pub fn sample_module(config: &dyn ConfigPort) -> AlgorithmModule {
    let symbols: Vec<String> = config
        .get_string("algorithm", "symbols")
        .unwrap_or_else(|| "SPY".to_string())
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut module = AlgorithmModule::new("builtin:buy-hold");
    module.register("BuyHoldAlgorithm", move || {
        Ok(Box::new(BuyHoldAlgorithm::new().with_symbols(symbols.clone())))
    });
    module
}

struct LogOrderProcessor;

impl OrderProcessor for LogOrderProcessor {
    fn enqueue(&self, intent: OrderIntent) {
        log::info!("order received: {} x{}", intent.symbol, intent.quantity);
    }
}

/// Load config, run one setup attempt, and print the result. Exposed for
/// integration tests.
pub fn execute_setup(config: &FileConfigAdapter) -> Result<SetupAttempt, AlgoprepError> {
    validate_job_config(config)?;
    let job = build_job_descriptor(config)?;
    let policy = SetupPolicy::from_config(config)?;
    let module = sample_module(config);
    Ok(run_setup(
        &job,
        &module,
        Arc::new(LogOrderProcessor),
        None,
        &policy,
    ))
}

fn run_setup_command(config_path: &Path, dry_run: bool) -> Result<(), AlgoprepError> {
    let config = load_config(config_path)?;

    if dry_run {
        validate_job_config(&config)?;
        let job = build_job_descriptor(&config)?;
        let policy = SetupPolicy::from_config(&config)?;
        println!("Config OK: {}", config_path.display());
        println!("  job: {job:?}");
        println!("  policy: {policy:?}");
        return Ok(());
    }

    let attempt = execute_setup(&config)?;
    let result = &attempt.result;
    if result.success {
        println!("Setup succeeded");
        println!("  runtime budget:   {:?}", result.runtime_budget);
        println!("  starting capital: {:.2}", result.starting_capital);
        match result.max_orders {
            Some(max) => println!("  max orders:       {max}"),
            None => println!("  max orders:       unbounded"),
        }
        println!("  effective start:  {}", result.effective_start);
        Ok(())
    } else {
        Err(AlgoprepError::SetupFailed {
            diagnostics: result.diagnostics.clone(),
        })
    }
}

fn run_validate(config_path: &Path) -> Result<(), AlgoprepError> {
    let config = load_config(config_path)?;
    validate_job_config(&config)?;
    SetupPolicy::from_config(&config)?;
    println!("Config OK: {}", config_path.display());
    Ok(())
}
