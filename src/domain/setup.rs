//! Setup orchestration for one backtest attempt.
//!
//! Drives one attempt through `Start -> Loaded -> Initialized ->
//! Finalized`: validate the job descriptor, load the algorithm, run its
//! preparation sequence under a hard deadline, compute budgets, and wire the
//! execution collaborators. No step is retried; every fault is converted to
//! a diagnostic string and the attempt always ends in a definite verdict.

use crate::domain::asset::{AssetClass, InstrumentLimits, Subscription};
use crate::domain::budget::{BudgetPolicy, runtime_budget};
use crate::domain::deadline::{RunOutcome, run_with_deadline};
use crate::domain::error::AlgoprepError;
use crate::domain::execution::ExecutionSimulator;
use crate::domain::job::{AccountTier, JobDescriptor, JobKind};
use crate::domain::loader::{AlgorithmModule, load_algorithm};
use crate::ports::algorithm_port::Algorithm;
use crate::ports::config_port::ConfigPort;
use crate::ports::order_port::OrderProcessor;
use crate::ports::report_port::ResultReporter;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// Deadline for instantiating the algorithm from its module.
pub const DEFAULT_LOAD_DEADLINE: Duration = Duration::from_secs(15);

/// Deadline for the whole algorithm-preparation sequence.
pub const DEFAULT_INIT_DEADLINE: Duration = Duration::from_secs(10);

/// Order cap applied to free-tier accounts.
pub const FREE_TIER_MAX_ORDERS: u64 = 10_000;

/// Suffix appended to load-failure diagnostics.
pub const REBUILD_HINT: &str = " Try rebuilding the algorithm module.";

/// Fixed policy values governing one setup attempt. Both deadlines are
/// short guards independent of the computed runtime budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPolicy {
    pub load_deadline: Duration,
    pub init_deadline: Duration,
    pub limits: InstrumentLimits,
    pub budget: BudgetPolicy,
    pub free_tier_max_orders: u64,
}

impl Default for SetupPolicy {
    fn default() -> Self {
        SetupPolicy {
            load_deadline: DEFAULT_LOAD_DEADLINE,
            init_deadline: DEFAULT_INIT_DEADLINE,
            limits: InstrumentLimits::default(),
            budget: BudgetPolicy::default(),
            free_tier_max_orders: FREE_TIER_MAX_ORDERS,
        }
    }
}

impl SetupPolicy {
    /// Read policy values from the `[setup]`, `[limits]` and `[budget]`
    /// config sections, falling back to defaults for absent keys.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AlgoprepError> {
        let defaults = SetupPolicy::default();

        let load_secs = require_positive(
            config,
            "setup",
            "load_deadline_secs",
            defaults.load_deadline.as_secs() as i64,
        )?;
        let init_secs = require_positive(
            config,
            "setup",
            "init_deadline_secs",
            defaults.init_deadline.as_secs() as i64,
        )?;
        let max_orders = require_positive(
            config,
            "setup",
            "free_tier_max_orders",
            defaults.free_tier_max_orders as i64,
        )?;

        let limits = InstrumentLimits {
            total: require_positive(config, "limits", "total", defaults.limits.total as i64)?
                as usize,
            equity: require_positive(config, "limits", "equity", defaults.limits.equity as i64)?
                as usize,
            forex: require_positive(config, "limits", "forex", defaults.limits.forex as i64)?
                as usize,
            crypto: require_positive(config, "limits", "crypto", defaults.limits.crypto as i64)?
                as usize,
        };

        // 0 or absent disables the override.
        let override_secs = config.get_int("budget", "fixed_override_secs", 0);
        if override_secs < 0 {
            return Err(AlgoprepError::ConfigInvalid {
                section: "budget".to_string(),
                key: "fixed_override_secs".to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        let budget = BudgetPolicy {
            fixed_override: (override_secs > 0)
                .then(|| Duration::from_secs(override_secs as u64)),
        };

        Ok(SetupPolicy {
            load_deadline: Duration::from_secs(load_secs as u64),
            init_deadline: Duration::from_secs(init_secs as u64),
            limits,
            budget,
            free_tier_max_orders: max_orders as u64,
        })
    }
}

fn require_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, AlgoprepError> {
    let value = config.get_int(section, key, default);
    if value <= 0 {
        return Err(AlgoprepError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(value)
}

/// The final state exposed after a setup attempt. Immutable once produced.
///
/// `success` is true iff every bounded phase completed and `diagnostics`
/// is empty. `max_orders` of `None` means unbounded (paid tier); budget and
/// capital fields keep their defaults when the attempt fails before they
/// are computed.
#[derive(Debug, Clone)]
pub struct SetupResult {
    pub success: bool,
    pub diagnostics: Vec<String>,
    pub runtime_budget: Duration,
    pub starting_capital: f64,
    pub max_orders: Option<u64>,
    pub effective_start: NaiveDate,
}

/// Everything a setup attempt hands back to the caller: the verdict plus,
/// when the attempt got far enough, the initialized algorithm and the wired
/// execution simulator.
#[derive(Debug)]
pub struct SetupAttempt {
    pub result: SetupResult,
    pub algorithm: Option<Box<dyn Algorithm>>,
    pub simulator: Option<ExecutionSimulator>,
}

impl SetupAttempt {
    fn failure(diagnostics: Vec<String>, effective_start: NaiveDate) -> Self {
        SetupAttempt {
            result: SetupResult {
                success: false,
                diagnostics,
                runtime_budget: Duration::ZERO,
                starting_capital: 0.0,
                max_orders: None,
                effective_start,
            },
            algorithm: None,
            simulator: None,
        }
    }
}

/// Run one setup attempt.
///
/// The algorithm is loaded from `module` only after the descriptor passes
/// validation. `reporter` is accepted for interface symmetry with other
/// setup variants and is not invoked here.
pub fn run_setup(
    job: &JobDescriptor,
    module: &AlgorithmModule,
    order_processor: Arc<dyn OrderProcessor>,
    _reporter: Option<&dyn ResultReporter>,
    policy: &SetupPolicy,
) -> SetupAttempt {
    log::info!(
        "preparing backtest for project {} (user {})",
        job.project_id,
        job.user_id
    );

    // Start -> Loaded: descriptor validation, before any loading.
    if job.kind != JobKind::Backtest {
        let diag = format!(
            "invalid job kind {:?}: backtest setup requires a backtest job",
            job.kind
        );
        log::warn!("{diag}");
        return SetupAttempt::failure(vec![diag], NaiveDate::default());
    }
    let Some(start_date) = job.start_date else {
        let diag = "job start date is unset; cannot begin backtest setup".to_string();
        log::warn!("{diag}");
        return SetupAttempt::failure(vec![diag], NaiveDate::default());
    };

    let algorithm = match load_algorithm(module, policy.load_deadline) {
        Ok(algorithm) => algorithm,
        Err(err) => {
            let diag = format!("{err}{REBUILD_HINT}");
            log::warn!("{diag}");
            return SetupAttempt::failure(vec![diag], start_date);
        }
    };
    log::info!("loaded algorithm '{}' from '{}'", algorithm.name(), module.source());

    // Loaded -> Initialized: the whole preparation sequence is one bounded
    // unit. A fault from the algorithm's own initialize skips the steps
    // after it within the same run.
    let limits = policy.limits.clone();
    let work = move || {
        let mut algorithm = algorithm;
        let mut diagnostics = Vec::new();
        algorithm.set_live_mode(false);
        algorithm.set_instrument_limits(limits);
        algorithm.set_clock(start_date);
        match algorithm.initialize() {
            Ok(()) => ensure_currency_feeds(algorithm.as_mut()),
            Err(fault) => diagnostics.push(format!("failed to initialize algorithm: {fault}")),
        }
        (algorithm, diagnostics)
    };

    let (mut algorithm, diagnostics) = match run_with_deadline(work, policy.init_deadline) {
        RunOutcome::Completed(Ok((algorithm, diagnostics))) => (algorithm, diagnostics),
        RunOutcome::Completed(Err(fault)) => {
            let diag = format!("failed to initialize algorithm: {fault}");
            log::warn!("{diag}");
            return SetupAttempt::failure(vec![diag], start_date);
        }
        RunOutcome::Expired => {
            let diag = format!(
                "algorithm initialization timed out after {:?}",
                policy.init_deadline
            );
            log::warn!("{diag}");
            return SetupAttempt::failure(vec![diag], start_date);
        }
    };

    // Initialized -> Finalized: collaborator wiring and budget computation
    // run whenever the bounded phase completed, so partial state stays
    // inspectable even when an initialization diagnostic forces failure.
    let mut simulator = ExecutionSimulator::for_algorithm(algorithm.as_ref());
    simulator.apply_default_fee_models();
    simulator.register_order_processor(order_processor);

    let mut budget = runtime_budget(
        start_date,
        job.end_date,
        algorithm.subscription_count(),
        job.tier,
        &policy.budget,
    );
    let starting_capital = algorithm.total_cash();
    let max_orders = match job.tier {
        AccountTier::Free => Some(policy.free_tier_max_orders),
        AccountTier::Paid => {
            // Unbounded orders also double the runtime budget once more, on
            // top of the tier doubling inside the budget formula. The fixed
            // override is final and skips this too.
            if policy.budget.fixed_override.is_none() {
                budget += budget;
            }
            None
        }
    };
    algorithm.set_max_orders(max_orders);

    let success = diagnostics.is_empty();
    if success {
        log::info!(
            "setup complete: budget {:?}, capital {:.2}, subscriptions {}",
            budget,
            starting_capital,
            algorithm.subscription_count()
        );
    } else {
        log::warn!("setup failed with {} diagnostic(s)", diagnostics.len());
    }

    SetupAttempt {
        result: SetupResult {
            success,
            diagnostics,
            runtime_budget: budget,
            starting_capital,
            max_orders,
            effective_start: start_date,
        },
        algorithm: Some(algorithm),
        simulator: Some(simulator),
    }
}

/// Ensure a baseline conversion feed exists for every cash balance outside
/// the account's base currency.
fn ensure_currency_feeds(algorithm: &mut dyn Algorithm) {
    let base = algorithm.base_currency().to_string();
    for cash in algorithm.cash_balances() {
        if cash.currency == base || algorithm.has_currency_feed(&cash.currency) {
            continue;
        }
        let symbol = format!("{}{}", cash.currency, base);
        log::debug!("adding baseline currency feed {symbol}");
        algorithm.add_subscription(Subscription::new(symbol, AssetClass::Forex));
    }
}
