//! Algorithm port trait: the narrow surface the setup core needs from
//! user-supplied strategy logic.
//!
//! Implementations are treated as untrusted for timing purposes; every call
//! that runs user code is made through the deadline-bounded executor.

use crate::domain::asset::{AssetClass, CashBalance, InstrumentLimits, Subscription};
use crate::domain::error::AlgorithmFault;
use chrono::NaiveDate;

pub trait Algorithm: Send {
    /// Human-readable algorithm name, used in logs.
    fn name(&self) -> &str;

    /// The algorithm's own initialization routine. User code; may fault.
    fn initialize(&mut self) -> Result<(), AlgorithmFault>;

    /// Mark the algorithm as live or simulated.
    fn set_live_mode(&mut self, live: bool);

    /// Apply instrument capacity limits before initialization runs.
    fn set_instrument_limits(&mut self, limits: InstrumentLimits);

    /// Set the simulated current time.
    fn set_clock(&mut self, date: NaiveDate);

    /// Data subscriptions currently held.
    fn subscriptions(&self) -> &[Subscription];

    /// Add a data subscription (used for baseline currency feeds).
    fn add_subscription(&mut self, subscription: Subscription);

    /// Cash balances currently held, one per currency.
    fn cash_balances(&self) -> Vec<CashBalance>;

    /// Account base currency. Cash in this currency needs no feed.
    fn base_currency(&self) -> &str {
        "USD"
    }

    /// Total cash across all balances, in the base currency.
    fn total_cash(&self) -> f64;

    /// Push the permitted order count into the algorithm so it can
    /// self-enforce. `None` means unbounded.
    fn set_max_orders(&mut self, max_orders: Option<u64>);

    fn subscription_count(&self) -> usize {
        self.subscriptions().len()
    }

    /// Whether a conversion feed already exists for `currency`.
    fn has_currency_feed(&self, currency: &str) -> bool {
        self.subscriptions()
            .iter()
            .any(|s| s.class == AssetClass::Forex && s.symbol.starts_with(currency))
    }
}

impl std::fmt::Debug for dyn Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Algorithm")
            .field("name", &self.name())
            .field("subscription_count", &self.subscription_count())
            .finish()
    }
}
