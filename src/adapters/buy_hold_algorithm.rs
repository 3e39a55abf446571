//! A small buy-and-hold algorithm used by the launcher demo and tests.
//!
//! Plays the role of user-supplied strategy code: it subscribes to a set of
//! symbols and funds the account during `initialize`. Deliberately boring;
//! the interesting behavior lives in the setup pipeline around it.

use crate::domain::asset::{AssetClass, CashBalance, InstrumentLimits, Subscription};
use crate::domain::error::AlgorithmFault;
use crate::ports::algorithm_port::Algorithm;
use chrono::NaiveDate;

pub struct BuyHoldAlgorithm {
    symbols: Vec<String>,
    starting_cash: Vec<CashBalance>,
    subscriptions: Vec<Subscription>,
    cash: Vec<CashBalance>,
    live_mode: bool,
    limits: InstrumentLimits,
    clock: Option<NaiveDate>,
    max_orders: Option<u64>,
    initialized: bool,
}

impl BuyHoldAlgorithm {
    /// Buy-and-hold on SPY with 100k USD.
    pub fn new() -> Self {
        BuyHoldAlgorithm {
            symbols: vec!["SPY".to_string()],
            starting_cash: vec![CashBalance::new("USD", 100_000.0)],
            subscriptions: Vec::new(),
            cash: Vec::new(),
            live_mode: true,
            limits: InstrumentLimits::default(),
            clock: None,
            max_orders: None,
            initialized: false,
        }
    }

    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_cash_balance(mut self, balance: CashBalance) -> Self {
        self.starting_cash.push(balance);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn clock(&self) -> Option<NaiveDate> {
        self.clock
    }

    pub fn max_orders(&self) -> Option<u64> {
        self.max_orders
    }

    pub fn limits(&self) -> &InstrumentLimits {
        &self.limits
    }

    pub fn is_live(&self) -> bool {
        self.live_mode
    }
}

impl Default for BuyHoldAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for BuyHoldAlgorithm {
    fn name(&self) -> &str {
        "BuyHoldAlgorithm"
    }

    fn initialize(&mut self) -> Result<(), AlgorithmFault> {
        if self.symbols.is_empty() {
            return Err(AlgorithmFault::new("no symbols configured"));
        }
        for symbol in &self.symbols {
            self.subscriptions
                .push(Subscription::new(symbol.clone(), AssetClass::Equity));
        }
        self.cash = self.starting_cash.clone();
        self.initialized = true;
        Ok(())
    }

    fn set_live_mode(&mut self, live: bool) {
        self.live_mode = live;
    }

    fn set_instrument_limits(&mut self, limits: InstrumentLimits) {
        self.limits = limits;
    }

    fn set_clock(&mut self, date: NaiveDate) {
        self.clock = Some(date);
    }

    fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    fn add_subscription(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    fn cash_balances(&self) -> Vec<CashBalance> {
        self.cash.clone()
    }

    fn total_cash(&self) -> f64 {
        self.cash.iter().map(|c| c.amount).sum()
    }

    fn set_max_orders(&mut self, max_orders: Option<u64>) {
        self.max_orders = max_orders;
    }
}
