#![allow(dead_code)]

use algoprep::domain::asset::{AssetClass, CashBalance, InstrumentLimits, Subscription};
use algoprep::domain::error::AlgorithmFault;
use algoprep::domain::loader::AlgorithmModule;
use algoprep::ports::algorithm_port::Algorithm;
use algoprep::ports::order_port::{OrderIntent, OrderProcessor};
use algoprep::ports::report_port::ResultReporter;
use chrono::NaiveDate;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Order processor that records everything it receives.
pub struct RecordingOrderProcessor {
    pub received: Mutex<Vec<OrderIntent>>,
}

impl RecordingOrderProcessor {
    pub fn new() -> Self {
        RecordingOrderProcessor {
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl OrderProcessor for RecordingOrderProcessor {
    fn enqueue(&self, intent: OrderIntent) {
        self.received.lock().unwrap().push(intent);
    }
}

/// Reporter that counts invocations; the backtest setup variant must never
/// call it.
pub struct CountingReporter {
    pub calls: AtomicUsize,
}

impl CountingReporter {
    pub fn new() -> Self {
        CountingReporter {
            calls: AtomicUsize::new(0),
        }
    }
}

impl ResultReporter for CountingReporter {
    fn report_diagnostics(&self, _messages: &[String]) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// How a [`ScriptedAlgorithm`]'s initialize behaves.
#[derive(Clone)]
pub enum InitScript {
    /// Subscribe to `subscriptions` equities and fund the given balances.
    Succeed {
        subscriptions: usize,
        cash: Vec<CashBalance>,
    },
    /// Fund the balances, then fault with the message.
    FundThenFail {
        cash: Vec<CashBalance>,
        message: String,
    },
    /// Panic with the message.
    Panic { message: String },
    /// Sleep for the duration, then succeed with one subscription.
    Sleep { duration: Duration },
}

pub struct ScriptedAlgorithm {
    script: InitScript,
    subscriptions: Vec<Subscription>,
    cash: Vec<CashBalance>,
    max_orders: Option<u64>,
    live_mode: bool,
    clock: Option<NaiveDate>,
}

impl ScriptedAlgorithm {
    pub fn new(script: InitScript) -> Self {
        ScriptedAlgorithm {
            script,
            subscriptions: Vec::new(),
            cash: Vec::new(),
            max_orders: None,
            live_mode: true,
            clock: None,
        }
    }
}

impl Algorithm for ScriptedAlgorithm {
    fn name(&self) -> &str {
        "ScriptedAlgorithm"
    }

    fn initialize(&mut self) -> Result<(), AlgorithmFault> {
        match self.script.clone() {
            InitScript::Succeed {
                subscriptions,
                cash,
            } => {
                for i in 0..subscriptions {
                    self.subscriptions
                        .push(Subscription::new(format!("SYM{i}"), AssetClass::Equity));
                }
                self.cash = cash;
                Ok(())
            }
            InitScript::FundThenFail { cash, message } => {
                self.cash = cash;
                Err(AlgorithmFault::new(message))
            }
            InitScript::Panic { message } => panic!("{}", message),
            InitScript::Sleep { duration } => {
                thread::sleep(duration);
                self.subscriptions
                    .push(Subscription::new("SYM0", AssetClass::Equity));
                Ok(())
            }
        }
    }

    fn set_live_mode(&mut self, live: bool) {
        self.live_mode = live;
    }

    fn set_instrument_limits(&mut self, _limits: InstrumentLimits) {}

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

/// A one-candidate module producing [`ScriptedAlgorithm`]s, plus a counter
/// of factory invocations.
pub fn scripted_module(script: InitScript) -> (AlgorithmModule, Arc<AtomicUsize>) {
    let factory_calls = Arc::new(AtomicUsize::new(0));
    let mut module = AlgorithmModule::new("scripted.bin");
    {
        let factory_calls = Arc::clone(&factory_calls);
        module.register("ScriptedAlgorithm", move || {
            factory_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedAlgorithm::new(script.clone())))
        });
    }
    (module, factory_calls)
}

pub fn usd(amount: f64) -> Vec<CashBalance> {
    vec![CashBalance::new("USD", amount)]
}
