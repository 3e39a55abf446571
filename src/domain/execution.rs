//! Execution-side collaborator wiring: the simulator that will receive
//! orders from the algorithm during the backtest, plus per-asset-class
//! execution-cost models.
//!
//! The setup core only constructs and wires this component; order matching
//! and filling belong to the excluded execution subsystem.

use crate::domain::asset::AssetClass;
use crate::ports::algorithm_port::Algorithm;
use crate::ports::order_port::{OrderIntent, OrderProcessor};
use std::collections::HashMap;
use std::sync::Arc;

/// Execution-cost model for one asset class: flat fee per order plus a
/// percentage of order value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeModel {
    pub per_order: f64,
    pub pct: f64,
}

impl FeeModel {
    pub fn free() -> Self {
        FeeModel {
            per_order: 0.0,
            pct: 0.0,
        }
    }

    /// Fee charged on an order of `order_value`: per_order + value * pct / 100.
    pub fn fee(&self, order_value: f64) -> f64 {
        self.per_order + (order_value * self.pct / 100.0)
    }
}

/// Default cost model per asset class.
pub fn default_fee_model(class: AssetClass) -> FeeModel {
    match class {
        AssetClass::Equity => FeeModel {
            per_order: 5.0,
            pct: 0.0,
        },
        AssetClass::Forex => FeeModel {
            per_order: 0.0,
            pct: 0.002,
        },
        AssetClass::Crypto => FeeModel {
            per_order: 0.0,
            pct: 0.1,
        },
    }
}

/// The component that will receive orders from the algorithm and simulate
/// their execution, bound to one algorithm for one backtest run.
pub struct ExecutionSimulator {
    algorithm_name: String,
    account_currency: String,
    fee_models: HashMap<AssetClass, FeeModel>,
    order_processor: Option<Arc<dyn OrderProcessor>>,
}

impl ExecutionSimulator {
    /// Construct a simulator bound to `algorithm`. Cost models start empty;
    /// the orchestrator applies defaults as a separate wiring step.
    pub fn for_algorithm(algorithm: &dyn Algorithm) -> Self {
        ExecutionSimulator {
            algorithm_name: algorithm.name().to_string(),
            account_currency: algorithm.base_currency().to_string(),
            fee_models: HashMap::new(),
            order_processor: None,
        }
    }

    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    pub fn account_currency(&self) -> &str {
        &self.account_currency
    }

    /// Install the default cost model for every asset class.
    pub fn apply_default_fee_models(&mut self) {
        for class in [AssetClass::Equity, AssetClass::Forex, AssetClass::Crypto] {
            self.fee_models.insert(class, default_fee_model(class));
        }
    }

    pub fn set_fee_model(&mut self, class: AssetClass, model: FeeModel) {
        self.fee_models.insert(class, model);
    }

    pub fn fee_model(&self, class: AssetClass) -> Option<&FeeModel> {
        self.fee_models.get(&class)
    }

    /// Register the caller-supplied order-processing collaborator.
    pub fn register_order_processor(&mut self, processor: Arc<dyn OrderProcessor>) {
        self.order_processor = Some(processor);
    }

    pub fn has_order_processor(&self) -> bool {
        self.order_processor.is_some()
    }

    /// Hand an order to the registered processor and return the fee its
    /// asset-class cost model charges on `notional`. Orders submitted before
    /// a processor is registered are dropped.
    pub fn submit(&self, intent: OrderIntent, notional: f64) -> f64 {
        let fee = self
            .fee_models
            .get(&intent.class)
            .map(|model| model.fee(notional))
            .unwrap_or(0.0);
        match &self.order_processor {
            Some(processor) => processor.enqueue(intent),
            None => log::warn!(
                "order for {} dropped: no order processor registered",
                intent.symbol
            ),
        }
        fee
    }
}

impl std::fmt::Debug for ExecutionSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionSimulator")
            .field("algorithm_name", &self.algorithm_name)
            .field("account_currency", &self.account_currency)
            .field("fee_models", &self.fee_models)
            .field("has_order_processor", &self.order_processor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::{CashBalance, InstrumentLimits, Subscription};
    use crate::domain::error::AlgorithmFault;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct StubAlgorithm;

    impl Algorithm for StubAlgorithm {
        fn name(&self) -> &str {
            "StubAlgorithm"
        }
        fn initialize(&mut self) -> Result<(), AlgorithmFault> {
            Ok(())
        }
        fn set_live_mode(&mut self, _live: bool) {}
        fn set_instrument_limits(&mut self, _limits: InstrumentLimits) {}
        fn set_clock(&mut self, _date: NaiveDate) {}
        fn subscriptions(&self) -> &[Subscription] {
            &[]
        }
        fn add_subscription(&mut self, _subscription: Subscription) {}
        fn cash_balances(&self) -> Vec<CashBalance> {
            Vec::new()
        }
        fn total_cash(&self) -> f64 {
            0.0
        }
        fn set_max_orders(&mut self, _max_orders: Option<u64>) {}
    }

    struct RecordingProcessor {
        received: Mutex<Vec<OrderIntent>>,
    }

    impl RecordingProcessor {
        fn new() -> Self {
            RecordingProcessor {
                received: Mutex::new(Vec::new()),
            }
        }
    }

    impl OrderProcessor for RecordingProcessor {
        fn enqueue(&self, intent: OrderIntent) {
            self.received.lock().unwrap().push(intent);
        }
    }

    #[test]
    fn fee_is_flat_plus_percentage() {
        let model = FeeModel {
            per_order: 10.0,
            pct: 0.1,
        };
        let expected = 10.0 + (10_000.0 * 0.1 / 100.0);
        assert!((model.fee(10_000.0) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn free_model_charges_nothing() {
        assert!((FeeModel::free().fee(50_000.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn simulator_binds_to_algorithm() {
        let sim = ExecutionSimulator::for_algorithm(&StubAlgorithm);
        assert_eq!(sim.algorithm_name(), "StubAlgorithm");
        assert_eq!(sim.account_currency(), "USD");
        assert!(!sim.has_order_processor());
    }

    #[test]
    fn defaults_cover_every_asset_class() {
        let mut sim = ExecutionSimulator::for_algorithm(&StubAlgorithm);
        assert!(sim.fee_model(AssetClass::Equity).is_none());

        sim.apply_default_fee_models();
        for class in [AssetClass::Equity, AssetClass::Forex, AssetClass::Crypto] {
            assert_eq!(sim.fee_model(class), Some(&default_fee_model(class)));
        }
    }

    #[test]
    fn submit_forwards_to_registered_processor() {
        let mut sim = ExecutionSimulator::for_algorithm(&StubAlgorithm);
        sim.apply_default_fee_models();
        let processor = Arc::new(RecordingProcessor::new());
        sim.register_order_processor(processor.clone());

        let fee = sim.submit(
            OrderIntent {
                symbol: "SPY".to_string(),
                class: AssetClass::Equity,
                quantity: 100,
            },
            40_000.0,
        );

        assert!((fee - 5.0).abs() < f64::EPSILON);
        let received = processor.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].symbol, "SPY");
    }

    #[test]
    fn submit_without_processor_drops_order() {
        let sim = ExecutionSimulator::for_algorithm(&StubAlgorithm);
        let fee = sim.submit(
            OrderIntent {
                symbol: "SPY".to_string(),
                class: AssetClass::Equity,
                quantity: 1,
            },
            100.0,
        );
        // No model installed either, so the fee is zero.
        assert!(fee.abs() < f64::EPSILON);
    }

    #[test]
    fn custom_model_overrides_default() {
        let mut sim = ExecutionSimulator::for_algorithm(&StubAlgorithm);
        sim.apply_default_fee_models();
        sim.set_fee_model(AssetClass::Equity, FeeModel::free());
        assert_eq!(sim.fee_model(AssetClass::Equity), Some(&FeeModel::free()));
    }
}
