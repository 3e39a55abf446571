//! Result reporting port trait.
//!
//! Accepted by the setup orchestrator for interface symmetry with other
//! setup variants (live trading), but not invoked by the backtest variant.

pub trait ResultReporter {
    fn report_diagnostics(&self, messages: &[String]);
}
