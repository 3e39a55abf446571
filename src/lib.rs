//! algoprep — prepares user-supplied trading algorithms for backtest runs.
//!
//! Hexagonal architecture: core logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
