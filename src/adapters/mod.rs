//! Concrete implementations of the port traits.

pub mod buy_hold_algorithm;
pub mod file_config_adapter;
