//! Core domain types and logic.

pub mod price;
pub mod distribution;
pub mod stats;
pub mod sampler;
pub mod simulator;
pub mod cache;
pub mod simulation;
pub mod chart_data;
pub mod config_validation;
pub mod error;
