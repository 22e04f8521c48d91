//! Core domain types and logic.

pub mod price_table;
pub mod ledger;
pub mod simulation;
pub mod strategy;
pub mod moving_average;
pub mod regression;
pub mod config_validation;
pub mod error;
