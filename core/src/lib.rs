//! Core of the cafe operations manual: baseline content, the state store
//! that reconciles it with stored overrides, and the command dispatcher.

pub mod baseline;
pub mod cli;
pub mod clock;
pub mod command;
pub mod config;
pub mod data;
pub mod help;
pub mod storage;
pub mod store;
pub mod sys;
pub mod types;
