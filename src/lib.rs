//! Personal work-hour and wage ledger.
//!
//! This crate records work sessions, month-level hour totals and an
//! effective-dated hourly rate history, and derives monthly, yearly and
//! evaluation-cycle figures from them. The evaluation cycle restarts itself
//! once its hour target is reached.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;
