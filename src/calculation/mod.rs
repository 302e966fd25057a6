//! Calculation logic for the wage ledger.
//!
//! This module contains the pure core: net minutes per session, effective-dated
//! rate resolution, the aggregation rules that fold sessions and monthly
//! aggregates into monthly, cycle and yearly totals, and the evaluation cycle
//! check. Nothing here touches storage.

mod aggregator;
mod cycle;
mod duration;
mod rate_resolver;

pub use aggregator::{
    aggregate_contribution, annual_report, monthly_summary, session_contribution,
    wage_for_minutes,
};
pub use cycle::{
    aggregate_in_cycle, cycle_progress, cycle_totals, session_in_cycle, should_reset_cycle,
};
pub use duration::net_minutes;
pub use rate_resolver::{RateEntry, RateHistory, rate_for_date};
