//! Core data models for the wage ledger.
//!
//! This module contains the stored records (sessions, monthly aggregates,
//! rate history, settings) and the computed summaries derived from them.

mod clock_time;
mod hourly_rate;
mod monthly_aggregate;
mod settings;
mod summary;
mod work_session;

pub use clock_time::{ClockTime, YearMonth};
pub use hourly_rate::{HourlyRate, MAX_HOURLY_RATE, validate_rate};
pub use monthly_aggregate::MonthlyAggregate;
pub use settings::{
    DEFAULT_EVALUATION_CYCLE_HOURS, DEFAULT_HOURLY_RATE, Settings, SettingsDefaults,
    SettingsUpdate,
};
pub use summary::{
    AnnualReport, Contribution, ContributionSource, CycleProgress, Dashboard, MINUTES_PER_HOUR,
    MonthlySummary, PeriodTotals, RecentSession, YearlySummary,
};
pub use work_session::WorkSession;
