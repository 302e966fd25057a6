//! Persistence boundary for the wage ledger.
//!
//! The calculation core only ever reads snapshots through [`LedgerStore`]; the
//! single write it triggers is [`LedgerStore::write_cycle_start`]. The record
//! management operations exist for the API layer.

mod memory;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::models::{
    ClockTime, HourlyRate, MonthlyAggregate, Settings, SettingsUpdate, WorkSession, YearMonth,
};

pub use memory::{LedgerSnapshot, MemoryStore};

/// Fields supplied when creating or replacing a work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInput {
    /// The calendar day worked.
    pub date: NaiveDate,
    /// Clock-in time.
    pub start_time: ClockTime,
    /// Clock-out time.
    pub end_time: ClockTime,
    /// Unpaid break minutes.
    pub break_minutes: u32,
    /// Optional note.
    pub note: Option<String>,
}

/// Fields supplied when upserting a monthly aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateInput {
    /// The month covered; the upsert key.
    pub period: YearMonth,
    /// Total worked minutes for the month.
    pub total_minutes: u32,
    /// Optional note.
    pub note: Option<String>,
}

/// Fields supplied when creating or replacing a rate history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateInput {
    /// Currency units per hour.
    pub rate: Decimal,
    /// First day the rate applies.
    pub effective_from: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// Read and write access to the ledger's records.
///
/// Implementations must be shareable across request handlers. Each method is
/// a blocking call that either succeeds or fails as a whole.
pub trait LedgerStore: Send + Sync {
    /// Sessions dated within `period`, oldest first.
    fn sessions_in_month(&self, period: YearMonth) -> LedgerResult<Vec<WorkSession>>;

    /// Sessions whose date at midnight is not before `since`, oldest first.
    fn sessions_since(&self, since: NaiveDateTime) -> LedgerResult<Vec<WorkSession>>;

    /// Every stored session.
    fn all_sessions(&self) -> LedgerResult<Vec<WorkSession>>;

    /// The `limit` most recent sessions, newest first.
    fn recent_sessions(&self, limit: usize) -> LedgerResult<Vec<WorkSession>>;

    /// The aggregate recorded for `period`, if any.
    fn aggregate_for_month(&self, period: YearMonth) -> LedgerResult<Option<MonthlyAggregate>>;

    /// Aggregates for `period` and every later month.
    fn aggregates_since(&self, period: YearMonth) -> LedgerResult<Vec<MonthlyAggregate>>;

    /// Every stored aggregate.
    fn all_aggregates(&self) -> LedgerResult<Vec<MonthlyAggregate>>;

    /// The full rate history, in no guaranteed order.
    fn rate_history(&self) -> LedgerResult<Vec<HourlyRate>>;

    /// The settings record, created with defaults and `now` as cycle start if absent.
    fn settings_or_init(&self, now: NaiveDateTime) -> LedgerResult<Settings>;

    /// Sets the cycle start, leaving every other settings field untouched.
    fn write_cycle_start(&self, start: NaiveDateTime) -> LedgerResult<Settings>;

    /// Applies a partial settings update, creating the record first if absent.
    fn update_settings(&self, update: &SettingsUpdate, now: NaiveDateTime)
    -> LedgerResult<Settings>;

    /// Stores a new session.
    fn create_session(&self, input: SessionInput) -> LedgerResult<WorkSession>;

    /// Replaces the fields of an existing session.
    fn update_session(&self, id: Uuid, input: SessionInput) -> LedgerResult<WorkSession>;

    /// Removes a session.
    fn delete_session(&self, id: Uuid) -> LedgerResult<()>;

    /// Creates the aggregate for a month or replaces the existing one.
    fn upsert_aggregate(&self, input: AggregateInput) -> LedgerResult<MonthlyAggregate>;

    /// Removes an aggregate.
    fn delete_aggregate(&self, id: Uuid) -> LedgerResult<()>;

    /// Appends a rate history entry.
    fn create_rate(&self, input: RateInput) -> LedgerResult<HourlyRate>;

    /// Replaces the fields of a rate entry, keeping its insertion sequence.
    fn update_rate(&self, id: Uuid, input: RateInput) -> LedgerResult<HourlyRate>;

    /// Removes a rate entry.
    fn delete_rate(&self, id: Uuid) -> LedgerResult<()>;
}
