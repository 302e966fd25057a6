//! Evaluation cycle accumulation and the auto-reset check.
//!
//! The cycle has a single state variable, the settings' `cycle_start`. These
//! functions only compute; issuing the reset write is the caller's job.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;

use crate::models::{
    CycleProgress, MonthlyAggregate, PeriodTotals, Settings, WorkSession, YearMonth,
};

use super::aggregator::{aggregate_contribution, session_contribution};
use super::rate_resolver::RateHistory;

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Whether a session dated `date` counts toward a cycle started at `cycle_start`.
///
/// The session is taken to start at midnight of its date, so sessions on the
/// day of a mid-day reset belong to the previous cycle.
pub fn session_in_cycle(date: NaiveDate, cycle_start: NaiveDateTime) -> bool {
    let start_day = cycle_start.date();
    let starts_at_midnight = cycle_start.num_seconds_from_midnight() == 0
        && cycle_start.nanosecond() == 0;
    date > start_day || (date == start_day && starts_at_midnight)
}

/// Whether an aggregate for `period` counts toward a cycle started at `cycle_start`.
///
/// Aggregates are compared at month granularity, so the whole starting month
/// is included even when the cycle began part-way through it.
pub fn aggregate_in_cycle(period: YearMonth, cycle_start: NaiveDateTime) -> bool {
    period >= YearMonth::from_date(cycle_start.date())
}

/// Totals accumulated since `cycle_start`.
pub fn cycle_totals(
    cycle_start: NaiveDateTime,
    sessions: &[WorkSession],
    aggregates: &[MonthlyAggregate],
    history: &RateHistory,
    fallback: Decimal,
) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for session in sessions
        .iter()
        .filter(|s| session_in_cycle(s.date, cycle_start))
    {
        totals.record(&session_contribution(session, history, fallback));
    }

    for aggregate in aggregates
        .iter()
        .filter(|a| aggregate_in_cycle(a.period, cycle_start))
    {
        totals.record(&aggregate_contribution(aggregate, history, fallback));
    }

    totals
}

/// Whether the accumulated minutes have reached the cycle target.
///
/// # Examples
///
/// ```
/// use wage_ledger::calculation::should_reset_cycle;
/// use wage_ledger::models::{Settings, SettingsDefaults};
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let settings = Settings::initial(&SettingsDefaults::default(), now);
/// assert!(!should_reset_cycle(&settings, 160 * 60 - 1));
/// assert!(should_reset_cycle(&settings, 160 * 60));
/// ```
pub fn should_reset_cycle(settings: &Settings, accumulated_minutes: i64) -> bool {
    accumulated_minutes >= i64::from(settings.evaluation_cycle_hours) * 60
}

/// Derives the progress figures for the current cycle.
pub fn cycle_progress(
    settings: &Settings,
    totals: PeriodTotals,
    reset_performed: bool,
) -> CycleProgress {
    let hours = totals.hours();
    let target = Decimal::from(settings.evaluation_cycle_hours);

    let progress_percent = if target.is_zero() {
        ONE_HUNDRED
    } else {
        (hours / target * ONE_HUNDRED).min(ONE_HUNDRED)
    };
    let remaining_hours = (target - hours).max(Decimal::ZERO);

    CycleProgress {
        started_at: settings.cycle_start,
        target_hours: settings.evaluation_cycle_hours,
        totals,
        hours,
        progress_percent,
        remaining_hours,
        reached: should_reset_cycle(settings, totals.minutes),
        reset_performed,
    }
}
