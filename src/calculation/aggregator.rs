//! Folding sessions and monthly aggregates into totals.
//!
//! Every figure in the ledger is produced the same way: each record is turned
//! into a [`Contribution`] at its own resolved rate, the wage is floored per
//! record, and contributions are then summed. Flooring per record means a
//! period's wage can be smaller than flooring the period's combined minutes
//! once.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::models::{
    AnnualReport, Contribution, ContributionSource, MINUTES_PER_HOUR, MonthlyAggregate,
    MonthlySummary, PeriodTotals, WorkSession, YearMonth, YearlySummary,
};

use super::rate_resolver::RateHistory;

/// Wage for `minutes` at `rate`, floored to a whole currency unit.
///
/// The product saturates at [`Decimal::MAX`] instead of overflowing.
///
/// # Examples
///
/// ```
/// use wage_ledger::calculation::wage_for_minutes;
/// use rust_decimal::Decimal;
///
/// assert_eq!(wage_for_minutes(90, Decimal::from(1000)), Decimal::from(1500));
/// assert_eq!(wage_for_minutes(20, Decimal::from(1000)), Decimal::from(333));
/// ```
pub fn wage_for_minutes(minutes: i64, rate: Decimal) -> Decimal {
    (Decimal::from(minutes).saturating_mul(rate) / MINUTES_PER_HOUR).floor()
}

/// The contribution of one work session, at the rate in effect on its date.
pub fn session_contribution(
    session: &WorkSession,
    history: &RateHistory,
    fallback: Decimal,
) -> Contribution {
    let minutes = session.net_minutes();
    let rate = history.rate_for_date(session.date, fallback);
    Contribution {
        source: ContributionSource::Session {
            id: session.id,
            date: session.date,
        },
        minutes,
        rate,
        wage: wage_for_minutes(minutes, rate),
    }
}

/// The contribution of one monthly aggregate, at the rate in effect on the
/// first day of its month.
pub fn aggregate_contribution(
    aggregate: &MonthlyAggregate,
    history: &RateHistory,
    fallback: Decimal,
) -> Contribution {
    let minutes = i64::from(aggregate.total_minutes);
    let rate = history.rate_for_date(aggregate.period.first_day(), fallback);
    Contribution {
        source: ContributionSource::Aggregate {
            id: aggregate.id,
            year: aggregate.period.year(),
            month: aggregate.period.month(),
        },
        minutes,
        rate,
        wage: wage_for_minutes(minutes, rate),
    }
}

/// Builds the monthly view for `period`.
///
/// Sessions outside the month are ignored, as is an aggregate for a different
/// month, so callers may pass wider slices.
pub fn monthly_summary(
    period: YearMonth,
    sessions: &[WorkSession],
    aggregate: Option<&MonthlyAggregate>,
    history: &RateHistory,
    fallback: Decimal,
) -> MonthlySummary {
    let mut in_month: Vec<&WorkSession> =
        sessions.iter().filter(|s| period.contains(s.date)).collect();
    in_month.sort_by_key(|s| s.date);

    let lines: Vec<Contribution> = in_month
        .iter()
        .map(|s| session_contribution(s, history, fallback))
        .collect();
    let session_totals: PeriodTotals = lines.iter().collect();

    let aggregate = aggregate
        .filter(|a| a.period == period)
        .map(|a| aggregate_contribution(a, history, fallback));

    let mut totals = session_totals;
    if let Some(contribution) = &aggregate {
        totals.record(contribution);
    }

    let days_worked = in_month
        .iter()
        .map(|s| s.date)
        .collect::<BTreeSet<_>>()
        .len();
    let average_minutes_per_day =
        (days_worked > 0).then(|| session_totals.minutes / days_worked as i64);

    MonthlySummary {
        period,
        totals,
        session_totals,
        aggregate,
        days_worked,
        average_minutes_per_day,
        lines,
    }
}

/// Builds the annual report.
///
/// Sessions are bucketed by the year of their date; aggregates by their stored
/// year. Years are returned newest first.
pub fn annual_report(
    sessions: &[WorkSession],
    aggregates: &[MonthlyAggregate],
    history: &RateHistory,
    fallback: Decimal,
) -> AnnualReport {
    let mut by_year: BTreeMap<i32, PeriodTotals> = BTreeMap::new();

    for session in sessions {
        by_year
            .entry(session.date.year())
            .or_default()
            .record(&session_contribution(session, history, fallback));
    }

    for aggregate in aggregates {
        by_year
            .entry(aggregate.period.year())
            .or_default()
            .record(&aggregate_contribution(aggregate, history, fallback));
    }

    let mut total = PeriodTotals::default();
    let years = by_year
        .into_iter()
        .rev()
        .map(|(year, totals)| {
            total.merge(&totals);
            YearlySummary { year, totals }
        })
        .collect();

    AnnualReport { years, total }
}
