//! Computed summary models.
//!
//! This module contains the values the aggregation engine produces: one
//! [`Contribution`] per session or monthly aggregate, [`PeriodTotals`] folded
//! from them, and the monthly, cycle, yearly and dashboard views built on top.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{WorkSession, YearMonth};

/// Minutes in an hour, as a decimal divisor.
pub const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// The record a contribution was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContributionSource {
    /// A per-day work session; its rate was resolved at `date`.
    Session {
        /// The session id.
        id: Uuid,
        /// The session date.
        date: NaiveDate,
    },
    /// A monthly aggregate; its rate was resolved at the month's first day.
    Aggregate {
        /// The aggregate id.
        id: Uuid,
        /// The aggregate's stored year.
        year: i32,
        /// The aggregate's stored month.
        month: u32,
    },
}

/// Minutes and wage contributed by one record.
///
/// `wage` is already floored to a whole currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Where the figures came from.
    pub source: ContributionSource,
    /// Net worked minutes.
    pub minutes: i64,
    /// The hourly rate applied.
    pub rate: Decimal,
    /// `floor(minutes * rate / 60)`.
    pub wage: Decimal,
}

/// Total minutes and wage over a period.
///
/// # Example
///
/// ```
/// use wage_ledger::models::PeriodTotals;
/// use rust_decimal::Decimal;
///
/// let totals = PeriodTotals { minutes: 90, wage: Decimal::from(1500) };
/// assert_eq!(totals.hours(), Decimal::new(15, 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Total worked minutes.
    pub minutes: i64,
    /// Sum of the floored per-record wages.
    pub wage: Decimal,
}

impl PeriodTotals {
    /// Adds one contribution to the running totals. Both sums saturate.
    pub fn record(&mut self, contribution: &Contribution) {
        self.minutes = self.minutes.saturating_add(contribution.minutes);
        self.wage = self.wage.saturating_add(contribution.wage);
    }

    /// Adds another set of totals.
    pub fn merge(&mut self, other: &PeriodTotals) {
        self.minutes = self.minutes.saturating_add(other.minutes);
        self.wage = self.wage.saturating_add(other.wage);
    }

    /// Total minutes expressed in hours.
    pub fn hours(&self) -> Decimal {
        Decimal::from(self.minutes) / MINUTES_PER_HOUR
    }
}

impl<'a> FromIterator<&'a Contribution> for PeriodTotals {
    fn from_iter<I: IntoIterator<Item = &'a Contribution>>(iter: I) -> Self {
        let mut totals = PeriodTotals::default();
        for contribution in iter {
            totals.record(contribution);
        }
        totals
    }
}

/// The monthly view: sessions dated in the month plus the month's aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The month summarized.
    #[serde(flatten)]
    pub period: YearMonth,
    /// Sessions and aggregate combined.
    pub totals: PeriodTotals,
    /// Sessions only.
    pub session_totals: PeriodTotals,
    /// The month's aggregate contribution, if one was recorded.
    pub aggregate: Option<Contribution>,
    /// Distinct dates with at least one session.
    pub days_worked: usize,
    /// `floor(session minutes / days worked)`, absent when nothing was worked.
    pub average_minutes_per_day: Option<i64>,
    /// Per-session contributions in date order.
    pub lines: Vec<Contribution>,
}

/// Progress through the current evaluation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProgress {
    /// When the cycle began.
    pub started_at: NaiveDateTime,
    /// The cycle's target in hours.
    pub target_hours: u32,
    /// Minutes and wage accumulated since `started_at`.
    pub totals: PeriodTotals,
    /// Accumulated hours.
    pub hours: Decimal,
    /// `min(100, hours / target * 100)`.
    pub progress_percent: Decimal,
    /// `max(0, target - hours)`.
    pub remaining_hours: Decimal,
    /// Whether the target has been reached.
    pub reached: bool,
    /// Whether this read restarted the cycle before computing the figures.
    pub reset_performed: bool,
}

/// One row of the annual report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySummary {
    /// The calendar year.
    pub year: i32,
    /// Totals for the year.
    pub totals: PeriodTotals,
}

/// Yearly totals, newest year first, plus a grand total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualReport {
    /// One row per year that has any data.
    pub years: Vec<YearlySummary>,
    /// Sum over all years.
    pub total: PeriodTotals,
}

/// A recently recorded session with its computed figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSession {
    /// The stored session.
    pub session: WorkSession,
    /// Net minutes, resolved rate and wage.
    pub contribution: Contribution,
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// The local date the dashboard was computed for.
    pub today: NaiveDate,
    /// The current month.
    pub month: MonthlySummary,
    /// The current evaluation cycle.
    pub cycle: CycleProgress,
    /// Most recent sessions, newest first.
    pub recent_sessions: Vec<RecentSession>,
}
