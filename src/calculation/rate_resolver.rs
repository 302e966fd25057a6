//! Effective-dated hourly rate resolution.
//!
//! The store returns the rate history in no particular order. [`RateHistory`]
//! sorts it once by `(effective_from, sequence)` so that every lookup is a
//! binary search.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::trace;

use crate::models::HourlyRate;

/// A rate history entry reduced to the fields resolution needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateEntry {
    /// Currency units per hour.
    pub rate: Decimal,
    /// First day the rate applies.
    pub effective_from: NaiveDate,
    /// Insertion order; higher wins among entries sharing `effective_from`.
    pub sequence: u64,
}

impl From<&HourlyRate> for RateEntry {
    fn from(rate: &HourlyRate) -> Self {
        Self {
            rate: rate.rate,
            effective_from: rate.effective_from,
            sequence: rate.sequence,
        }
    }
}

/// A rate history sorted for lookup.
///
/// # Example
///
/// ```
/// use wage_ledger::calculation::{RateEntry, RateHistory};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// let history = RateHistory::new(vec![
///     RateEntry { rate: Decimal::from(1200), effective_from: date(2024, 1, 1), sequence: 2 },
///     RateEntry { rate: Decimal::from(1000), effective_from: date(2023, 1, 1), sequence: 1 },
/// ]);
///
/// let fallback = Decimal::from(900);
/// assert_eq!(history.rate_for_date(date(2023, 6, 1), fallback), Decimal::from(1000));
/// assert_eq!(history.rate_for_date(date(2024, 6, 1), fallback), Decimal::from(1200));
/// assert_eq!(history.rate_for_date(date(2022, 1, 1), fallback), fallback);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateHistory {
    entries: Vec<RateEntry>,
}

impl RateHistory {
    /// Builds a history from entries in any order.
    pub fn new(entries: impl IntoIterator<Item = RateEntry>) -> Self {
        let mut entries: Vec<RateEntry> = entries.into_iter().collect();
        entries.sort_by_key(|e| (e.effective_from, e.sequence));
        Self { entries }
    }

    /// Builds a history from stored rate records.
    pub fn from_rates(rates: &[HourlyRate]) -> Self {
        Self::new(rates.iter().map(RateEntry::from))
    }

    /// Entries sorted oldest first.
    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    /// Returns `true` if the history has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry in effect on `date`, if any.
    ///
    /// This is the entry with the latest `effective_from` not after `date`;
    /// among entries sharing that date, the one inserted last.
    pub fn applicable(&self, date: NaiveDate) -> Option<&RateEntry> {
        let end = self.entries.partition_point(|e| e.effective_from <= date);
        end.checked_sub(1).map(|i| &self.entries[i])
    }

    /// The rate in effect on `date`, or `fallback` when no entry applies.
    pub fn rate_for_date(&self, date: NaiveDate, fallback: Decimal) -> Decimal {
        match self.applicable(date) {
            Some(entry) => entry.rate,
            None => {
                trace!(%date, %fallback, "No applicable rate entry; using fallback");
                fallback
            }
        }
    }
}

/// Resolves the rate in effect on `date` from an unordered rate list.
///
/// Convenience wrapper over [`RateHistory`] for one-off lookups; callers
/// resolving many dates should build the history once.
pub fn rate_for_date(history: &[HourlyRate], date: NaiveDate, fallback: Decimal) -> Decimal {
    RateHistory::from_rates(history).rate_for_date(date, fallback)
}
