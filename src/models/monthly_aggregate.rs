//! Monthly aggregate model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::YearMonth;

/// A manually entered total for one calendar month.
///
/// Used to backfill months that have no per-day sessions. When sessions do
/// exist for the same month, both are counted: the aggregate is assumed to
/// cover days that were not otherwise recorded. The store keeps at most one
/// aggregate per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Unique identifier assigned by the store.
    pub id: Uuid,
    /// The month covered.
    #[serde(flatten)]
    pub period: YearMonth,
    /// Total worked minutes for the month.
    pub total_minutes: u32,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}
