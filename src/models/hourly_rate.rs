//! Hourly rate history entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};

/// Largest hourly rate the ledger accepts: ten integer digits.
pub const MAX_HOURLY_RATE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 0);

/// Checks that `rate` lies in `0..=MAX_HOURLY_RATE`.
///
/// ```
/// use wage_ledger::models::validate_rate;
/// use rust_decimal::Decimal;
///
/// assert!(validate_rate("rate", Decimal::from(1200)).is_ok());
/// assert!(validate_rate("rate", Decimal::from(-1)).is_err());
/// assert!(validate_rate("rate", Decimal::MAX).is_err());
/// ```
pub fn validate_rate(field: &str, rate: Decimal) -> LedgerResult<Decimal> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(LedgerError::invalid_field(field, "must not be negative"));
    }
    if rate > MAX_HOURLY_RATE {
        return Err(LedgerError::invalid_field(
            field,
            format!("must not exceed {}", MAX_HOURLY_RATE),
        ));
    }
    Ok(rate)
}

/// One entry in the wage-rate history.
///
/// There is no end date: an entry applies from `effective_from` until the
/// next entry's `effective_from`. `sequence` is assigned by the store on
/// insert and breaks ties between entries sharing an effective date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRate {
    /// Unique identifier assigned by the store.
    pub id: Uuid,
    /// Currency units per hour.
    pub rate: Decimal,
    /// First calendar day the rate applies.
    pub effective_from: NaiveDate,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
    /// Insertion order within the store.
    #[serde(default)]
    pub sequence: u64,
}
