//! Wall-clock time and calendar month value types.
//!
//! [`ClockTime`] is the parsed form of the `HH:MM` strings stored on work
//! sessions, and [`YearMonth`] identifies the month a monthly aggregate covers.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// A 24-hour wall-clock time with minute precision.
///
/// Serialized as an `HH:MM` string.
///
/// # Example
///
/// ```
/// use wage_ledger::models::ClockTime;
///
/// let start: ClockTime = "09:30".parse().unwrap();
/// assert_eq!(start.hour(), 9);
/// assert_eq!(start.minute(), 30);
/// assert_eq!(start.minutes_since_midnight(), 570);
/// assert_eq!(start.to_string(), "09:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Creates a clock time, rejecting hours above 23 and minutes above 59.
    pub fn new(hour: u8, minute: u8) -> LedgerResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(LedgerError::InvalidTime {
                value: format!("{:02}:{:02}", hour, minute),
                message: "hour must be 0-23 and minute 0-59".to_string(),
            });
        }
        Ok(Self { hour, minute })
    }

    /// The hour component (0-23).
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// The minute component (0-59).
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since 00:00.
    pub fn minutes_since_midnight(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| LedgerError::InvalidTime {
            value: s.to_string(),
            message: message.to_string(),
        };

        let (hour, minute) = s.split_once(':').ok_or_else(|| invalid("expected HH:MM"))?;
        let is_field = |part: &str| {
            !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_field(hour) || !is_field(minute) {
            return Err(invalid("expected HH:MM"));
        }

        let hour: u8 = hour.parse().map_err(|_| invalid("hour is not a number"))?;
        let minute: u8 = minute.parse().map_err(|_| invalid("minute is not a number"))?;

        ClockTime::new(hour, minute).map_err(|_| invalid("hour must be 0-23 and minute 0-59"))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Serialize, Deserialize)]
struct RawYearMonth {
    year: i32,
    month: u32,
}

/// A calendar month, stored as its first day.
///
/// Ordering is lexicographic on `(year, month)`. Serialized as
/// `{"year": ..., "month": ...}`.
///
/// # Example
///
/// ```
/// use wage_ledger::models::YearMonth;
/// use chrono::NaiveDate;
///
/// let period = YearMonth::new(2024, 2).unwrap();
/// assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert!(YearMonth::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth", into = "RawYearMonth")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Creates a year/month pair, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(YearMonth)
            .ok_or(LedgerError::InvalidMonth { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth(date - Days::new(u64::from(date.day0())))
    }

    /// The calendar year.
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// The month number (1-12).
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// The first calendar day of the month.
    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Whether `date` falls inside this month.
    pub fn contains(self, date: NaiveDate) -> bool {
        YearMonth::from_date(date) == self
    }
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = LedgerError;

    fn try_from(raw: RawYearMonth) -> Result<Self, Self::Error> {
        YearMonth::new(raw.year, raw.month)
    }
}

impl From<YearMonth> for RawYearMonth {
    fn from(value: YearMonth) -> Self {
        RawYearMonth {
            year: value.year(),
            month: value.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}
