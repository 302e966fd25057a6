//! Work session model.
//!
//! A work session is a single day's recorded start, end and break.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ClockTime;
use crate::calculation::net_minutes;

/// A single day's worked interval.
///
/// # Examples
///
/// ```
/// use wage_ledger::models::WorkSession;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let session = WorkSession {
///     id: Uuid::new_v4(),
///     date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     start_time: "09:00".parse().unwrap(),
///     end_time: "18:00".parse().unwrap(),
///     break_minutes: 60,
///     note: None,
/// };
/// assert_eq!(session.net_minutes(), 480);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    /// Unique identifier assigned by the store.
    pub id: Uuid,
    /// The calendar day worked.
    pub date: NaiveDate,
    /// Clock-in time.
    pub start_time: ClockTime,
    /// Clock-out time.
    pub end_time: ClockTime,
    /// Unpaid break taken during the session.
    pub break_minutes: u32,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl WorkSession {
    /// Net worked minutes, never negative.
    pub fn net_minutes(&self) -> i64 {
        net_minutes(self.start_time, self.end_time, self.break_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session(start: &str, end: &str, break_minutes: u32) -> WorkSession {
        WorkSession {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            break_minutes,
            note: None,
        }
    }

    #[test]
    fn test_net_minutes_subtracts_break() {
        assert_eq!(make_session("09:00", "17:30", 30).net_minutes(), 480);
    }

    #[test]
    fn test_inverted_session_is_zero() {
        assert_eq!(make_session("18:00", "09:00", 0).net_minutes(), 0);
    }

    #[test]
    fn test_session_deserialization() {
        let json = r#"{
            "id": "6f1c1b52-2a8e-4c59-9d0e-6c0f3b9d2a11",
            "date": "2026-01-15",
            "start_time": "09:00",
            "end_time": "17:00",
            "break_minutes": 45
        }"#;

        let session: WorkSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.break_minutes, 45);
        assert_eq!(session.note, None);
        assert_eq!(session.net_minutes(), 435);
    }

    #[test]
    fn test_session_rejects_malformed_time() {
        let json = r#"{
            "id": "6f1c1b52-2a8e-4c59-9d0e-6c0f3b9d2a11",
            "date": "2026-01-15",
            "start_time": "9 o'clock",
            "end_time": "17:00",
            "break_minutes": 0
        }"#;

        assert!(serde_json::from_str::<WorkSession>(json).is_err());
    }
}
