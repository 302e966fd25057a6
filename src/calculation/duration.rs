//! Net worked minutes for a single session.

use crate::models::ClockTime;

/// Calculates net worked minutes for one session.
///
/// The raw interval is `end - start` in minutes; the break is subtracted and
/// the result clamped at zero. An end time earlier than the start time is not
/// treated as crossing midnight: it simply yields zero.
///
/// # Examples
///
/// ```
/// use wage_ledger::calculation::net_minutes;
/// use wage_ledger::models::ClockTime;
///
/// let start: ClockTime = "09:00".parse().unwrap();
/// let end: ClockTime = "18:00".parse().unwrap();
/// assert_eq!(net_minutes(start, end, 60), 480);
/// assert_eq!(net_minutes(start, "10:00".parse().unwrap(), 90), 0);
/// ```
pub fn net_minutes(start: ClockTime, end: ClockTime, break_minutes: u32) -> i64 {
    let raw = end.minutes_since_midnight() - start.minutes_since_midnight();
    (raw - i64::from(break_minutes)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    /// NM-001: full day with an hour's break
    #[test]
    fn test_full_day_with_break() {
        assert_eq!(net_minutes(t("09:00"), t("18:00"), 60), 480);
    }

    /// NM-002: break longer than the interval clamps to zero
    #[test]
    fn test_break_exceeding_interval_clamps_to_zero() {
        assert_eq!(net_minutes(t("09:00"), t("10:00"), 90), 0);
    }

    /// NM-003: break exactly equal to the interval
    #[test]
    fn test_break_equal_to_interval_is_zero() {
        assert_eq!(net_minutes(t("09:00"), t("10:00"), 60), 0);
    }

    /// NM-004: end before start is not an overnight shift
    #[test]
    fn test_end_before_start_is_zero() {
        assert_eq!(net_minutes(t("22:00"), t("06:00"), 0), 0);
    }

    #[test]
    fn test_minute_precision() {
        assert_eq!(net_minutes(t("08:45"), t("12:10"), 5), 200);
    }

    #[test]
    fn test_zero_length_session() {
        assert_eq!(net_minutes(t("13:00"), t("13:00"), 0), 0);
    }
}
