//! Ledger settings.
//!
//! The settings record is a singleton owned by the store. The calculation
//! core receives it as a plain value and never reaches for it globally.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fallback hourly rate used when no settings record exists yet.
pub const DEFAULT_HOURLY_RATE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Evaluation cycle target used when no settings record exists yet.
pub const DEFAULT_EVALUATION_CYCLE_HOURS: u32 = 160;

/// Process-wide ledger configuration.
///
/// # Example
///
/// ```
/// use wage_ledger::models::{Settings, SettingsDefaults};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let now = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let settings = Settings::initial(&SettingsDefaults::default(), now);
/// assert_eq!(settings.hourly_rate, Decimal::from(1000));
/// assert_eq!(settings.evaluation_cycle_hours, 160);
/// assert_eq!(settings.cycle_start, now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Rate applied when the rate history has no applicable entry.
    pub hourly_rate: Decimal,
    /// Worked hours after which an evaluation is due.
    pub evaluation_cycle_hours: u32,
    /// Local instant the current evaluation cycle began.
    pub cycle_start: NaiveDateTime,
}

impl Settings {
    /// Builds the record created on first access.
    pub fn initial(defaults: &SettingsDefaults, now: NaiveDateTime) -> Self {
        Self {
            hourly_rate: defaults.hourly_rate,
            evaluation_cycle_hours: defaults.evaluation_cycle_hours,
            cycle_start: now,
        }
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(rate) = update.hourly_rate {
            self.hourly_rate = rate;
        }
        if let Some(hours) = update.evaluation_cycle_hours {
            self.evaluation_cycle_hours = hours;
        }
        if let Some(start) = update.cycle_start {
            self.cycle_start = start;
        }
    }
}

/// Values used to initialize the settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDefaults {
    /// Initial fallback hourly rate.
    pub hourly_rate: Decimal,
    /// Initial evaluation cycle target in hours.
    pub evaluation_cycle_hours: u32,
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_RATE,
            evaluation_cycle_hours: DEFAULT_EVALUATION_CYCLE_HOURS,
        }
    }
}

/// A partial settings update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// New fallback hourly rate.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// New evaluation cycle target.
    #[serde(default)]
    pub evaluation_cycle_hours: Option<u32>,
    /// New cycle start.
    #[serde(default)]
    pub cycle_start: Option<NaiveDateTime>,
}
