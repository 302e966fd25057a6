//! Configuration types for the wage ledger.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML seed configuration.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{DEFAULT_EVALUATION_CYCLE_HOURS, DEFAULT_HOURLY_RATE, SettingsDefaults};

fn default_hourly_rate() -> Decimal {
    DEFAULT_HOURLY_RATE
}

fn default_cycle_hours() -> u32 {
    DEFAULT_EVALUATION_CYCLE_HOURS
}

/// Contents of `settings.yaml`.
///
/// These values are only used when the settings record is first created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SettingsConfig {
    /// Fallback hourly rate.
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: Decimal,
    /// Evaluation cycle target in hours.
    #[serde(default = "default_cycle_hours")]
    pub evaluation_cycle_hours: u32,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_RATE,
            evaluation_cycle_hours: DEFAULT_EVALUATION_CYCLE_HOURS,
        }
    }
}

/// One file under `rates/`: a rate history entry to seed a new ledger with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateSeed {
    /// Currency units per hour.
    pub rate: Decimal,
    /// First day the rate applies.
    pub effective_from: NaiveDate,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// The complete seed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Settings defaults.
    pub settings: SettingsConfig,
    /// Initial rate history, in file-name order.
    pub rates: Vec<RateSeed>,
}

impl LedgerConfig {
    /// The defaults used when the settings record is first created.
    pub fn settings_defaults(&self) -> SettingsDefaults {
        SettingsDefaults {
            hourly_rate: self.settings.hourly_rate,
            evaluation_cycle_hours: self.settings.evaluation_cycle_hours,
        }
    }
}
