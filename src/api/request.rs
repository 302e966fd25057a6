//! Request types for the wage ledger API.
//!
//! This module defines the JSON request bodies for the record-management
//! endpoints and their validation into store inputs. Malformed input is
//! rejected here, so the calculation core only ever sees well-formed records.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{ClockTime, SettingsUpdate, YearMonth, validate_rate};
use crate::store::{AggregateInput, RateInput, SessionInput};

fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Request body for creating or replacing a work session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// The calendar day worked (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Clock-in time (`HH:MM`).
    pub start_time: String,
    /// Clock-out time (`HH:MM`).
    pub end_time: String,
    /// Unpaid break minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

impl TryFrom<SessionRequest> for SessionInput {
    type Error = LedgerError;

    fn try_from(req: SessionRequest) -> Result<Self, Self::Error> {
        Ok(SessionInput {
            date: req.date,
            start_time: req.start_time.parse::<ClockTime>()?,
            end_time: req.end_time.parse::<ClockTime>()?,
            break_minutes: req.break_minutes,
            note: clean_note(req.note),
        })
    }
}

/// Request body for upserting a monthly aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRequest {
    /// The calendar year.
    pub year: i32,
    /// The month (1-12).
    pub month: u32,
    /// Total worked minutes for the month.
    pub total_minutes: u32,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

impl TryFrom<AggregateRequest> for AggregateInput {
    type Error = LedgerError;

    fn try_from(req: AggregateRequest) -> Result<Self, Self::Error> {
        Ok(AggregateInput {
            period: YearMonth::new(req.year, req.month)?,
            total_minutes: req.total_minutes,
            note: clean_note(req.note),
        })
    }
}

/// Request body for creating or replacing a rate history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    /// Currency units per hour.
    pub rate: Decimal,
    /// First day the rate applies (`YYYY-MM-DD`).
    pub effective_from: NaiveDate,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

impl TryFrom<RateRequest> for RateInput {
    type Error = LedgerError;

    fn try_from(req: RateRequest) -> Result<Self, Self::Error> {
        Ok(RateInput {
            rate: validate_rate("rate", req.rate)?,
            effective_from: req.effective_from,
            note: clean_note(req.note),
        })
    }
}

/// Request body for a partial settings update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsRequest {
    /// New fallback hourly rate.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// New evaluation cycle target in hours.
    #[serde(default)]
    pub evaluation_cycle_hours: Option<u32>,
    /// New cycle start (`YYYY-MM-DDTHH:MM:SS`).
    #[serde(default)]
    pub cycle_start: Option<NaiveDateTime>,
}

impl TryFrom<SettingsRequest> for SettingsUpdate {
    type Error = LedgerError;

    fn try_from(req: SettingsRequest) -> Result<Self, Self::Error> {
        let hourly_rate = req
            .hourly_rate
            .map(|rate| validate_rate("hourly_rate", rate))
            .transpose()?;
        if req.evaluation_cycle_hours == Some(0) {
            return Err(LedgerError::invalid_field(
                "evaluation_cycle_hours",
                "must be greater than zero",
            ));
        }
        Ok(SettingsUpdate {
            hourly_rate,
            evaluation_cycle_hours: req.evaluation_cycle_hours,
            cycle_start: req.cycle_start,
        })
    }
}
