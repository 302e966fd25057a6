//! In-memory ledger store with optional JSON snapshot persistence.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::session_in_cycle;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    HourlyRate, MonthlyAggregate, Settings, SettingsDefaults, SettingsUpdate, WorkSession,
    YearMonth,
};

use super::{AggregateInput, LedgerStore, RateInput, SessionInput};

/// Everything the store holds, as written to the snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Work sessions.
    #[serde(default)]
    pub sessions: Vec<WorkSession>,
    /// Monthly aggregates, at most one per month.
    #[serde(default)]
    pub aggregates: Vec<MonthlyAggregate>,
    /// Rate history in insertion order.
    #[serde(default)]
    pub rates: Vec<HourlyRate>,
    /// The settings singleton, once initialized.
    #[serde(default)]
    pub settings: Option<Settings>,
    /// Sequence number handed to the next rate entry.
    #[serde(default)]
    pub next_rate_sequence: u64,
}

/// A [`LedgerStore`] backed by a lock-guarded [`LedgerSnapshot`].
///
/// When opened with a path, every write is applied to a copy, persisted, and
/// only then made visible. A failed write leaves the store unchanged.
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<LedgerSnapshot>,
    defaults: SettingsDefaults,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Creates an empty, non-persistent store.
    pub fn new(defaults: SettingsDefaults) -> Self {
        Self {
            data: RwLock::new(LedgerSnapshot::default()),
            defaults,
            snapshot_path: None,
        }
    }

    /// Creates a non-persistent store seeded with the configured rate history.
    pub fn seeded(config: &LedgerConfig) -> Self {
        let mut snapshot = LedgerSnapshot::default();
        seed_rates(&mut snapshot, config);
        Self {
            data: RwLock::new(snapshot),
            defaults: config.settings_defaults(),
            snapshot_path: None,
        }
    }

    /// Opens a store persisted at `path`.
    ///
    /// An existing snapshot is loaded as-is. Otherwise a new snapshot is
    /// seeded from `config` and written immediately.
    pub fn open(path: impl Into<PathBuf>, config: &LedgerConfig) -> LedgerResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let snapshot = read_snapshot(&path)?;
            info!(
                path = %path.display(),
                sessions = snapshot.sessions.len(),
                aggregates = snapshot.aggregates.len(),
                rates = snapshot.rates.len(),
                "Loaded ledger snapshot"
            );
            snapshot
        } else {
            let mut snapshot = LedgerSnapshot::default();
            seed_rates(&mut snapshot, config);
            write_snapshot(&path, &snapshot)?;
            info!(path = %path.display(), "Created ledger snapshot");
            snapshot
        };

        Ok(Self {
            data: RwLock::new(data),
            defaults: config.settings_defaults(),
            snapshot_path: Some(path),
        })
    }

    /// A copy of the current contents.
    pub fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerSnapshot>> {
        self.data.read().map_err(|_| poisoned())
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerSnapshot>> {
        self.data.write().map_err(|_| poisoned())
    }

    /// Runs `f` on a copy of the data, persists the copy if a snapshot path is
    /// set, then swaps it in. Nothing changes unless every step succeeds.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut LedgerSnapshot) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let mut data = self.write()?;
        let mut next = data.clone();
        let value = f(&mut next)?;
        if let Some(path) = &self.snapshot_path {
            write_snapshot(path, &next)?;
        }
        *data = next;
        Ok(value)
    }

    fn settings_entry<'a>(
        &self,
        data: &'a mut LedgerSnapshot,
        now: NaiveDateTime,
    ) -> &'a mut Settings {
        data.settings.get_or_insert_with(|| {
            info!(%now, "Initializing settings with defaults");
            Settings::initial(&self.defaults, now)
        })
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage {
        path: "<memory>".to_string(),
        message: "ledger lock poisoned".to_string(),
    }
}

fn seed_rates(data: &mut LedgerSnapshot, config: &LedgerConfig) {
    for seed in &config.rates {
        let sequence = data.next_rate_sequence;
        data.next_rate_sequence += 1;
        data.rates.push(HourlyRate {
            id: Uuid::new_v4(),
            rate: seed.rate,
            effective_from: seed.effective_from,
            note: seed.note.clone(),
            sequence,
        });
    }
    debug!(count = config.rates.len(), "Seeded rate history");
}

fn read_snapshot(path: &Path) -> LedgerResult<LedgerSnapshot> {
    let storage_error = |message: String| LedgerError::Storage {
        path: path.display().to_string(),
        message,
    };
    let content = fs::read_to_string(path).map_err(|e| storage_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| storage_error(e.to_string()))
}

/// Writes the snapshot next to `path` and renames it into place, so the file
/// is never left half-written.
fn write_snapshot(path: &Path, snapshot: &LedgerSnapshot) -> LedgerResult<()> {
    let storage_error = |message: String| LedgerError::Storage {
        path: path.display().to_string(),
        message,
    };
    let serialized =
        serde_json::to_string_pretty(snapshot).map_err(|e| storage_error(e.to_string()))?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, serialized).map_err(|e| storage_error(e.to_string()))?;
    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        storage_error(e.to_string())
    })
}

fn sorted_by_date(mut sessions: Vec<WorkSession>) -> Vec<WorkSession> {
    sessions.sort_by_key(|s| (s.date, s.start_time));
    sessions
}

impl LedgerStore for MemoryStore {
    fn sessions_in_month(&self, period: YearMonth) -> LedgerResult<Vec<WorkSession>> {
        let data = self.read()?;
        Ok(sorted_by_date(
            data.sessions
                .iter()
                .filter(|s| period.contains(s.date))
                .cloned()
                .collect(),
        ))
    }

    fn sessions_since(&self, since: NaiveDateTime) -> LedgerResult<Vec<WorkSession>> {
        let data = self.read()?;
        Ok(sorted_by_date(
            data.sessions
                .iter()
                .filter(|s| session_in_cycle(s.date, since))
                .cloned()
                .collect(),
        ))
    }

    fn all_sessions(&self) -> LedgerResult<Vec<WorkSession>> {
        Ok(self.read()?.sessions.clone())
    }

    fn recent_sessions(&self, limit: usize) -> LedgerResult<Vec<WorkSession>> {
        let mut sessions = sorted_by_date(self.read()?.sessions.clone());
        sessions.reverse();
        sessions.truncate(limit);
        Ok(sessions)
    }

    fn aggregate_for_month(&self, period: YearMonth) -> LedgerResult<Option<MonthlyAggregate>> {
        let data = self.read()?;
        Ok(data.aggregates.iter().find(|a| a.period == period).cloned())
    }

    fn aggregates_since(&self, period: YearMonth) -> LedgerResult<Vec<MonthlyAggregate>> {
        let data = self.read()?;
        let mut aggregates: Vec<MonthlyAggregate> = data
            .aggregates
            .iter()
            .filter(|a| a.period >= period)
            .cloned()
            .collect();
        aggregates.sort_by_key(|a| a.period);
        Ok(aggregates)
    }

    fn all_aggregates(&self) -> LedgerResult<Vec<MonthlyAggregate>> {
        Ok(self.read()?.aggregates.clone())
    }

    fn rate_history(&self) -> LedgerResult<Vec<HourlyRate>> {
        Ok(self.read()?.rates.clone())
    }

    fn settings_or_init(&self, now: NaiveDateTime) -> LedgerResult<Settings> {
        if let Some(settings) = &self.read()?.settings {
            return Ok(settings.clone());
        }
        self.mutate(|data| Ok(self.settings_entry(data, now).clone()))
    }

    fn write_cycle_start(&self, start: NaiveDateTime) -> LedgerResult<Settings> {
        self.mutate(|data| {
            let settings = self.settings_entry(data, start);
            settings.cycle_start = start;
            Ok(settings.clone())
        })
    }

    fn update_settings(
        &self,
        update: &SettingsUpdate,
        now: NaiveDateTime,
    ) -> LedgerResult<Settings> {
        self.mutate(|data| {
            let settings = self.settings_entry(data, now);
            settings.apply(update);
            Ok(settings.clone())
        })
    }

    fn create_session(&self, input: SessionInput) -> LedgerResult<WorkSession> {
        self.mutate(|data| {
            let session = WorkSession {
                id: Uuid::new_v4(),
                date: input.date,
                start_time: input.start_time,
                end_time: input.end_time,
                break_minutes: input.break_minutes,
                note: input.note,
            };
            data.sessions.push(session.clone());
            Ok(session)
        })
    }

    fn update_session(&self, id: Uuid, input: SessionInput) -> LedgerResult<WorkSession> {
        self.mutate(|data| {
            let session = data
                .sessions
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(LedgerError::SessionNotFound { id })?;
            session.date = input.date;
            session.start_time = input.start_time;
            session.end_time = input.end_time;
            session.break_minutes = input.break_minutes;
            session.note = input.note;
            Ok(session.clone())
        })
    }

    fn delete_session(&self, id: Uuid) -> LedgerResult<()> {
        self.mutate(|data| {
            let before = data.sessions.len();
            data.sessions.retain(|s| s.id != id);
            if data.sessions.len() == before {
                return Err(LedgerError::SessionNotFound { id });
            }
            Ok(())
        })
    }

    fn upsert_aggregate(&self, input: AggregateInput) -> LedgerResult<MonthlyAggregate> {
        self.mutate(|data| {
            if let Some(existing) = data
                .aggregates
                .iter_mut()
                .find(|a| a.period == input.period)
            {
                existing.total_minutes = input.total_minutes;
                existing.note = input.note;
                return Ok(existing.clone());
            }

            let aggregate = MonthlyAggregate {
                id: Uuid::new_v4(),
                period: input.period,
                total_minutes: input.total_minutes,
                note: input.note,
            };
            data.aggregates.push(aggregate.clone());
            Ok(aggregate)
        })
    }

    fn delete_aggregate(&self, id: Uuid) -> LedgerResult<()> {
        self.mutate(|data| {
            let before = data.aggregates.len();
            data.aggregates.retain(|a| a.id != id);
            if data.aggregates.len() == before {
                return Err(LedgerError::AggregateNotFound { id });
            }
            Ok(())
        })
    }

    fn create_rate(&self, input: RateInput) -> LedgerResult<HourlyRate> {
        self.mutate(|data| {
            let rate = HourlyRate {
                id: Uuid::new_v4(),
                rate: input.rate,
                effective_from: input.effective_from,
                note: input.note,
                sequence: data.next_rate_sequence,
            };
            data.next_rate_sequence += 1;
            data.rates.push(rate.clone());
            Ok(rate)
        })
    }

    fn update_rate(&self, id: Uuid, input: RateInput) -> LedgerResult<HourlyRate> {
        self.mutate(|data| {
            let rate = data
                .rates
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(LedgerError::RateNotFound { id })?;
            rate.rate = input.rate;
            rate.effective_from = input.effective_from;
            rate.note = input.note;
            Ok(rate.clone())
        })
    }

    fn delete_rate(&self, id: Uuid) -> LedgerResult<()> {
        self.mutate(|data| {
            let before = data.rates.len();
            data.rates.retain(|r| r.id != id);
            if data.rates.len() == before {
                return Err(LedgerError::RateNotFound { id });
            }
            Ok(())
        })
    }
}
