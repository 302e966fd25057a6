//! Ledger service: store reads, the cycle auto-reset, and view assembly.
//!
//! Every view is computed from fresh store snapshots. The only write issued on
//! a read path is the cycle restart on the dashboard, and it happens before
//! any figure is computed.

use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use tracing::{debug, info};

use crate::calculation::{
    RateHistory, annual_report, cycle_progress, cycle_totals, monthly_summary,
    session_contribution, should_reset_cycle,
};
use crate::error::LedgerResult;
use crate::models::{
    AnnualReport, CycleProgress, Dashboard, MonthlySummary, PeriodTotals, RecentSession,
    Settings, YearMonth,
};
use crate::store::LedgerStore;

/// How many sessions the dashboard lists.
pub const RECENT_SESSION_LIMIT: usize = 5;

/// Computes ledger views over a [`LedgerStore`].
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
}

impl Ledger {
    /// Creates a ledger over `store`.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    fn rate_history(&self) -> LedgerResult<RateHistory> {
        Ok(RateHistory::from_rates(&self.store.rate_history()?))
    }

    fn accumulated(&self, settings: &Settings, history: &RateHistory) -> LedgerResult<PeriodTotals> {
        let start = settings.cycle_start;
        let sessions = self.store.sessions_since(start)?;
        let aggregates = self
            .store
            .aggregates_since(YearMonth::from_date(start.date()))?;
        Ok(cycle_totals(
            start,
            &sessions,
            &aggregates,
            history,
            settings.hourly_rate,
        ))
    }

    /// Restarts the cycle at `now` if its target has been reached.
    ///
    /// Returns the settings to compute with and whether a reset was written.
    /// Running this twice in a row is harmless: after the first reset the
    /// accumulated total is back below the target.
    pub fn check_cycle(&self, now: NaiveDateTime) -> LedgerResult<(Settings, bool)> {
        let settings = self.store.settings_or_init(now)?;
        let history = self.rate_history()?;
        let totals = self.accumulated(&settings, &history)?;

        if !should_reset_cycle(&settings, totals.minutes) {
            return Ok((settings, false));
        }

        info!(
            previous_start = %settings.cycle_start,
            accumulated_minutes = totals.minutes,
            target_hours = settings.evaluation_cycle_hours,
            "Evaluation cycle target reached; restarting cycle"
        );
        let settings = self.store.write_cycle_start(now)?;
        Ok((settings, true))
    }

    /// Current cycle progress without the auto-reset.
    pub fn cycle(&self, now: NaiveDateTime) -> LedgerResult<CycleProgress> {
        let settings = self.store.settings_or_init(now)?;
        let history = self.rate_history()?;
        let totals = self.accumulated(&settings, &history)?;
        Ok(cycle_progress(&settings, totals, false))
    }

    /// Restarts the cycle at `now` unconditionally.
    pub fn reset_cycle(&self, now: NaiveDateTime) -> LedgerResult<Settings> {
        info!(%now, "Evaluation cycle reset requested");
        self.store.write_cycle_start(now)
    }

    /// The monthly view for `period`.
    pub fn monthly(&self, period: YearMonth, now: NaiveDateTime) -> LedgerResult<MonthlySummary> {
        let settings = self.store.settings_or_init(now)?;
        let history = self.rate_history()?;
        let sessions = self.store.sessions_in_month(period)?;
        let aggregate = self.store.aggregate_for_month(period)?;

        let summary = monthly_summary(
            period,
            &sessions,
            aggregate.as_ref(),
            &history,
            settings.hourly_rate,
        );
        debug!(
            %period,
            sessions = sessions.len(),
            has_aggregate = aggregate.is_some(),
            minutes = summary.totals.minutes,
            "Computed monthly summary"
        );
        Ok(summary)
    }

    /// Yearly totals across every stored record.
    pub fn annual(&self, now: NaiveDateTime) -> LedgerResult<AnnualReport> {
        let settings = self.store.settings_or_init(now)?;
        let history = self.rate_history()?;
        let sessions = self.store.all_sessions()?;
        let aggregates = self.store.all_aggregates()?;

        let report = annual_report(&sessions, &aggregates, &history, settings.hourly_rate);
        debug!(years = report.years.len(), "Computed annual report");
        Ok(report)
    }

    /// The dashboard for `now`.
    ///
    /// Runs [`Ledger::check_cycle`] first, then computes every figure from the
    /// possibly restarted cycle.
    pub fn dashboard(&self, now: NaiveDateTime) -> LedgerResult<Dashboard> {
        let (settings, reset_performed) = self.check_cycle(now)?;
        let history = self.rate_history()?;

        let totals = self.accumulated(&settings, &history)?;
        let cycle = cycle_progress(&settings, totals, reset_performed);

        let today = now.date();
        let month = self.monthly(YearMonth::from_date(today), now)?;

        let recent_sessions = self
            .store
            .recent_sessions(RECENT_SESSION_LIMIT)?
            .into_iter()
            .map(|session| {
                let contribution = session_contribution(&session, &history, settings.hourly_rate);
                RecentSession {
                    session,
                    contribution,
                }
            })
            .collect();

        debug!(
            %today,
            hour = now.hour(),
            cycle_minutes = cycle.totals.minutes,
            reset_performed,
            "Computed dashboard"
        );

        Ok(Dashboard {
            today,
            month,
            cycle,
            recent_sessions,
        })
    }
}
