//! Application state for the wage ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::ledger::Ledger;

/// Source of the current local time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Shared application state.
///
/// Holds the ledger service and the clock every handler reads "now" from.
#[derive(Clone)]
pub struct AppState {
    ledger: Ledger,
    clock: Clock,
}

impl AppState {
    /// Creates application state that reads the system's local time.
    pub fn new(ledger: Ledger) -> Self {
        Self::with_clock(ledger, || Local::now().naive_local())
    }

    /// Creates application state with a custom clock.
    pub fn with_clock(
        ledger: Ledger,
        clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static,
    ) -> Self {
        Self {
            ledger,
            clock: Arc::new(clock),
        }
    }

    /// Returns the ledger service.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The current local time.
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}
