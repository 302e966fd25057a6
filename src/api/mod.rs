//! HTTP API for the wage ledger.
//!
//! This module provides the REST API endpoints for reading ledger views and
//! managing sessions, aggregates, rates and settings.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AggregateRequest, RateRequest, SessionRequest, SettingsRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, Clock};
