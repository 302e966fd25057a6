//! HTTP request handlers for the wage ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::models::{
    AnnualReport, CycleProgress, Dashboard, HourlyRate, MonthlyAggregate, MonthlySummary,
    Settings, SettingsUpdate, WorkSession, YearMonth,
};
use crate::store::{AggregateInput, RateInput, SessionInput};

use super::request::{AggregateRequest, RateRequest, SessionRequest, SettingsRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/records/:year/:month", get(monthly_handler))
        .route("/annual", get(annual_handler))
        .route("/cycle", get(cycle_handler))
        .route("/cycle/reset", post(reset_cycle_handler))
        .route(
            "/settings",
            get(get_settings_handler).put(update_settings_handler),
        )
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/:id",
            put(update_session_handler).delete(delete_session_handler),
        )
        .route("/aggregates", put(upsert_aggregate_handler))
        .route("/aggregates/:id", delete(delete_aggregate_handler))
        .route("/rates", get(list_rates_handler).post(create_rate_handler))
        .route(
            "/rates/:id",
            put(update_rate_handler).delete(delete_rate_handler),
        )
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into 400 responses.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message is in the body text
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Logs a failed request and converts the error into a response.
fn failed(correlation_id: Uuid, action: &str, err: LedgerError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        action,
        error = %err,
        "Request failed"
    );
    err.into()
}

/// Handler for GET /dashboard.
///
/// Runs the evaluation cycle auto-reset before computing any figure.
async fn dashboard_handler(State(state): State<AppState>) -> ApiResult<Json<Dashboard>> {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let dashboard = state
        .ledger()
        .dashboard(state.now())
        .map_err(|err| failed(correlation_id, "dashboard", err))?;

    info!(
        correlation_id = %correlation_id,
        month_minutes = dashboard.month.totals.minutes,
        cycle_minutes = dashboard.cycle.totals.minutes,
        reset_performed = dashboard.cycle.reset_performed,
        duration_us = started.elapsed().as_micros(),
        "Dashboard computed"
    );
    Ok(Json(dashboard))
}

/// Handler for GET /records/:year/:month.
async fn monthly_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<MonthlySummary>> {
    let correlation_id = Uuid::new_v4();
    let summary = YearMonth::new(year, month)
        .and_then(|period| state.ledger().monthly(period, state.now()))
        .map_err(|err| failed(correlation_id, "monthly", err))?;
    Ok(Json(summary))
}

/// Handler for GET /annual.
async fn annual_handler(State(state): State<AppState>) -> ApiResult<Json<AnnualReport>> {
    let correlation_id = Uuid::new_v4();
    let report = state
        .ledger()
        .annual(state.now())
        .map_err(|err| failed(correlation_id, "annual", err))?;
    Ok(Json(report))
}

/// Handler for GET /cycle. Reports progress without resetting.
async fn cycle_handler(State(state): State<AppState>) -> ApiResult<Json<CycleProgress>> {
    let correlation_id = Uuid::new_v4();
    let progress = state
        .ledger()
        .cycle(state.now())
        .map_err(|err| failed(correlation_id, "cycle", err))?;
    Ok(Json(progress))
}

/// Handler for POST /cycle/reset.
async fn reset_cycle_handler(State(state): State<AppState>) -> ApiResult<Json<Settings>> {
    let correlation_id = Uuid::new_v4();
    let settings = state
        .ledger()
        .reset_cycle(state.now())
        .map_err(|err| failed(correlation_id, "reset_cycle", err))?;
    info!(
        correlation_id = %correlation_id,
        cycle_start = %settings.cycle_start,
        "Evaluation cycle restarted"
    );
    Ok(Json(settings))
}

/// Handler for GET /settings. Creates the settings record on first read.
async fn get_settings_handler(State(state): State<AppState>) -> ApiResult<Json<Settings>> {
    let correlation_id = Uuid::new_v4();
    let settings = state
        .ledger()
        .store()
        .settings_or_init(state.now())
        .map_err(|err| failed(correlation_id, "get_settings", err))?;
    Ok(Json(settings))
}

/// Handler for PUT /settings.
async fn update_settings_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> ApiResult<Json<Settings>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let settings = SettingsUpdate::try_from(request)
        .and_then(|update| state.ledger().store().update_settings(&update, state.now()))
        .map_err(|err| failed(correlation_id, "update_settings", err))?;
    info!(
        correlation_id = %correlation_id,
        hourly_rate = %settings.hourly_rate,
        evaluation_cycle_hours = settings.evaluation_cycle_hours,
        "Settings updated"
    );
    Ok(Json(settings))
}

/// Handler for POST /sessions.
async fn create_session_handler(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WorkSession>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let session = SessionInput::try_from(request)
        .and_then(|input| state.ledger().store().create_session(input))
        .map_err(|err| failed(correlation_id, "create_session", err))?;
    info!(
        correlation_id = %correlation_id,
        session_id = %session.id,
        date = %session.date,
        net_minutes = session.net_minutes(),
        "Work session recorded"
    );
    Ok((StatusCode::CREATED, Json(session)))
}

/// Handler for PUT /sessions/:id.
async fn update_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> ApiResult<Json<WorkSession>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let session = SessionInput::try_from(request)
        .and_then(|input| state.ledger().store().update_session(id, input))
        .map_err(|err| failed(correlation_id, "update_session", err))?;
    info!(correlation_id = %correlation_id, session_id = %id, "Work session updated");
    Ok(Json(session))
}

/// Handler for DELETE /sessions/:id.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    state
        .ledger()
        .store()
        .delete_session(id)
        .map_err(|err| failed(correlation_id, "delete_session", err))?;
    info!(correlation_id = %correlation_id, session_id = %id, "Work session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT /aggregates. Creates or replaces the month's aggregate.
async fn upsert_aggregate_handler(
    State(state): State<AppState>,
    payload: Result<Json<AggregateRequest>, JsonRejection>,
) -> ApiResult<Json<MonthlyAggregate>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let aggregate = AggregateInput::try_from(request)
        .and_then(|input| state.ledger().store().upsert_aggregate(input))
        .map_err(|err| failed(correlation_id, "upsert_aggregate", err))?;
    info!(
        correlation_id = %correlation_id,
        period = %aggregate.period,
        total_minutes = aggregate.total_minutes,
        "Monthly aggregate saved"
    );
    Ok(Json(aggregate))
}

/// Handler for DELETE /aggregates/:id.
async fn delete_aggregate_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    state
        .ledger()
        .store()
        .delete_aggregate(id)
        .map_err(|err| failed(correlation_id, "delete_aggregate", err))?;
    info!(correlation_id = %correlation_id, aggregate_id = %id, "Monthly aggregate deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /rates.
async fn list_rates_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<HourlyRate>>> {
    let correlation_id = Uuid::new_v4();
    let rates = state
        .ledger()
        .store()
        .rate_history()
        .map_err(|err| failed(correlation_id, "list_rates", err))?;
    Ok(Json(rates))
}

/// Handler for POST /rates.
async fn create_rate_handler(
    State(state): State<AppState>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HourlyRate>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let rate = RateInput::try_from(request)
        .and_then(|input| state.ledger().store().create_rate(input))
        .map_err(|err| failed(correlation_id, "create_rate", err))?;
    info!(
        correlation_id = %correlation_id,
        rate_id = %rate.id,
        rate = %rate.rate,
        effective_from = %rate.effective_from,
        "Hourly rate added"
    );
    Ok((StatusCode::CREATED, Json(rate)))
}

/// Handler for PUT /rates/:id.
async fn update_rate_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> ApiResult<Json<HourlyRate>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let rate = RateInput::try_from(request)
        .and_then(|input| state.ledger().store().update_rate(id, input))
        .map_err(|err| failed(correlation_id, "update_rate", err))?;
    info!(correlation_id = %correlation_id, rate_id = %id, "Hourly rate updated");
    Ok(Json(rate))
}

/// Handler for DELETE /rates/:id.
async fn delete_rate_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    state
        .ledger()
        .store()
        .delete_rate(id)
        .map_err(|err| failed(correlation_id, "delete_rate", err))?;
    info!(correlation_id = %correlation_id, rate_id = %id, "Hourly rate deleted");
    Ok(StatusCode::NO_CONTENT)
}
