//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{PayrollInputs, generate_payroll};
use crate::error::EngineError;
use crate::models::{Loan, OvertimeRecord};

use super::request::{
    CalculatePayrollRequest, GenerateRunRequest, LoansQuery, NewLoanRequest, NewOvertimeRequest,
    RecordsQuery, StatusUpdateRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/runs", post(generate_run_handler))
        .route("/payroll/records", get(list_records_handler))
        .route("/payroll/records/:id/status", patch(update_status_handler))
        .route("/loans", post(add_loan_handler).get(list_loans_handler))
        .route("/overtime", post(add_overtime_handler))
        .route("/overtime/:id/approve", post(approve_overtime_handler))
        .route("/overtime/:id/reject", post(reject_overtime_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

fn engine_error_response(correlation_id: Uuid, err: EngineError, context: &str) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "{}", context);
    error_response(err.into())
}

/// Unwraps a JSON body or builds the 400 response for it.
fn parse_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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

    Err(error_response(ApiErrorResponse::bad_request(error)))
}

/// Unwraps a query string or builds the 400 response for it.
fn parse_query<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, Response> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "Query string error"
            );
            Err(error_response(ApiErrorResponse::bad_request(
                ApiError::validation_error(body_text),
            )))
        }
    }
}

/// Handler for POST /payroll/calculate.
///
/// Runs payroll over the roster and ledgers in the body without storing
/// anything.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculatePayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll calculation request");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return engine_error_response(correlation_id, err, "Invalid pay period"),
    };

    let start_time = Instant::now();
    let inputs = PayrollInputs::new(&request.employees, &request.overtime, &request.loans)
        .with_adjustments(&request.adjustments);

    match generate_payroll(&inputs, &period, state.config().policy()) {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                employees = run.totals.employee_count,
                rejected = run.rejections.len(),
                net_pay = %run.totals.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll calculation completed"
            );
            json_response(StatusCode::OK, run)
        }
        Err(err) => engine_error_response(correlation_id, err, "Payroll calculation failed"),
    }
}

/// Handler for POST /payroll/runs.
///
/// Generates and stores payroll for a period from the ledger's roster.
async fn generate_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return engine_error_response(correlation_id, err, "Invalid pay period"),
    };

    let start_time = Instant::now();
    let result = state
        .ledger()
        .write()
        .await
        .generate_payroll(&period, &request.adjustments);

    match result {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                period_start = %period.start_date,
                period_end = %period.end_date,
                employees = run.totals.employee_count,
                rejected = run.rejections.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Payroll run stored"
            );
            json_response(StatusCode::CREATED, run)
        }
        Err(err) => engine_error_response(correlation_id, err, "Payroll run failed"),
    }
}

/// Handler for GET /payroll/records.
async fn list_records_handler(
    State(state): State<AppState>,
    query: Result<Query<RecordsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };

    let period = match query.period() {
        Ok(period) => period,
        Err(err) => return engine_error_response(correlation_id, err, "Invalid pay period"),
    };

    let ledger = state.ledger().read().await;
    let records: Vec<_> = match &period {
        Some(period) => ledger.records_by_period(period).into_iter().cloned().collect(),
        None => ledger.records().to_vec(),
    };

    info!(
        correlation_id = %correlation_id,
        records = records.len(),
        filtered = period.is_some(),
        "Listed payroll records"
    );
    json_response(StatusCode::OK, records)
}

/// Handler for PATCH /payroll/records/:id/status.
async fn update_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %id, "Processing status update");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let Ok(record_id) = Uuid::parse_str(&id) else {
        warn!(correlation_id = %correlation_id, record_id = %id, "Malformed record id");
        return error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
            format!("Payroll record id '{}' is not a UUID", id),
        )));
    };

    let paid_on = request
        .payment_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let result = state
        .ledger()
        .write()
        .await
        .update_status(record_id, request.status, paid_on);

    match result {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error_response(correlation_id, err, "Status update failed"),
    }
}

/// Handler for POST /loans.
async fn add_loan_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewLoanRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = state.ledger().write().await.add_loan(Loan::from(request));
    match result {
        Ok(loan) => {
            info!(correlation_id = %correlation_id, loan_id = %loan.id, "Loan created");
            json_response(StatusCode::CREATED, loan)
        }
        Err(err) => engine_error_response(correlation_id, err, "Loan rejected"),
    }
}

/// Handler for GET /loans.
async fn list_loans_handler(
    State(state): State<AppState>,
    query: Result<Query<LoansQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let query = match parse_query(correlation_id, query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    let ledger = state.ledger().read().await;
    let loans: Vec<Loan> = match &query.employee_id {
        Some(employee_id) => ledger
            .loans_by_employee(employee_id)
            .into_iter()
            .cloned()
            .collect(),
        None => ledger.loans().to_vec(),
    };
    json_response(StatusCode::OK, loans)
}

/// Handler for POST /overtime.
async fn add_overtime_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewOvertimeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = state
        .ledger()
        .write()
        .await
        .add_overtime(OvertimeRecord::from(request));
    match result {
        Ok(record) => {
            info!(correlation_id = %correlation_id, overtime_id = %record.id, "Overtime filed");
            json_response(StatusCode::CREATED, record)
        }
        Err(err) => engine_error_response(correlation_id, err, "Overtime rejected"),
    }
}

/// Handler for POST /overtime/:id/approve.
async fn approve_overtime_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.ledger().write().await.approve_overtime(&id);
    match result {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error_response(correlation_id, err, "Overtime approval failed"),
    }
}

/// Handler for POST /overtime/:id/reject.
async fn reject_overtime_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.ledger().write().await.reject_overtime(&id);
    match result {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => engine_error_response(correlation_id, err, "Overtime rejection failed"),
    }
}
