//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{AttendanceAggregator, PayrollCalculator, PayrollRun};
use crate::diagnostics::Diagnostics;
use crate::error::EngineResult;
use crate::models::{AttendanceEvent, Employee};
use crate::store::EmployeeStore;

use super::request::PayrollRequest;
use super::response::{ApiError, ApiErrorResponse, PayrollResponse, PayslipResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll", post(payroll_handler))
        .with_state(state)
}

/// Handler for POST /payroll endpoint.
///
/// Accepts employees and attendance for one period and returns the payslips.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
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
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let start_time = Instant::now();
    match process_payroll(request, state.calculator(), correlation_id) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                period = %result.period,
                payslips = result.payslips.len(),
                diagnostics = result.diagnostics.len(),
                duration_us = duration.as_micros(),
                "Payroll completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Runs payroll for one request.
///
/// Employee records are validated and stored first; a bad or repeated
/// record fails the whole request. Attendance problems only add
/// diagnostics.
fn process_payroll(
    request: PayrollRequest,
    calculator: &PayrollCalculator,
    run_id: Uuid,
) -> EngineResult<PayrollResponse> {
    let mut store = EmployeeStore::new();
    for record in request.employees {
        store.insert(Employee::new(record)?)?;
    }

    let events: Vec<AttendanceEvent> = request.attendance.into_iter().map(Into::into).collect();

    let mut diagnostics = Diagnostics::new();
    let hours = AttendanceAggregator::aggregate(&events, &mut diagnostics);
    let payslips = PayrollRun::new(calculator, &store).run(request.period, &hours, &mut diagnostics)?;

    Ok(PayrollResponse {
        run_id,
        period: request.period,
        payslips: payslips.iter().map(PayslipResponse::from).collect(),
        diagnostics: diagnostics.into_entries(),
    })
}
