//! Response types for the payroll API.
//!
//! This module defines the payroll response body, with money rounded for
//! presentation, and the error response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diagnostics::Diagnostic;
use crate::error::EngineError;
use crate::models::{DeductionKind, PayslipRecord, PeriodKey};

/// Decimal places shown for money.
const MONEY_DP: u32 = 2;

/// Decimal places shown for hours worked.
const HOURS_DP: u32 = 2;

/// Rounds a money amount for display: 2 places, halves away from zero.
pub(crate) fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds hours worked for display, halves to even.
pub(crate) fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(HOURS_DP, RoundingStrategy::MidpointNearestEven)
}

/// Response body for the `/payroll` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollResponse {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// The month paid.
    pub period: PeriodKey,
    /// One payslip per employee with hours, in identifier order.
    pub payslips: Vec<PayslipResponse>,
    /// Recoverable problems met during the run.
    pub diagnostics: Vec<Diagnostic>,
}

/// A payslip as presented to API clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipResponse {
    /// Employee identifier.
    pub employee_id: String,
    /// "First Last".
    pub employee_name: String,
    /// Job position.
    pub position: String,
    /// Hours paid, after capping.
    pub hours_worked: Decimal,
    /// Pay before deductions.
    pub gross_pay: Decimal,
    /// Itemized deductions.
    pub deductions: Vec<DeductionLine>,
    /// Sum of the deduction lines.
    pub total_deductions: Decimal,
    /// Allowances added after tax.
    pub total_allowances: Decimal,
    /// Take-home pay.
    pub net_pay: Decimal,
}

/// One rounded deduction line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionLine {
    /// Which deduction.
    pub kind: DeductionKind,
    /// Display label.
    pub label: String,
    /// Amount deducted.
    pub amount: Decimal,
}

impl From<&PayslipRecord> for PayslipResponse {
    fn from(payslip: &PayslipRecord) -> Self {
        let employee = payslip.employee();
        Self {
            employee_id: employee.id().to_string(),
            employee_name: employee.full_name(),
            position: employee.position().to_string(),
            hours_worked: round_hours(payslip.hours_worked()),
            gross_pay: round_money(payslip.gross_pay()),
            deductions: payslip
                .deductions()
                .iter()
                .map(|d| DeductionLine {
                    kind: d.kind,
                    label: d.kind.label().to_string(),
                    amount: round_money(d.amount),
                })
                .collect(),
            total_deductions: round_money(payslip.total_deductions()),
            total_allowances: round_money(payslip.total_allowances()),
            net_pay: round_money(payslip.net_pay()),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid value for '{}': {}", field, message),
                    "The request contains a value the engine cannot accept",
                ),
            },
            EngineError::SourceUnavailable { location, reason } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "SOURCE_UNAVAILABLE",
                    format!("Source unavailable: {}", location),
                    reason,
                ),
            },
        }
    }
}
