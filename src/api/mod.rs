//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoint that runs payroll for a period
//! from employee records and attendance rows posted as JSON.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AttendanceRequest, PayrollRequest};
pub use response::{ApiError, ApiErrorResponse, DeductionLine, PayrollResponse, PayslipResponse};
pub use state::AppState;
