//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for one-off payroll calculation,
//! stored payroll runs, record status changes, loans and overtime.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculatePayrollRequest, GenerateRunRequest, LoansQuery, NewLoanRequest, NewOvertimeRequest,
    RecordsQuery, StatusUpdateRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
