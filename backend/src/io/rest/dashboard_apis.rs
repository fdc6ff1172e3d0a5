//! # REST API for the Account Officer Dashboard
//!
//! One `GET` endpoint per report. Every endpoint takes `account_officer`,
//! `start_date` and `end_date` as query parameters; the client roster also
//! honours `member_status`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::{ReportError, ReportParams};
use crate::AppState;
use shared::ErrorResponse;

/// Query string accepted by every dashboard endpoint.
///
/// Fields are optional so that a missing parameter reaches validation and is
/// reported as a 400 with a reason instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub account_officer: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub member_status: Option<String>,
}

impl From<DashboardQuery> for ReportParams {
    fn from(query: DashboardQuery) -> Self {
        ReportParams {
            account_officer: query.account_officer.unwrap_or_default(),
            start_date: query.start_date.unwrap_or_default(),
            end_date: query.end_date.unwrap_or_default(),
            member_status: query.member_status,
        }
    }
}

/// Create a router for the dashboard APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/AO-dashboard", get(get_status_counts))
        .route("/AO-dashboard/", get(get_status_counts))
        .route("/AO-dashboard/Total-loans", get(get_loan_account_totals))
        .route("/AO-dashboard/age-group", get(get_age_group_counts))
        .route("/AO-dashboard/capital", get(get_capital_build_up))
        .route("/AO-dashboard/products-count", get(get_product_counts))
        .route("/AO-dashboard/center-summary", get(get_center_summary))
        .route("/AO-dashboard/weekly-client-count", get(get_weekly_status_counts))
        .route("/AO-dashboard/weekly-capital-build", get(get_weekly_capital_build_up))
        .route("/AO-dashboard/clients-report", get(get_client_roster))
}

/// Membership status counts with the "Total Client" row
pub async fn get_status_counts(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/ - query: {:?}", query);
    let result = state.report_service.status_counts(&query.into()).await;
    report_response("Failed to get total values", result)
}

/// Loan account count and amount per bill type
pub async fn get_loan_account_totals(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/Total-loans - query: {:?}", query);
    let result = state.report_service.loan_account_totals(&query.into()).await;
    report_response("Failed to get loan account totals", result)
}

pub async fn get_age_group_counts(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/age-group - query: {:?}", query);
    let result = state.report_service.age_group_counts(&query.into()).await;
    report_response("Failed to get age group counts", result)
}

/// Capital build-up, returned as a single-row array
pub async fn get_capital_build_up(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/capital - query: {:?}", query);
    let result = state
        .report_service
        .capital_build_up(&query.into())
        .await
        .map(|capital| vec![capital]);
    report_response("Failed to get capital build-up total", result)
}

pub async fn get_product_counts(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/products-count - query: {:?}", query);
    let result = state.report_service.product_counts(&query.into()).await;
    report_response("Failed to get product counts", result)
}

pub async fn get_center_summary(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/center-summary - query: {:?}", query);
    let result = state.report_service.center_summary(&query.into()).await;
    report_response("Failed to get center summary", result)
}

pub async fn get_weekly_status_counts(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/weekly-client-count - query: {:?}", query);
    let result = state.report_service.weekly_status_counts(&query.into()).await;
    report_response("Failed to get weekly customer count", result)
}

pub async fn get_weekly_capital_build_up(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/weekly-capital-build - query: {:?}", query);
    let result = state.report_service.weekly_capital_build_up(&query.into()).await;
    report_response("Failed to get weekly capital build-up total", result)
}

/// Clients with the requested member status ("Active" when omitted)
pub async fn get_client_roster(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    info!("GET /AO-dashboard/clients-report - query: {:?}", query);
    let result = state.report_service.client_roster(&query.into()).await;
    report_response("Failed to get active clients", result)
}

/// Map a report result to a response; `failure` is the body returned on a 500
fn report_response<T: Serialize>(failure: &str, result: Result<T, ReportError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(ReportError::InvalidParameters(reason)) => {
            warn!("Rejected request: {}", reason);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: reason })).into_response()
        }
        Err(ReportError::QueryExecutionFailure(cause)) => {
            error!("{}: {:#}", failure, cause);
            let body = ErrorResponse {
                error: failure.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
