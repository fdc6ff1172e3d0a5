use chrono::NaiveDate;
use shared::DEFAULT_MEMBER_STATUS;

use super::commands::{ReportParams, ReportQuery};
use super::errors::ReportError;

pub const MISSING_PARAMETERS: &str = "Missing required parameters";

/// Validate and normalize raw report parameters.
///
/// Officer id, start date and end date are required; surrounding whitespace is
/// ignored. Dates must be `YYYY-MM-DD` and the range must not be inverted. A
/// blank or absent member status becomes "Active".
pub fn validate(params: &ReportParams) -> Result<ReportQuery, ReportError> {
    let officer_id = params.account_officer.trim();
    let start = params.start_date.trim();
    let end = params.end_date.trim();

    if officer_id.is_empty() || start.is_empty() || end.is_empty() {
        return Err(ReportError::invalid(MISSING_PARAMETERS));
    }

    let start_date = parse_date("start_date", start)?;
    let end_date = parse_date("end_date", end)?;

    if start_date > end_date {
        return Err(ReportError::invalid(format!(
            "start_date {} is after end_date {}",
            start_date, end_date
        )));
    }

    let member_status = params
        .member_status
        .as_deref()
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .unwrap_or(DEFAULT_MEMBER_STATUS)
        .to_string();

    Ok(ReportQuery {
        officer_id: officer_id.to_string(),
        start_date,
        end_date,
        member_status,
    })
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ReportError::invalid(format!("Invalid {} '{}', expected YYYY-MM-DD", name, value))
    })
}
