//! Domain-level query types.
//!
//! `ReportParams` carries the raw strings pulled off a request; the validator
//! turns it into a `ReportQuery` that the report service can trust.

use chrono::NaiveDate;

use crate::storage::traits::{ClientFilter, LoanAccountFilter};

/// Unvalidated report inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportParams {
    pub account_officer: String,
    pub start_date: String,
    pub end_date: String,
    pub member_status: Option<String>,
}

impl ReportParams {
    pub fn new(account_officer: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            account_officer: account_officer.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            member_status: None,
        }
    }

    pub fn with_member_status(mut self, member_status: &str) -> Self {
        self.member_status = Some(member_status.to_string());
        self
    }
}

/// Validated report inputs scoped to one officer and an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub officer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Status used by reports that filter on it; defaults to "Active"
    pub member_status: String,
}

impl ReportQuery {
    /// Clients of any status
    pub fn client_filter(&self) -> ClientFilter {
        ClientFilter {
            officer_id: self.officer_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            member_status: None,
        }
    }

    /// Clients restricted to the requested member status
    pub fn client_filter_by_status(&self) -> ClientFilter {
        ClientFilter {
            member_status: Some(self.member_status.clone()),
            ..self.client_filter()
        }
    }

    pub fn loan_account_filter(&self, product_assigned_only: bool) -> LoanAccountFilter {
        LoanAccountFilter {
            officer_id: self.officer_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            product_assigned_only,
        }
    }
}
