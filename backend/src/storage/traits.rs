//! # Storage Traits
//!
//! The read contract the report service needs from a record store. The domain
//! layer only ever talks to `RecordStore`, so the SQLite implementation can be
//! swapped for any other backend (or a test double) without touching the
//! aggregation logic.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::{ClientLoanLink, ClientRecord, LoanAccountRecord};

/// Selects client records for one officer within an inclusive recognition-date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFilter {
    pub officer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Restrict to a single membership status when set
    pub member_status: Option<String>,
}

/// Selects loan accounts for one officer within an inclusive opening-date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanAccountFilter {
    pub officer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Only accounts with a non-null bill type
    pub product_assigned_only: bool,
}

/// Read-only access to client and loan account records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Clients matching the filter, ordered by identifier
    async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<ClientRecord>>;

    /// Loan accounts matching the filter, ordered by identifier
    async fn list_loan_accounts(&self, filter: &LoanAccountFilter) -> Result<Vec<LoanAccountRecord>>;

    /// Clients matching the filter left-joined to every loan account that
    /// references them. The join itself is not restricted by officer or date.
    async fn list_client_loan_links(&self, filter: &ClientFilter) -> Result<Vec<ClientLoanLink>>;
}
