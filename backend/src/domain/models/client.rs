use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A client (member) as held by the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub officer_id: String,
    /// Date the client was recognized; governs range filtering and week buckets
    pub recognition_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub member_status: String,
    pub unit_name: String,
    pub center_name: String,
    pub name: String,
}

/// One row of the client ⟕ loan account join used by the center summary.
///
/// A client without loans yields exactly one link with `loan_customer == None`;
/// a client with several loans yields one link per loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLoanLink {
    pub client_id: String,
    pub center_name: String,
    pub loan_customer: Option<String>,
    pub bill_status: Option<String>,
}

impl ClientLoanLink {
    pub fn has_loan(&self) -> bool {
        self.loan_customer.is_some()
    }

    pub fn is_past_due(&self) -> bool {
        self.bill_status.as_deref() == Some(super::PAST_DUE_STATUS)
    }
}
