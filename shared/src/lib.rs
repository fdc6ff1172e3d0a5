use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label of the synthetic row appended to membership status counts
pub const TOTAL_CLIENT_LABEL: &str = "Total Client";

/// Label of the synthetic row appended to the center summary
pub const TOTAL_CENTERS_LABEL: &str = "Total Centers";

/// Title carried by every capital build-up row
pub const CAPITAL_BUILD_UP_TITLE: &str = "Capital Build Up";

/// Member status used by the client roster when none is requested
pub const DEFAULT_MEMBER_STATUS: &str = "Active";

/// Client count for one membership status (or the "Total Client" row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub particulars: String,
    pub count: u64,
}

/// Loan accounts grouped by bill type.
///
/// `particulars` is `None` for accounts that have no bill type assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAccountTotal {
    pub particulars: Option<String>,
    pub count: u64,
    /// Sign-normalized outstanding balance (positive magnitude)
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Total capital raised across product-assigned loan accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalBuildUp {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_capital: Decimal,
}

/// Fixed-shape age demographics for an officer's clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroupCounts {
    pub age_18_29: u64,
    pub age_30_39: u64,
    pub age_40_49: u64,
    pub age_50_59: u64,
    pub age_60_69: u64,
    pub age_70_79: u64,
    pub age_80_plus: u64,
    /// Every matching client, including those outside all brackets
    pub total: u64,
}

impl AgeGroupCounts {
    /// Sum of the seven bracket counts
    pub fn bracketed(&self) -> u64 {
        self.age_18_29
            + self.age_30_39
            + self.age_40_49
            + self.age_50_59
            + self.age_60_69
            + self.age_70_79
            + self.age_80_plus
    }
}

/// Number of loan accounts per product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCount {
    pub product_name: String,
    pub count: u64,
}

/// Per-center client and loan coverage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterSummary {
    pub center_name: String,
    pub no_of_clients: u64,
    pub with_loans: u64,
    pub without_loans: u64,
    pub past_due: u64,
}

/// Client count for one membership status within one week of the month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCount {
    pub particulars: String,
    pub week: String,
    pub count: u64,
}

/// Capital build-up within one week of the month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCapitalBuildUp {
    pub title: String,
    pub week: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_capital: Decimal,
}

/// A single row of the client roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub unit_name: String,
    pub center_name: String,
    pub cid: String,
    pub client_name: String,
    /// Recognition date formatted as `Mon. DD, YYYY`
    pub date_recognized: String,
    pub member_status: String,
}

/// Error body returned by the dashboard endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
