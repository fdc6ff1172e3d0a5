use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loan account as held by the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAccountRecord {
    pub id: String,
    pub officer_id: String,
    /// Client identifier this account belongs to, if any
    pub customer: Option<String>,
    /// Governs range filtering and week buckets
    pub opening_date: NaiveDate,
    pub bill_type: Option<String>,
    pub bill_status: Option<String>,
    /// Outstanding balance as stored (negative for money owed)
    pub balance: Option<Decimal>,
    /// Product name
    pub account_title: Option<String>,
}

impl LoanAccountRecord {
    /// Product-assigned accounts are the only ones that count toward capital build-up
    pub fn is_product_assigned(&self) -> bool {
        self.bill_type.is_some()
    }
}

/// Sum stored balances and flip the sign so the result reads as a positive magnitude.
///
/// Accounts without a balance are skipped, matching SQL `SUM` over NULLs. A
/// total outside the `Decimal` range is an error.
pub fn sign_normalized_sum<'a, I>(accounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = &'a LoanAccountRecord>,
{
    let stored = accounts
        .into_iter()
        .filter_map(|account| account.balance)
        .try_fold(Decimal::ZERO, |total, balance| total.checked_add(balance))
        .ok_or_else(|| anyhow!("loan balance total is out of range"))?;
    Ok((-stored).normalize())
}
