use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite};
use std::str::FromStr;

use crate::domain::models::LoanAccountRecord;
use crate::storage::connection::{format_stored_date, parse_stored_date, DbConnection};
use crate::storage::traits::LoanAccountFilter;

/// Repository for `loan_acct` rows
#[derive(Clone)]
pub struct LoanAccountRepository {
    db: DbConnection,
}

impl LoanAccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a loan account. Only used when seeding the store.
    pub async fn store_loan_account(&self, account: &LoanAccountRecord) -> Result<()> {
        Self::upsert_loan_account(self.db.pool(), account).await
    }

    /// Insert or replace a loan account on any executor
    pub async fn upsert_loan_account<'e, E>(executor: E, account: &LoanAccountRecord) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO loan_acct
                (t_id, account_officer, customer, opening_date, bill_type,
                 bill_status, online_actual_bal, account_title_1)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.officer_id)
        .bind(&account.customer)
        .bind(format_stored_date(account.opening_date))
        .bind(&account.bill_type)
        .bind(&account.bill_status)
        .bind(account.balance.map(|balance| balance.to_string()))
        .bind(&account.account_title)
        .execute(executor)
        .await
        .with_context(|| format!("failed to store loan account {}", account.id))?;
        Ok(())
    }

    /// List loan accounts for an officer opened within the filter's date range.
    ///
    /// `opening_date` is compared as a calendar date even when it was stored
    /// with a time component.
    pub async fn list_loan_accounts(&self, filter: &LoanAccountFilter) -> Result<Vec<LoanAccountRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT t_id, account_officer, customer, opening_date, bill_type, bill_status,
                   CAST(online_actual_bal AS TEXT) AS online_actual_bal,
                   account_title_1
            FROM loan_acct
            WHERE account_officer = ?
              AND date(opening_date) BETWEEN ? AND ?
              AND (? = 0 OR bill_type IS NOT NULL)
            ORDER BY t_id
            "#,
        )
        .bind(&filter.officer_id)
        .bind(format_stored_date(filter.start_date))
        .bind(format_stored_date(filter.end_date))
        .bind(filter.product_assigned_only)
        .fetch_all(self.db.pool())
        .await
        .context("failed to query loan_acct")?;

        rows.iter().map(loan_account_from_row).collect()
    }
}

fn loan_account_from_row(row: &SqliteRow) -> Result<LoanAccountRecord> {
    let id: String = row.try_get("t_id")?;
    let opened: String = row.try_get("opening_date")?;
    let balance: Option<String> = row.try_get("online_actual_bal")?;

    let balance = balance
        .as_deref()
        .map(|raw| Decimal::from_str(raw.trim()))
        .transpose()
        .with_context(|| format!("loan account {} has an unreadable balance", id))?;

    Ok(LoanAccountRecord {
        opening_date: parse_stored_date(&opened)
            .with_context(|| format!("loan account {} has an unreadable opening date", id))?,
        officer_id: row.try_get("account_officer")?,
        customer: row.try_get("customer")?,
        bill_type: row.try_get("bill_type")?,
        bill_status: row.try_get("bill_status")?,
        account_title: row.try_get("account_title_1")?,
        balance,
        id,
    })
}
