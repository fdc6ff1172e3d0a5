//! Shared fixtures for storage and domain tests.
//!
//! Every `TestEnvironment` owns its own in-memory database, so tests never see
//! each other's rows.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::models::{ClientRecord, LoanAccountRecord};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::{ClientRepository, LoanAccountRepository};
use crate::storage::sqlite_store::SqliteRecordStore;
use crate::storage::traits::RecordStore;

pub struct TestEnvironment {
    pub db: DbConnection,
    pub clients: ClientRepository,
    pub loan_accounts: LoanAccountRepository,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let db = DbConnection::init_test().await?;
        Ok(Self {
            clients: ClientRepository::new(db.clone()),
            loan_accounts: LoanAccountRepository::new(db.clone()),
            db,
        })
    }

    pub fn record_store(&self) -> Arc<dyn RecordStore> {
        Arc::new(SqliteRecordStore::new(self.db.clone()))
    }

    pub async fn add_clients(&self, clients: Vec<ClientRecord>) -> Result<()> {
        for client in &clients {
            self.clients.store_client(client).await?;
        }
        Ok(())
    }

    pub async fn add_loan_accounts(&self, accounts: Vec<LoanAccountRecord>) -> Result<()> {
        for account in &accounts {
            self.loan_accounts.store_loan_account(account).await?;
        }
        Ok(())
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("test dates are YYYY-MM-DD")
}

pub fn money(value: &str) -> Decimal {
    Decimal::from_str(value).expect("test amounts are decimal literals")
}

/// A client in "Unit A" / "Center 1" with no date of birth
pub fn client(id: &str, officer: &str, recognized: &str, status: &str) -> ClientRecord {
    ClientRecord {
        id: id.to_string(),
        officer_id: officer.to_string(),
        recognition_date: date(recognized),
        date_of_birth: None,
        member_status: status.to_string(),
        unit_name: "Unit A".to_string(),
        center_name: "Center 1".to_string(),
        name: format!("Client {}", id),
    }
}

/// A loan account with no bill status and no product name
pub fn loan(
    id: &str,
    officer: &str,
    customer: Option<&str>,
    opened: &str,
    bill_type: Option<&str>,
    balance: Option<&str>,
) -> LoanAccountRecord {
    LoanAccountRecord {
        id: id.to_string(),
        officer_id: officer.to_string(),
        customer: customer.map(str::to_string),
        opening_date: date(opened),
        bill_type: bill_type.map(str::to_string),
        bill_status: None,
        balance: balance.map(money),
        account_title: None,
    }
}
