//! # CSV Seeding
//!
//! Loads snapshot exports of the two record collections into the SQLite store.
//! A seed directory may contain `clients.csv` and/or `loan_accounts.csv`; the
//! header row uses the store's column names.

use anyhow::{Context, Result};
use csv::Reader;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Sqlite, Transaction};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::domain::models::{ClientRecord, LoanAccountRecord};
use crate::storage::connection::{parse_stored_date, DbConnection};
use crate::storage::repositories::{ClientRepository, LoanAccountRepository};

pub const CLIENTS_FILE: &str = "clients.csv";
pub const LOAN_ACCOUNTS_FILE: &str = "loan_accounts.csv";

#[derive(Debug, Deserialize)]
struct ClientRow {
    t_id: String,
    account_officer: String,
    l_date_recog: String,
    date_of_birth: Option<String>,
    member_status: String,
    unit_name: String,
    center_name: String,
    customer_name: String,
}

impl ClientRow {
    fn into_record(self) -> Result<ClientRecord> {
        Ok(ClientRecord {
            recognition_date: parse_stored_date(&self.l_date_recog)?,
            date_of_birth: self.date_of_birth.as_deref().map(parse_stored_date).transpose()?,
            id: self.t_id,
            officer_id: self.account_officer,
            member_status: self.member_status,
            unit_name: self.unit_name,
            center_name: self.center_name,
            name: self.customer_name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LoanAccountRow {
    t_id: String,
    account_officer: String,
    customer: Option<String>,
    opening_date: String,
    bill_type: Option<String>,
    bill_status: Option<String>,
    online_actual_bal: Option<String>,
    account_title_1: Option<String>,
}

impl LoanAccountRow {
    fn into_record(self) -> Result<LoanAccountRecord> {
        Ok(LoanAccountRecord {
            opening_date: parse_stored_date(&self.opening_date)?,
            balance: self
                .online_actual_bal
                .as_deref()
                .map(|raw| Decimal::from_str(raw.trim()))
                .transpose()?,
            id: self.t_id,
            officer_id: self.account_officer,
            customer: self.customer,
            bill_type: self.bill_type,
            bill_status: self.bill_status,
            account_title: self.account_title_1,
        })
    }
}

/// Number of rows loaded by a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub clients: usize,
    pub loan_accounts: usize,
}

/// Imports CSV snapshots into the record store.
///
/// Rows are upserted by identifier inside a single transaction, so re-running
/// an import is safe and a bad row leaves the store untouched.
pub struct RecordImporter {
    db: DbConnection,
}

impl RecordImporter {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Import every known file found in `dir`. Missing files are skipped.
    pub async fn import_dir(&self, dir: &Path) -> Result<ImportSummary> {
        info!("Seeding record store from {}", dir.display());
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .context("failed to start seeding transaction")?;

        match import_files(&mut tx, dir).await {
            Ok(summary) => {
                tx.commit().await.context("failed to commit seeded records")?;
                info!(
                    "Seeded {} clients and {} loan accounts",
                    summary.clients, summary.loan_accounts
                );
                Ok(summary)
            }
            Err(e) => {
                tx.rollback().await.context("failed to roll back seeding")?;
                Err(e)
            }
        }
    }
}

async fn import_files(tx: &mut Transaction<'_, Sqlite>, dir: &Path) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    let clients_path = dir.join(CLIENTS_FILE);
    if clients_path.exists() {
        for (line, row) in read_rows::<ClientRow>(&clients_path)?.into_iter().enumerate() {
            let client = row
                .into_record()
                .with_context(|| format!("{} row {}", CLIENTS_FILE, line + 1))?;
            ClientRepository::upsert_client(&mut **tx, &client).await?;
            summary.clients += 1;
        }
    } else {
        warn!("No {} in {}, skipping clients", CLIENTS_FILE, dir.display());
    }

    let loans_path = dir.join(LOAN_ACCOUNTS_FILE);
    if loans_path.exists() {
        for (line, row) in read_rows::<LoanAccountRow>(&loans_path)?.into_iter().enumerate() {
            let account = row
                .into_record()
                .with_context(|| format!("{} row {}", LOAN_ACCOUNTS_FILE, line + 1))?;
            LoanAccountRepository::upsert_loan_account(&mut **tx, &account).await?;
            summary.loan_accounts += 1;
        }
    } else {
        warn!("No {} in {}, skipping loan accounts", LOAN_ACCOUNTS_FILE, dir.display());
    }

    Ok(summary)
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = Reader::from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result.with_context(|| format!("failed to parse {}", path.display()))?);
    }
    Ok(rows)
}
