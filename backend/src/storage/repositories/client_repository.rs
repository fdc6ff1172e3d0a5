use anyhow::{Context, Result};
use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite};

use crate::domain::models::{ClientLoanLink, ClientRecord};
use crate::storage::connection::{format_stored_date, parse_stored_date, DbConnection};
use crate::storage::traits::ClientFilter;

/// Repository for `customer_info` rows
#[derive(Clone)]
pub struct ClientRepository {
    db: DbConnection,
}

impl ClientRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a client record. Only used when seeding the store.
    pub async fn store_client(&self, client: &ClientRecord) -> Result<()> {
        Self::upsert_client(self.db.pool(), client).await
    }

    /// Insert or replace a client on any executor, so seeding can batch rows
    /// inside one transaction
    pub async fn upsert_client<'e, E>(executor: E, client: &ClientRecord) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO customer_info
                (t_id, account_officer, l_date_recog, date_of_birth,
                 member_status, unit_name, center_name, customer_name)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.id)
        .bind(&client.officer_id)
        .bind(format_stored_date(client.recognition_date))
        .bind(client.date_of_birth.map(format_stored_date))
        .bind(&client.member_status)
        .bind(&client.unit_name)
        .bind(&client.center_name)
        .bind(&client.name)
        .execute(executor)
        .await
        .with_context(|| format!("failed to store client {}", client.id))?;
        Ok(())
    }

    /// List clients for an officer recognized within the filter's date range
    pub async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<ClientRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT t_id, account_officer, l_date_recog, date_of_birth,
                   member_status, unit_name, center_name, customer_name
            FROM customer_info
            WHERE account_officer = ?
              AND date(l_date_recog) BETWEEN ? AND ?
              AND (? IS NULL OR member_status = ?)
            ORDER BY t_id
            "#,
        )
        .bind(&filter.officer_id)
        .bind(format_stored_date(filter.start_date))
        .bind(format_stored_date(filter.end_date))
        .bind(filter.member_status.as_deref())
        .bind(filter.member_status.as_deref())
        .fetch_all(self.db.pool())
        .await
        .context("failed to query customer_info")?;

        rows.iter().map(client_from_row).collect()
    }

    /// List clients left-joined to the loan accounts that reference them
    pub async fn list_client_loan_links(&self, filter: &ClientFilter) -> Result<Vec<ClientLoanLink>> {
        let rows = sqlx::query(
            r#"
            SELECT ci.t_id AS client_id,
                   ci.center_name AS center_name,
                   la.customer AS loan_customer,
                   la.bill_status AS bill_status
            FROM customer_info ci
            LEFT JOIN loan_acct la ON ci.t_id = la.customer
            WHERE ci.account_officer = ?
              AND date(ci.l_date_recog) BETWEEN ? AND ?
              AND (? IS NULL OR ci.member_status = ?)
            ORDER BY ci.t_id, la.t_id
            "#,
        )
        .bind(&filter.officer_id)
        .bind(format_stored_date(filter.start_date))
        .bind(format_stored_date(filter.end_date))
        .bind(filter.member_status.as_deref())
        .bind(filter.member_status.as_deref())
        .fetch_all(self.db.pool())
        .await
        .context("failed to query customer_info joined to loan_acct")?;

        rows.iter()
            .map(|row| -> Result<ClientLoanLink> {
                Ok(ClientLoanLink {
                    client_id: row.try_get("client_id")?,
                    center_name: row.try_get("center_name")?,
                    loan_customer: row.try_get("loan_customer")?,
                    bill_status: row.try_get("bill_status")?,
                })
            })
            .collect()
    }
}

fn client_from_row(row: &SqliteRow) -> Result<ClientRecord> {
    let id: String = row.try_get("t_id")?;
    let recognized: String = row.try_get("l_date_recog")?;
    let date_of_birth: Option<String> = row.try_get("date_of_birth")?;

    Ok(ClientRecord {
        recognition_date: parse_stored_date(&recognized)
            .with_context(|| format!("client {} has an unreadable recognition date", id))?,
        date_of_birth: date_of_birth
            .as_deref()
            .map(parse_stored_date)
            .transpose()
            .with_context(|| format!("client {} has an unreadable date of birth", id))?,
        officer_id: row.try_get("account_officer")?,
        member_status: row.try_get("member_status")?,
        unit_name: row.try_get("unit_name")?,
        center_name: row.try_get("center_name")?,
        name: row.try_get("customer_name")?,
        id,
    })
}
