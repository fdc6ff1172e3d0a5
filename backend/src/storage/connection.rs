use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

// The database URL used when none is configured
pub const DATABASE_URL: &str = "sqlite:portfolio.db";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// DbConnection owns the pooled handle to the record store
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .with_context(|| format!("failed to connect to {}", url))?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the record tables.
    ///
    /// Dates are ISO-8601 text; `opening_date` may carry a time component.
    /// Balances are decimal text so no precision is lost to REAL.
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customer_info (
                t_id TEXT PRIMARY KEY,
                account_officer TEXT NOT NULL,
                l_date_recog TEXT NOT NULL,
                date_of_birth TEXT,
                member_status TEXT NOT NULL,
                unit_name TEXT NOT NULL,
                center_name TEXT NOT NULL,
                customer_name TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_customer_info_officer_recog
            ON customer_info(account_officer, l_date_recog);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS loan_acct (
                t_id TEXT PRIMARY KEY,
                account_officer TEXT NOT NULL,
                customer TEXT,
                opening_date TEXT NOT NULL,
                bill_type TEXT,
                bill_status TEXT,
                online_actual_bal TEXT,
                account_title_1 TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_loan_acct_officer_opening
            ON loan_acct(account_officer, opening_date);
            "#,
        )
        .execute(pool)
        .await?;

        // Center summary joins on this column
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_loan_acct_customer
            ON loan_acct(customer);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// Format a calendar date the way the store keeps it
pub fn format_stored_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a stored date, ignoring any time component after the calendar date
pub fn parse_stored_date(value: &str) -> Result<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("invalid stored date '{}'", value))
}
