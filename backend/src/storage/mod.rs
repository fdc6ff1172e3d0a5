//! # Storage Module
//!
//! Read access to the record store that holds client and loan account records.
//!
//! The domain layer depends only on the `RecordStore` trait. The store is
//! constructed once at startup and handed to the report service, so there is
//! no global connection state.
//!
//! ## Components
//!
//! - **connection.rs** - pooled SQLite handle and schema setup
//! - **repositories/** - `customer_info` and `loan_acct` queries
//! - **sqlite_store.rs** - `RecordStore` over the repositories
//! - **csv/** - seeding the store from CSV snapshots

pub mod connection;
pub mod csv;
pub mod repositories;
pub mod sqlite_store;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use connection::DbConnection;
pub use repositories::{ClientRepository, LoanAccountRepository};
pub use sqlite_store::SqliteRecordStore;
pub use traits::{ClientFilter, LoanAccountFilter, RecordStore};
