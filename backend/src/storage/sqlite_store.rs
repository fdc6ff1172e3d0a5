use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{ClientLoanLink, ClientRecord, LoanAccountRecord};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::{ClientRepository, LoanAccountRepository};
use crate::storage::traits::{ClientFilter, LoanAccountFilter, RecordStore};

/// `RecordStore` backed by the SQLite repositories
#[derive(Clone)]
pub struct SqliteRecordStore {
    clients: ClientRepository,
    loan_accounts: LoanAccountRepository,
}

impl SqliteRecordStore {
    pub fn new(db: DbConnection) -> Self {
        Self {
            clients: ClientRepository::new(db.clone()),
            loan_accounts: LoanAccountRepository::new(db),
        }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<ClientRecord>> {
        self.clients.list_clients(filter).await
    }

    async fn list_loan_accounts(&self, filter: &LoanAccountFilter) -> Result<Vec<LoanAccountRecord>> {
        self.loan_accounts.list_loan_accounts(filter).await
    }

    async fn list_client_loan_links(&self, filter: &ClientFilter) -> Result<Vec<ClientLoanLink>> {
        self.clients.list_client_loan_links(filter).await
    }
}
