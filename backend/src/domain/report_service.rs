//! Portfolio report service.
//!
//! Every operation follows the same shape: validate the raw parameters, load
//! the matching records from the store, aggregate, return. Validation failures
//! never reach the store, and a store failure fails the whole report.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

use shared::{
    AgeGroupCounts, CapitalBuildUp, CenterSummary, ClientInfo, LoanAccountTotal, ProductCount,
    StatusCount, WeeklyCapitalBuildUp, WeeklyCount,
};

use super::aggregation;
use super::commands::{ReportParams, ReportQuery};
use super::errors::ReportError;
use super::models::{ClientLoanLink, ClientRecord, LoanAccountRecord};
use super::validation::validate;
use crate::storage::traits::{ClientFilter, LoanAccountFilter, RecordStore};

/// Computes account officer portfolio reports from a read-only record store
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn RecordStore>,
    /// Reference date for ages; the local calendar date when unset
    today: Option<NaiveDate>,
}

impl ReportService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store, today: None }
    }

    /// Pin the date ages are computed against
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Client counts per membership status plus "Total Client"
    pub async fn status_counts(&self, params: &ReportParams) -> Result<Vec<StatusCount>, ReportError> {
        let query = self.validated("status counts", params)?;
        let clients = self.load_clients(&query.client_filter()).await?;
        Ok(aggregation::status_counts(&clients))
    }

    /// Loan account count and amount per bill type
    pub async fn loan_account_totals(&self, params: &ReportParams) -> Result<Vec<LoanAccountTotal>, ReportError> {
        let query = self.validated("loan account totals", params)?;
        let accounts = self.load_loan_accounts(&query.loan_account_filter(false)).await?;
        aggregation::loan_account_totals(&accounts).map_err(ReportError::QueryExecutionFailure)
    }

    /// Capital build-up over product-assigned loan accounts
    pub async fn capital_build_up(&self, params: &ReportParams) -> Result<CapitalBuildUp, ReportError> {
        let query = self.validated("capital build-up", params)?;
        let accounts = self.load_loan_accounts(&query.loan_account_filter(true)).await?;
        aggregation::capital_build_up(&accounts).map_err(ReportError::QueryExecutionFailure)
    }

    /// Client age demographics as of today
    pub async fn age_group_counts(&self, params: &ReportParams) -> Result<AgeGroupCounts, ReportError> {
        let query = self.validated("age group counts", params)?;
        let clients = self.load_clients(&query.client_filter()).await?;
        Ok(aggregation::age_group_counts(&clients, self.today()))
    }

    /// Loan account count per product
    pub async fn product_counts(&self, params: &ReportParams) -> Result<Vec<ProductCount>, ReportError> {
        let query = self.validated("product counts", params)?;
        let accounts = self.load_loan_accounts(&query.loan_account_filter(false)).await?;
        Ok(aggregation::product_counts(&accounts))
    }

    /// Client and loan coverage per center plus "Total Centers"
    pub async fn center_summary(&self, params: &ReportParams) -> Result<Vec<CenterSummary>, ReportError> {
        let query = self.validated("center summary", params)?;
        let links = self.load_client_loan_links(&query.client_filter()).await?;
        Ok(aggregation::center_summaries(&links))
    }

    /// Status counts bucketed by week of the recognition month
    pub async fn weekly_status_counts(&self, params: &ReportParams) -> Result<Vec<WeeklyCount>, ReportError> {
        let query = self.validated("weekly status counts", params)?;
        let clients = self.load_clients(&query.client_filter()).await?;
        Ok(aggregation::weekly_status_counts(&clients))
    }

    /// Capital build-up bucketed by week of the opening month
    pub async fn weekly_capital_build_up(
        &self,
        params: &ReportParams,
    ) -> Result<Vec<WeeklyCapitalBuildUp>, ReportError> {
        let query = self.validated("weekly capital build-up", params)?;
        let accounts = self.load_loan_accounts(&query.loan_account_filter(true)).await?;
        aggregation::weekly_capital_build_up(&accounts).map_err(ReportError::QueryExecutionFailure)
    }

    /// Clients with the requested member status (default "Active")
    pub async fn client_roster(&self, params: &ReportParams) -> Result<Vec<ClientInfo>, ReportError> {
        let query = self.validated("client roster", params)?;
        let clients = self.load_clients(&query.client_filter_by_status()).await?;
        Ok(aggregation::client_roster(&clients))
    }

    fn validated(&self, report: &str, params: &ReportParams) -> Result<ReportQuery, ReportError> {
        let query = validate(params)?;
        info!(
            "Computing {} for officer={} from {} to {} (status={})",
            report, query.officer_id, query.start_date, query.end_date, query.member_status
        );
        Ok(query)
    }

    async fn load_clients(&self, filter: &ClientFilter) -> Result<Vec<ClientRecord>, ReportError> {
        let clients = self
            .store
            .list_clients(filter)
            .await
            .map_err(ReportError::QueryExecutionFailure)?;
        debug!("Loaded {} client records", clients.len());
        Ok(clients)
    }

    async fn load_loan_accounts(&self, filter: &LoanAccountFilter) -> Result<Vec<LoanAccountRecord>, ReportError> {
        let accounts = self
            .store
            .list_loan_accounts(filter)
            .await
            .map_err(ReportError::QueryExecutionFailure)?;
        debug!("Loaded {} loan account records", accounts.len());
        Ok(accounts)
    }

    async fn load_client_loan_links(&self, filter: &ClientFilter) -> Result<Vec<ClientLoanLink>, ReportError> {
        let links = self
            .store
            .list_client_loan_links(filter)
            .await
            .map_err(ReportError::QueryExecutionFailure)?;
        debug!("Loaded {} client/loan rows", links.len());
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::{client, date, loan, money, TestEnvironment};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts store calls and returns nothing
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn list_clients(&self, _filter: &ClientFilter) -> anyhow::Result<Vec<ClientRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn list_loan_accounts(&self, _filter: &LoanAccountFilter) -> anyhow::Result<Vec<LoanAccountRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn list_client_loan_links(&self, _filter: &ClientFilter) -> anyhow::Result<Vec<ClientLoanLink>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    /// Fails every read as an unreachable store would
    struct UnreachableStore;

    #[async_trait]
    impl RecordStore for UnreachableStore {
        async fn list_clients(&self, _filter: &ClientFilter) -> anyhow::Result<Vec<ClientRecord>> {
            Err(anyhow!("connection refused"))
        }

        async fn list_loan_accounts(&self, _filter: &LoanAccountFilter) -> anyhow::Result<Vec<LoanAccountRecord>> {
            Err(anyhow!("connection refused"))
        }

        async fn list_client_loan_links(&self, _filter: &ClientFilter) -> anyhow::Result<Vec<ClientLoanLink>> {
            Err(anyhow!("connection refused"))
        }
    }

    fn params() -> ReportParams {
        ReportParams::new("O1", "2024-03-01", "2024-03-31")
    }

    async fn seeded_service() -> (TestEnvironment, ReportService) {
        let env = TestEnvironment::new().await.unwrap();
        env.add_clients(vec![
            ClientRecord {
                date_of_birth: Some(date("1990-01-10")),
                center_name: "North".to_string(),
                ..client("C1", "O1", "2024-03-01", "Active")
            },
            ClientRecord {
                date_of_birth: Some(date("1960-05-20")),
                center_name: "North".to_string(),
                ..client("C2", "O1", "2024-03-09", "Active")
            },
            ClientRecord {
                date_of_birth: Some(date("2010-02-02")),
                center_name: "South".to_string(),
                ..client("C3", "O1", "2024-03-29", "Inactive")
            },
            // other officer, and out of range
            client("C4", "O2", "2024-03-05", "Active"),
            client("C5", "O1", "2024-04-01", "Active"),
        ])
        .await
        .unwrap();
        env.add_loan_accounts(vec![
            LoanAccountRecord {
                bill_status: Some("DUE".to_string()),
                account_title: Some("Sikap 1".to_string()),
                ..loan("L1", "O1", Some("C1"), "2024-03-02", Some("REGULAR"), Some("-1000.00"))
            },
            LoanAccountRecord {
                account_title: Some("Sikap 1".to_string()),
                ..loan("L2", "O1", Some("C1"), "2024-03-15", Some("REGULAR"), Some("-500.50"))
            },
            LoanAccountRecord {
                account_title: Some("Agri Loan".to_string()),
                ..loan("L3", "O1", Some("C2"), "2024-03-30", Some("SEASONAL"), Some("-250"))
            },
            loan("L4", "O1", None, "2024-03-10", None, Some("-75")),
            loan("L5", "O2", Some("C4"), "2024-03-10", Some("REGULAR"), Some("-9999")),
        ])
        .await
        .unwrap();

        let service = ReportService::new(env.record_store()).with_today(date("2024-06-15"));
        (env, service)
    }

    #[tokio::test]
    async fn test_empty_officer_never_touches_the_store() {
        let store = Arc::new(CountingStore::default());
        let service = ReportService::new(store.clone());
        let bad = ReportParams::new("", "2024-03-01", "2024-03-31");

        assert!(matches!(service.status_counts(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.loan_account_totals(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.capital_build_up(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.age_group_counts(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.product_counts(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.center_summary(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.weekly_status_counts(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.weekly_capital_build_up(&bad).await, Err(ReportError::InvalidParameters(_))));
        assert!(matches!(service.client_roster(&bad).await, Err(ReportError::InvalidParameters(_))));

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_fails_the_report() {
        let service = ReportService::new(Arc::new(UnreachableStore));

        assert!(matches!(service.status_counts(&params()).await, Err(ReportError::QueryExecutionFailure(_))));
        assert!(matches!(service.center_summary(&params()).await, Err(ReportError::QueryExecutionFailure(_))));
        assert!(matches!(
            service.weekly_capital_build_up(&params()).await,
            Err(ReportError::QueryExecutionFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let store = Arc::new(CountingStore::default());
        let service = ReportService::new(store.clone());

        let counts = service.status_counts(&params()).await.unwrap();
        assert_eq!(counts, vec![StatusCount { particulars: "Total Client".to_string(), count: 0 }]);
        assert!(service.loan_account_totals(&params()).await.unwrap().is_empty());
        assert!(service.capital_build_up(&params()).await.unwrap().total_capital.is_zero());
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_status_counts_round_trip() {
        let env = TestEnvironment::new().await.unwrap();
        env.add_clients(vec![
            client("C1", "O1", "2024-03-02", "Active"),
            client("C2", "O1", "2024-03-03", "Active"),
            client("C3", "O1", "2024-03-04", "Inactive"),
        ])
        .await
        .unwrap();
        let service = ReportService::new(env.record_store());

        let mut rows: Vec<(String, u64)> = service
            .status_counts(&params())
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.particulars, r.count))
            .collect();
        rows.sort();

        assert_eq!(
            rows,
            vec![
                ("Active".to_string(), 2),
                ("Inactive".to_string(), 1),
                ("Total Client".to_string(), 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_loan_reports_against_store() {
        let (_env, service) = seeded_service().await;

        let totals = service.loan_account_totals(&params()).await.unwrap();
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].particulars, None);
        assert_eq!(totals[0].count, 0);
        assert_eq!(totals[0].amount, money("75"));
        assert_eq!(totals[1].particulars.as_deref(), Some("REGULAR"));
        assert_eq!(totals[1].count, 2);
        assert_eq!(totals[1].amount, money("1500.50"));

        let capital = service.capital_build_up(&params()).await.unwrap();
        let assigned: rust_decimal::Decimal = totals
            .iter()
            .filter(|t| t.particulars.is_some())
            .map(|t| t.amount)
            .sum();
        assert_eq!(capital.total_capital, assigned);
        assert_eq!(capital.total_capital, money("1750.50"));

        let products = service.product_counts(&params()).await.unwrap();
        assert_eq!(
            products,
            vec![
                ProductCount { product_name: "Agri Loan".to_string(), count: 1 },
                ProductCount { product_name: "Sikap 1".to_string(), count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_balance_overflow_fails_the_report() {
        let env = TestEnvironment::new().await.unwrap();
        let most_negative = rust_decimal::Decimal::MIN.to_string();
        env.add_loan_accounts(vec![
            loan("L1", "O1", None, "2024-03-02", Some("REGULAR"), Some(&most_negative)),
            loan("L2", "O1", None, "2024-03-03", Some("REGULAR"), Some(&most_negative)),
        ])
        .await
        .unwrap();
        let service = ReportService::new(env.record_store());

        assert!(matches!(
            service.loan_account_totals(&params()).await,
            Err(ReportError::QueryExecutionFailure(_))
        ));
        assert!(matches!(
            service.capital_build_up(&params()).await,
            Err(ReportError::QueryExecutionFailure(_))
        ));
        assert!(matches!(
            service.weekly_capital_build_up(&params()).await,
            Err(ReportError::QueryExecutionFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_age_groups_against_store() {
        let (_env, service) = seeded_service().await;

        let ages = service.age_group_counts(&params()).await.unwrap();
        assert_eq!(ages.age_30_39, 1);
        assert_eq!(ages.age_60_69, 1);
        assert_eq!(ages.total, 3);
        // C3 is 14
        assert_eq!(ages.bracketed(), 2);
    }

    #[tokio::test]
    async fn test_center_summary_against_store() {
        let (_env, service) = seeded_service().await;

        let rows = service.center_summary(&params()).await.unwrap();
        assert_eq!(
            rows,
            vec![
                CenterSummary {
                    center_name: "North".to_string(),
                    no_of_clients: 2,
                    with_loans: 2,
                    without_loans: 0,
                    past_due: 1,
                },
                CenterSummary {
                    center_name: "South".to_string(),
                    no_of_clients: 1,
                    with_loans: 0,
                    without_loans: 1,
                    past_due: 0,
                },
                CenterSummary {
                    center_name: "Total Centers".to_string(),
                    no_of_clients: 3,
                    with_loans: 2,
                    without_loans: 1,
                    past_due: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_weekly_reports_against_store() {
        let (_env, service) = seeded_service().await;

        let weekly: Vec<(String, String, u64)> = service
            .weekly_status_counts(&params())
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.particulars, r.week, r.count))
            .collect();
        assert_eq!(
            weekly,
            vec![
                ("Active".to_string(), "Week 1".to_string(), 1),
                ("Active".to_string(), "Week 2".to_string(), 1),
                ("Inactive".to_string(), "Week 5".to_string(), 1),
                ("Total Client".to_string(), "Week 1".to_string(), 1),
                ("Total Client".to_string(), "Week 2".to_string(), 1),
                ("Total Client".to_string(), "Week 5".to_string(), 1),
            ]
        );

        let capital = service.weekly_capital_build_up(&params()).await.unwrap();
        let by_week: Vec<(&str, rust_decimal::Decimal)> =
            capital.iter().map(|r| (r.week.as_str(), r.total_capital)).collect();
        assert_eq!(
            by_week,
            vec![
                ("Week 1", money("1000")),
                ("Week 3", money("500.50")),
                ("Week 5", money("250")),
            ]
        );
    }

    #[tokio::test]
    async fn test_client_roster_filters_by_status() {
        let (_env, service) = seeded_service().await;

        let active = service.client_roster(&params()).await.unwrap();
        let ids: Vec<&str> = active.iter().map(|c| c.cid.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
        assert_eq!(active[0].date_recognized, "Mar. 01, 2024");

        let inactive = service
            .client_roster(&params().with_member_status("Inactive"))
            .await
            .unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].cid, "C3");
    }

    #[tokio::test]
    async fn test_single_day_range_against_store() {
        let (_env, service) = seeded_service().await;

        let rows = service
            .status_counts(&ReportParams::new("O1", "2024-03-09", "2024-03-09"))
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![
                StatusCount { particulars: "Active".to_string(), count: 1 },
                StatusCount { particulars: "Total Client".to_string(), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_reports_are_idempotent() {
        let (_env, service) = seeded_service().await;

        let first = serde_json::to_vec(&service.center_summary(&params()).await.unwrap()).unwrap();
        let second = serde_json::to_vec(&service.center_summary(&params()).await.unwrap()).unwrap();
        assert_eq!(first, second);

        let first = serde_json::to_vec(&service.weekly_status_counts(&params()).await.unwrap()).unwrap();
        let second = serde_json::to_vec(&service.weekly_status_counts(&params()).await.unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
