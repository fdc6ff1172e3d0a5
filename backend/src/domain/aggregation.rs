//! Grouping and aggregation over already-filtered record sets.
//!
//! Each function makes a single pass over its input. Reports that append a
//! synthetic total row accumulate the grouped and ungrouped figures in that
//! same pass and concatenate at the end.

use anyhow::Result;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use shared::{
    AgeGroupCounts, CapitalBuildUp, CenterSummary, ClientInfo, LoanAccountTotal, ProductCount,
    StatusCount, WeeklyCapitalBuildUp, WeeklyCount, CAPITAL_BUILD_UP_TITLE, TOTAL_CENTERS_LABEL,
    TOTAL_CLIENT_LABEL,
};

use super::bucketing::{age_in_years, AgeBracket, WeekOfMonth};
use super::models::{sign_normalized_sum, ClientLoanLink, ClientRecord, LoanAccountRecord};

/// Client count per membership status followed by the "Total Client" row
pub fn status_counts(clients: &[ClientRecord]) -> Vec<StatusCount> {
    let mut by_status: BTreeMap<&str, u64> = BTreeMap::new();
    let mut total = 0;

    for client in clients {
        *by_status.entry(client.member_status.as_str()).or_default() += 1;
        total += 1;
    }

    by_status
        .into_iter()
        .map(|(status, count)| StatusCount {
            particulars: status.to_string(),
            count,
        })
        .chain(std::iter::once(StatusCount {
            particulars: TOTAL_CLIENT_LABEL.to_string(),
            count: total,
        }))
        .collect()
}

/// Count and sign-normalized balance per bill type.
///
/// Accounts without a bill type form their own group (listed first). Only
/// assigned bill types are counted, so that group always reports a count of 0
/// while still carrying its amount.
pub fn loan_account_totals(accounts: &[LoanAccountRecord]) -> Result<Vec<LoanAccountTotal>> {
    let mut by_bill_type: BTreeMap<Option<&str>, Vec<&LoanAccountRecord>> = BTreeMap::new();
    for account in accounts {
        by_bill_type
            .entry(account.bill_type.as_deref())
            .or_default()
            .push(account);
    }

    by_bill_type
        .into_iter()
        .map(|(bill_type, group)| {
            let count = group.iter().filter(|a| a.is_product_assigned()).count() as u64;
            Ok(LoanAccountTotal {
                particulars: bill_type.map(str::to_string),
                count,
                amount: sign_normalized_sum(group)?,
            })
        })
        .collect()
}

/// Capital raised across product-assigned accounts
pub fn capital_build_up(accounts: &[LoanAccountRecord]) -> Result<CapitalBuildUp> {
    Ok(CapitalBuildUp {
        title: CAPITAL_BUILD_UP_TITLE.to_string(),
        total_capital: sign_normalized_sum(accounts.iter().filter(|a| a.is_product_assigned()))?,
    })
}

/// Age demographics as of `today`.
///
/// Clients without a birth date, or younger than 18, only count toward `total`.
pub fn age_group_counts(clients: &[ClientRecord], today: NaiveDate) -> AgeGroupCounts {
    let mut counts = AgeGroupCounts::default();

    for client in clients {
        counts.total += 1;

        let bracket = client
            .date_of_birth
            .and_then(|dob| AgeBracket::for_age(age_in_years(dob, today)));
        let slot = match bracket {
            Some(AgeBracket::From18To29) => &mut counts.age_18_29,
            Some(AgeBracket::From30To39) => &mut counts.age_30_39,
            Some(AgeBracket::From40To49) => &mut counts.age_40_49,
            Some(AgeBracket::From50To59) => &mut counts.age_50_59,
            Some(AgeBracket::From60To69) => &mut counts.age_60_69,
            Some(AgeBracket::From70To79) => &mut counts.age_70_79,
            Some(AgeBracket::From80) => &mut counts.age_80_plus,
            None => continue,
        };
        *slot += 1;
    }

    counts
}

/// Loan account count per product name; accounts without a product are not counted
pub fn product_counts(accounts: &[LoanAccountRecord]) -> Vec<ProductCount> {
    let mut by_product: BTreeMap<&str, u64> = BTreeMap::new();
    for title in accounts.iter().filter_map(|a| a.account_title.as_deref()) {
        *by_product.entry(title).or_default() += 1;
    }

    by_product
        .into_iter()
        .map(|(product_name, count)| ProductCount {
            product_name: product_name.to_string(),
            count,
        })
        .collect()
}

/// Distinct client ids qualifying for each center summary metric
#[derive(Default)]
struct CenterTally<'a> {
    clients: HashSet<&'a str>,
    with_loans: HashSet<&'a str>,
    without_loans: HashSet<&'a str>,
    past_due: HashSet<&'a str>,
}

impl<'a> CenterTally<'a> {
    fn record(&mut self, link: &'a ClientLoanLink) {
        let id = link.client_id.as_str();
        self.clients.insert(id);
        if link.has_loan() {
            self.with_loans.insert(id);
        } else {
            self.without_loans.insert(id);
        }
        if link.is_past_due() {
            self.past_due.insert(id);
        }
    }

    fn summarize(&self, center_name: &str) -> CenterSummary {
        CenterSummary {
            center_name: center_name.to_string(),
            no_of_clients: self.clients.len() as u64,
            with_loans: self.with_loans.len() as u64,
            without_loans: self.without_loans.len() as u64,
            past_due: self.past_due.len() as u64,
        }
    }
}

/// Per-center coverage followed by the "Total Centers" row.
///
/// A client joined to several loan accounts is counted once per metric.
pub fn center_summaries(links: &[ClientLoanLink]) -> Vec<CenterSummary> {
    let mut by_center: BTreeMap<&str, CenterTally> = BTreeMap::new();
    let mut overall = CenterTally::default();

    for link in links {
        by_center.entry(link.center_name.as_str()).or_default().record(link);
        overall.record(link);
    }

    by_center
        .iter()
        .map(|(center_name, tally)| tally.summarize(center_name))
        .chain(std::iter::once(overall.summarize(TOTAL_CENTERS_LABEL)))
        .collect()
}

/// Client count per (membership status, week of month) plus one
/// "Total Client" row per week present, ordered by label then week
pub fn weekly_status_counts(clients: &[ClientRecord]) -> Vec<WeeklyCount> {
    let mut by_status_week: BTreeMap<(&str, WeekOfMonth), u64> = BTreeMap::new();
    let mut totals_by_week: BTreeMap<WeekOfMonth, u64> = BTreeMap::new();

    for client in clients {
        let week = WeekOfMonth::of(client.recognition_date);
        *by_status_week.entry((client.member_status.as_str(), week)).or_default() += 1;
        *totals_by_week.entry(week).or_default() += 1;
    }

    let mut rows: Vec<WeeklyCount> = by_status_week
        .into_iter()
        .map(|((status, week), count)| (status, week, count))
        .chain(
            totals_by_week
                .into_iter()
                .map(|(week, count)| (TOTAL_CLIENT_LABEL, week, count)),
        )
        .map(|(particulars, week, count)| WeeklyCount {
            particulars: particulars.to_string(),
            week: week.label().to_string(),
            count,
        })
        .collect();

    rows.sort_by(|a, b| (&a.particulars, &a.week).cmp(&(&b.particulars, &b.week)));
    rows
}

/// Capital build-up per week of month over product-assigned accounts, ordered by week
pub fn weekly_capital_build_up(accounts: &[LoanAccountRecord]) -> Result<Vec<WeeklyCapitalBuildUp>> {
    let mut by_week: BTreeMap<WeekOfMonth, Vec<&LoanAccountRecord>> = BTreeMap::new();
    for account in accounts.iter().filter(|a| a.is_product_assigned()) {
        by_week
            .entry(WeekOfMonth::of(account.opening_date))
            .or_default()
            .push(account);
    }

    by_week
        .into_iter()
        .map(|(week, group)| {
            Ok(WeeklyCapitalBuildUp {
                title: CAPITAL_BUILD_UP_TITLE.to_string(),
                week: week.label().to_string(),
                total_capital: sign_normalized_sum(group)?,
            })
        })
        .collect()
}

/// Format a recognition date for the roster, e.g. `Mar. 05, 2024`
pub fn format_recognition_date(date: NaiveDate) -> String {
    date.format("%b. %d, %Y").to_string()
}

/// One roster row per client, in input order
pub fn client_roster(clients: &[ClientRecord]) -> Vec<ClientInfo> {
    clients
        .iter()
        .map(|client| ClientInfo {
            unit_name: client.unit_name.clone(),
            center_name: client.center_name.clone(),
            cid: client.id.clone(),
            client_name: client.name.clone(),
            date_recognized: format_recognition_date(client.recognition_date),
            member_status: client.member_status.clone(),
        })
        .collect()
}
