pub mod client;
pub mod loan_account;

pub use client::{ClientLoanLink, ClientRecord};
pub use loan_account::{sign_normalized_sum, LoanAccountRecord};

/// Bill status marking a delinquent loan account
pub const PAST_DUE_STATUS: &str = "DUE";
