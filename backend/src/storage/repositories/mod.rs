pub mod client_repository;
pub mod loan_account_repository;

pub use client_repository::ClientRepository;
pub use loan_account_repository::LoanAccountRepository;
