//! # Domain Module
//!
//! Portfolio reporting for account officers: parameter validation, date
//! bucketing and the aggregations behind each dashboard report.
//!
//! ## Components
//!
//! - **validation.rs** - raw parameters to a trusted `ReportQuery`
//! - **bucketing.rs** - week-of-month and age bracket rules
//! - **aggregation.rs** - pure grouping over already-filtered records
//! - **report_service.rs** - validate, load, aggregate
//!
//! Nothing in this layer writes to the record store.

pub mod aggregation;
pub mod bucketing;
pub mod commands;
pub mod errors;
pub mod models;
pub mod report_service;
pub mod validation;

pub use commands::{ReportParams, ReportQuery};
pub use errors::ReportError;
pub use report_service::ReportService;
