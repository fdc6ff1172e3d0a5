//! # IO Module
//!
//! The HTTP interface in front of the report service. Handlers translate query
//! strings into `ReportParams`, call the service and map `ReportError` to
//! status codes. No report logic lives here.

pub mod rest;
