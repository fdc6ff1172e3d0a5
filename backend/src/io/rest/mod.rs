//! # REST API Interface Layer
//!
//! Account officer dashboard endpoints, all `GET` under `/AO-dashboard`.
//!
//! - `InvalidParameters` becomes `400` with the validation reason
//! - `QueryExecutionFailure` becomes `500` with a generic message; the cause
//!   chain is logged and never returned

pub mod dashboard_apis;
