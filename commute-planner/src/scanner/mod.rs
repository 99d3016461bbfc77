//! Scenario scanner.
//!
//! Sweeps a fixed grid of candidate departure times, asking a provider
//! for the morning and evening legs of each candidate, and collects
//! the scenarios that could be fully priced. Individual route failures
//! skip the candidate; only failing to geocode an endpoint address
//! aborts the scan.

mod config;
mod scan;

pub use config::ScanConfig;
pub use scan::{next_weekday, ScanError, ScanRequest, Scanner, Scenario};
