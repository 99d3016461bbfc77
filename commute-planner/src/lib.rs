//! Daily commute departure-time planner.
//!
//! Queries external mapping services for geocoding and time-dependent
//! routing, then scans a grid of candidate departure times to find the
//! one that minimizes the total round-trip commute (morning leg plus
//! evening leg around a fixed workday).

pub mod config;
pub mod domain;
pub mod providers;
pub mod report;
pub mod scanner;
