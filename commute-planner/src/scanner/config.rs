//! Scan configuration: the departure-time grid and workday shape.

use chrono::Duration;

/// Parameters for the departure-time sweep.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// First candidate departure (local hour of day).
    pub start_hour: u32,

    /// Last candidate departure (local hour of day, inclusive).
    pub end_hour: u32,

    /// Grid increment (minutes).
    pub step_mins: i64,

    /// Fixed work duration between arrival and evening departure (hours).
    pub workday_hours: i64,

    /// Courtesy pause before each candidate's probes (milliseconds),
    /// to stay clear of provider rate limits.
    pub pause_ms: u64,
}

impl ScanConfig {
    /// Returns the grid increment as a Duration.
    pub fn step(&self) -> Duration {
        Duration::minutes(self.step_mins)
    }

    /// Returns the work duration as a Duration.
    pub fn workday(&self) -> Duration {
        Duration::hours(self.workday_hours)
    }

    /// Returns the inter-candidate pause as a std Duration.
    pub fn pause(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.pause_ms)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 10,
            step_mins: 30,
            workday_hours: 8,
            pause_ms: 500,
        }
    }
}
