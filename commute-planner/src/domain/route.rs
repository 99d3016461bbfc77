//! Normalized travel-time result.

use chrono::Duration;

/// A travel-time estimate for one leg of the commute.
///
/// `traffic_data_included` records whether the figure reflects traffic
/// conditions for the requested departure time or is a traffic-free
/// fallback estimate. The flag propagates to anything aggregated from
/// this value: a round-trip total is traffic-accurate only if both of
/// its legs are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteInfo {
    /// Total travel time in seconds.
    pub travel_time_secs: u32,
    /// Whether the backend confirmed traffic-adjusted figures.
    pub traffic_data_included: bool,
}

impl RouteInfo {
    pub fn new(travel_time_secs: u32, traffic_data_included: bool) -> Self {
        Self {
            travel_time_secs,
            traffic_data_included,
        }
    }

    /// Travel time as a chrono duration, for date arithmetic.
    pub fn travel_time(&self) -> Duration {
        Duration::seconds(i64::from(self.travel_time_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_time_duration() {
        let info = RouteInfo::new(1800, true);
        assert_eq!(info.travel_time(), Duration::minutes(30));
    }
}
