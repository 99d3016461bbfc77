//! The departure-time sweep.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::domain::{Coordinates, RouteInfo};
use crate::providers::{ProviderError, RouteProvider};

use super::config::ScanConfig;

/// Error that aborts a scan.
///
/// Per-candidate route failures are not errors at this level; they
/// skip the candidate and the sweep continues.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// An endpoint address could not be geocoded, so no candidate can
    /// be priced at all.
    #[error("could not geocode {role} address {address:?}: {source}")]
    Geocoding {
        role: &'static str,
        address: String,
        #[source]
        source: ProviderError,
    },

    /// The configured grid does not produce valid local times on the
    /// requested date (bad hour, or a DST gap swallowed it).
    #[error("departure hour {hour} is not a valid local time on {date} in {timezone}")]
    InvalidGrid {
        date: NaiveDate,
        hour: u32,
        timezone: Tz,
    },
}

/// Request for a commute scan.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Free-text home address.
    pub home_address: String,

    /// Free-text work address.
    pub work_address: String,

    /// Calendar date to analyze.
    pub date: NaiveDate,

    /// Timezone the departure grid is expressed in.
    pub timezone: Tz,

    /// Lunch break added to the fixed workday (minutes).
    pub lunch_mins: u32,
}

/// One fully-priced candidate departure.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub leave_home: DateTime<Tz>,
    pub morning: RouteInfo,
    pub arrive_work: DateTime<Tz>,
    pub leave_work: DateTime<Tz>,
    pub evening: RouteInfo,
}

impl Scenario {
    /// Total time on the road, both legs.
    pub fn total_travel_secs(&self) -> u32 {
        self.morning.travel_time_secs + self.evening.travel_time_secs
    }

    /// The round trip reflects traffic only when both legs do.
    pub fn traffic_data_included(&self) -> bool {
        self.morning.traffic_data_included && self.evening.traffic_data_included
    }
}

/// Sweeps the departure grid against a provider.
pub struct Scanner<'a> {
    provider: &'a dyn RouteProvider,
    config: &'a ScanConfig,
}

impl<'a> Scanner<'a> {
    pub fn new(provider: &'a dyn RouteProvider, config: &'a ScanConfig) -> Self {
        Self { provider, config }
    }

    /// Run the sweep.
    ///
    /// Geocodes each endpoint address exactly once, then prices every
    /// candidate on the grid in order. Candidates whose morning or
    /// evening leg cannot be priced are skipped.
    pub async fn scan(&self, request: &ScanRequest) -> Result<Vec<Scenario>, ScanError> {
        let home = self.geocode_endpoint("home", &request.home_address).await?;
        let work = self.geocode_endpoint("work", &request.work_address).await?;

        let mut current = self.local_time(request, self.config.start_hour)?;
        let end = self.local_time(request, self.config.end_hour)?;

        let mut scenarios = Vec::new();

        while current <= end {
            info!(departure = %current.format("%I:%M %p"), "analyzing candidate departure");

            // Courtesy pause so back-to-back probes stay under provider
            // rate limits.
            tokio::time::sleep(self.config.pause()).await;

            if let Some(scenario) = self.probe(home, work, current, request).await {
                scenarios.push(scenario);
            }

            current += self.config.step();
        }

        Ok(scenarios)
    }

    async fn geocode_endpoint(
        &self,
        role: &'static str,
        address: &str,
    ) -> Result<Coordinates, ScanError> {
        self.provider
            .geocode(address)
            .await
            .map_err(|source| ScanError::Geocoding {
                role,
                address: address.to_string(),
                source,
            })
    }

    fn local_time(&self, request: &ScanRequest, hour: u32) -> Result<DateTime<Tz>, ScanError> {
        request
            .date
            .and_hms_opt(hour, 0, 0)
            .and_then(|naive| request.timezone.from_local_datetime(&naive).earliest())
            .ok_or(ScanError::InvalidGrid {
                date: request.date,
                hour,
                timezone: request.timezone,
            })
    }

    /// Price one candidate: morning leg, derived workday, evening leg.
    async fn probe(
        &self,
        home: Coordinates,
        work: Coordinates,
        leave_home: DateTime<Tz>,
        request: &ScanRequest,
    ) -> Option<Scenario> {
        let morning = match self.provider.route(home, work, leave_home).await {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    departure = %leave_home.format("%I:%M %p"),
                    error = %e,
                    "skipping candidate: morning route failed"
                );
                return None;
            }
        };

        let arrive_work = leave_home + morning.travel_time();
        let leave_work =
            arrive_work + self.config.workday() + Duration::minutes(i64::from(request.lunch_mins));

        let evening = match self.provider.route(work, home, leave_work).await {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    departure = %leave_home.format("%I:%M %p"),
                    work_departure = %leave_work.format("%I:%M %p"),
                    error = %e,
                    "skipping candidate: evening route failed"
                );
                return None;
            }
        };

        Some(Scenario {
            leave_home,
            morning,
            arrive_work,
            leave_work,
            evening,
        })
    }
}

/// The next upcoming weekday: Friday and Saturday roll over to Monday,
/// everything else to the following day.
pub fn next_weekday(today: NaiveDate) -> NaiveDate {
    let days_ahead = match today.weekday() {
        Weekday::Fri => 3,
        Weekday::Sat => 2,
        _ => 1,
    };
    today + Duration::days(days_ahead)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Timelike;
    use chrono_tz::America::Los_Angeles;
    use proptest::prelude::*;

    use super::*;

    /// Provider double over a fixed pair of endpoints, with call
    /// counting and scripted per-hour failures.
    struct GridProvider {
        home: Coordinates,
        work: Coordinates,
        geocode_calls: AtomicUsize,
        route_calls: AtomicUsize,
        fail_geocoding: bool,
        fail_morning_at_hour: Option<u32>,
        evening_traffic: bool,
    }

    impl GridProvider {
        fn new() -> Self {
            Self {
                home: Coordinates::new(33.92, -118.33).unwrap(),
                work: Coordinates::new(33.68, -117.83).unwrap(),
                geocode_calls: AtomicUsize::new(0),
                route_calls: AtomicUsize::new(0),
                fail_geocoding: false,
                fail_morning_at_hour: None,
                evening_traffic: true,
            }
        }
    }

    #[async_trait::async_trait]
    impl RouteProvider for GridProvider {
        async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
            self.geocode_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_geocoding {
                return Err(ProviderError::NoResult {
                    query: address.to_string(),
                });
            }
            if address.contains("home") {
                Ok(self.home)
            } else {
                Ok(self.work)
            }
        }

        async fn route(
            &self,
            origin: Coordinates,
            _destination: Coordinates,
            depart_at: DateTime<Tz>,
        ) -> Result<RouteInfo, ProviderError> {
            self.route_calls.fetch_add(1, Ordering::SeqCst);

            let is_morning = origin == self.home;
            if is_morning && Some(depart_at.hour()) == self.fail_morning_at_hour {
                return Err(ProviderError::NoResult {
                    query: "scripted failure".to_string(),
                });
            }

            if is_morning {
                Ok(RouteInfo::new(1800, true))
            } else {
                Ok(RouteInfo::new(2100, self.evening_traffic))
            }
        }

        fn name(&self) -> &'static str {
            "grid test double"
        }
    }

    fn request() -> ScanRequest {
        ScanRequest {
            home_address: "home street 1".to_string(),
            work_address: "work avenue 2".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            timezone: Los_Angeles,
            lunch_mins: 30,
        }
    }

    fn fast_config() -> ScanConfig {
        ScanConfig {
            pause_ms: 0,
            ..ScanConfig::default()
        }
    }

    #[tokio::test]
    async fn round_trip_totals_and_derived_times() {
        let provider = GridProvider::new();
        let config = fast_config();
        let scanner = Scanner::new(&provider, &config);

        let scenarios = scanner.scan(&request()).await.unwrap();

        // 06:00 through 10:00 at 30-minute steps
        assert_eq!(scenarios.len(), 9);

        let first = &scenarios[0];
        assert_eq!(first.leave_home.format("%H:%M").to_string(), "06:00");
        // 1800 s morning leg
        assert_eq!(first.arrive_work.format("%H:%M").to_string(), "06:30");
        // 8 h workday + 30 min lunch
        assert_eq!(first.leave_work.format("%H:%M").to_string(), "15:00");
        assert_eq!(first.total_travel_secs(), 3900);
        assert!(first.traffic_data_included());
    }

    #[tokio::test]
    async fn aggregate_traffic_flag_is_and_of_legs() {
        let provider = GridProvider {
            evening_traffic: false,
            ..GridProvider::new()
        };
        let config = fast_config();
        let scanner = Scanner::new(&provider, &config);

        let scenarios = scanner.scan(&request()).await.unwrap();

        let first = &scenarios[0];
        assert!(first.morning.traffic_data_included);
        assert!(!first.evening.traffic_data_included);
        assert!(!first.traffic_data_included());
    }

    #[tokio::test]
    async fn geocodes_each_endpoint_exactly_once() {
        let provider = GridProvider::new();
        let config = fast_config();
        let scanner = Scanner::new(&provider, &config);

        scanner.scan(&request()).await.unwrap();

        assert_eq!(provider.geocode_calls.load(Ordering::SeqCst), 2);
        // Two route calls per candidate
        assert_eq!(provider.route_calls.load(Ordering::SeqCst), 18);
    }

    #[tokio::test]
    async fn failed_candidate_is_skipped_not_fatal() {
        let provider = GridProvider {
            fail_morning_at_hour: Some(7),
            ..GridProvider::new()
        };
        let config = ScanConfig {
            start_hour: 6,
            end_hour: 8,
            step_mins: 60,
            ..fast_config()
        };
        let scanner = Scanner::new(&provider, &config);

        let scenarios = scanner.scan(&request()).await.unwrap();

        let hours: Vec<u32> = scenarios.iter().map(|s| s.leave_home.hour()).collect();
        assert_eq!(hours, vec![6, 8]);
    }

    #[tokio::test]
    async fn geocoding_failure_aborts_before_any_routing() {
        let provider = GridProvider {
            fail_geocoding: true,
            ..GridProvider::new()
        };
        let config = fast_config();
        let scanner = Scanner::new(&provider, &config);

        let err = scanner.scan(&request()).await.unwrap_err();

        assert!(matches!(err, ScanError::Geocoding { role: "home", .. }));
        assert_eq!(provider.route_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn next_weekday_rolls_weekends_to_monday() {
        // 2026-08-07 is a Friday
        let friday = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        let monday = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();

        assert_eq!(next_weekday(friday), monday);
        assert_eq!(next_weekday(saturday), monday);
        assert_eq!(next_weekday(sunday), monday);
        assert_eq!(
            next_weekday(monday),
            NaiveDate::from_ymd_opt(2026, 8, 11).unwrap()
        );
    }

    proptest! {
        #[test]
        fn next_weekday_always_lands_on_a_weekday(offset in 0i64..3650) {
            let today = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset);
            let next = next_weekday(today);

            prop_assert!(next > today);
            prop_assert!(next - today <= Duration::days(3));
            prop_assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }
}
