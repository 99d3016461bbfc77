//! Results table and recommendation rendering.
//!
//! Pure string builders over scanned scenarios; `main` does the
//! printing. A trailing asterisk marks figures computed without
//! traffic data.

use crate::scanner::Scenario;

/// Render seconds as a whole-minute figure, starred when the value
/// does not reflect traffic data.
pub fn format_duration(secs: u32, traffic_ok: bool) -> String {
    let mins = (f64::from(secs) / 60.0).round() as u32;
    if traffic_ok {
        format!("{mins} min")
    } else {
        format!("{mins} min*")
    }
}

/// Render the scenario table, best read in a monospace terminal.
pub fn render_table(scenarios: &[Scenario]) -> String {
    let mut out = String::new();

    let any_missing_traffic = scenarios.iter().any(|s| {
        !s.morning.traffic_data_included || !s.evening.traffic_data_included
    });
    if any_missing_traffic {
        out.push_str(
            "NOTE: An asterisk (*) marks travel times calculated without live traffic data.\n\n",
        );
    }

    let header =
        "| Leave Home | Morning Trip | Arrive Work | Leave Work | Evening Trip | Total Commute |";
    let divider = "-".repeat(header.len());
    out.push_str(header);
    out.push('\n');
    out.push_str(&divider);
    out.push('\n');

    for s in scenarios {
        let total = format_duration(s.total_travel_secs(), s.traffic_data_included());
        out.push_str(&format!(
            "| {:<10} | {:<12} | {:<11} | {:<10} | {:<12} | {:<13} |\n",
            s.leave_home.format("%I:%M %p").to_string(),
            format_duration(s.morning.travel_time_secs, s.morning.traffic_data_included),
            s.arrive_work.format("%I:%M %p").to_string(),
            s.leave_work.format("%I:%M %p").to_string(),
            format_duration(s.evening.travel_time_secs, s.evening.traffic_data_included),
            total,
        ));
    }

    out.push_str(&divider);
    out.push('\n');
    out
}

/// Pick the scenario with the smallest round trip and phrase the
/// recommendation. `None` when nothing was priced.
pub fn render_recommendation(scenarios: &[Scenario]) -> Option<String> {
    let best = scenarios.iter().min_by_key(|s| s.total_travel_secs())?;
    let total = format_duration(best.total_travel_secs(), best.traffic_data_included());

    Some(format!(
        "To minimize your total time on the road ({total}), leave for work at {}.",
        best.leave_home.format("%I:%M %p")
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    use crate::domain::RouteInfo;

    use super::*;

    fn scenario(leave_hour: u32, morning_secs: u32, evening_secs: u32, traffic: bool) -> Scenario {
        let leave_home = Los_Angeles
            .with_ymd_and_hms(2026, 8, 10, leave_hour, 0, 0)
            .unwrap();
        let morning = RouteInfo::new(morning_secs, traffic);
        let arrive_work = leave_home + morning.travel_time();
        let leave_work = arrive_work + chrono::Duration::hours(8) + chrono::Duration::minutes(30);
        let evening = RouteInfo::new(evening_secs, traffic);

        Scenario {
            leave_home,
            morning,
            arrive_work,
            leave_work,
            evening,
        }
    }

    #[test]
    fn duration_rounds_to_nearest_minute() {
        assert_eq!(format_duration(1800, true), "30 min");
        assert_eq!(format_duration(1829, true), "30 min");
        assert_eq!(format_duration(1831, true), "31 min");
        assert_eq!(format_duration(0, true), "0 min");
    }

    #[test]
    fn duration_stars_missing_traffic() {
        assert_eq!(format_duration(1800, false), "30 min*");
    }

    #[test]
    fn table_has_rows_and_header() {
        let scenarios = vec![scenario(6, 1800, 2100, true), scenario(7, 2400, 2700, true)];
        let table = render_table(&scenarios);

        assert!(table.contains("| Leave Home |"));
        assert!(table.contains("06:00 AM"));
        assert!(table.contains("07:00 AM"));
        assert!(table.contains("30 min"));
        assert!(!table.contains("NOTE: An asterisk"));
    }

    #[test]
    fn table_footnote_only_when_traffic_missing() {
        let scenarios = vec![scenario(6, 1800, 2100, false)];
        let table = render_table(&scenarios);

        assert!(table.contains("NOTE: An asterisk"));
        assert!(table.contains("30 min*"));
    }

    #[test]
    fn recommendation_picks_smallest_total() {
        let scenarios = vec![
            scenario(6, 1800, 2100, true),
            scenario(7, 1500, 1500, true),
            scenario(8, 2400, 2700, true),
        ];

        let text = render_recommendation(&scenarios).unwrap();
        assert!(text.contains("50 min"));
        assert!(text.contains("07:00 AM"));
    }

    #[test]
    fn recommendation_empty_when_no_scenarios() {
        assert!(render_recommendation(&[]).is_none());
    }
}
