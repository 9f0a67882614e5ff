//! Analytics - read-only aggregation over the live collections
//!
//! Everything here is a linear scan recomputed on demand. Collection
//! sizes are tiny, so there is no caching or incremental maintenance.

use serde::{Deserialize, Serialize};

use crate::domain::{Cow, Location, Robot, RobotStatus};

/// Sum of daily yields across the herd, litres
pub fn total_yield_today(cows: &[Cow]) -> f64 {
    cows.iter().map(|c| c.daily_yield).sum()
}

pub fn active_robots(robots: &[Robot]) -> usize {
    robots
        .iter()
        .filter(|r| r.status == RobotStatus::Active)
        .count()
}

/// Sessions completed today across all robots
pub fn total_sessions_today(robots: &[Robot]) -> u32 {
    robots.iter().map(|r| r.sessions_today).sum()
}

/// Cows queued for milking
pub fn waiting_cows(cows: &[Cow]) -> usize {
    cows.iter()
        .filter(|c| c.location == Location::Waiting)
        .count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Weekly trend + report export
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEntry {
    pub day: String,
    #[serde(rename = "yield")]
    pub yield_litres: u32,
    pub sessions: u32,
    pub efficiency: u32,
}

/// Fixed weekly sample with the "Today" row computed from the live herd.
/// The historical rows are illustrative seed numbers, same as the source.
pub fn weekly_data(cows: &[Cow]) -> Vec<WeeklyEntry> {
    let fixed = [
        ("Monday", 245, 52, 85),
        ("Tuesday", 267, 58, 92),
        ("Wednesday", 289, 61, 100),
        ("Thursday", 234, 49, 81),
        ("Friday", 278, 59, 96),
        ("Saturday", 256, 54, 89),
    ];
    let mut data: Vec<WeeklyEntry> = fixed
        .iter()
        .map(|&(day, y, s, e)| WeeklyEntry {
            day: day.to_string(),
            yield_litres: y,
            sessions: s,
            efficiency: e,
        })
        .collect();
    data.push(WeeklyEntry {
        day: "Today".to_string(),
        yield_litres: total_yield_today(cows).round() as u32,
        sessions: 45,
        efficiency: 88,
    });
    data
}

/// The report bundle written by the export command. The legacy UI offered
/// "PDF" and "Excel" buttons; both wrote this JSON document and the
/// format tag is all that differed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: String,
    pub total_yield: f64,
    pub active_robots: usize,
    pub weekly_data: Vec<WeeklyEntry>,
    pub export_date: String,
    pub format: String,
}

impl Report {
    pub fn build(robots: &[Robot], cows: &[Cow], period: &str, format: &str) -> Self {
        Self {
            period: period.to_string(),
            total_yield: total_yield_today(cows),
            active_robots: active_robots(robots),
            weekly_data: weekly_data(cows),
            export_date: chrono::Utc::now().to_rfc3339(),
            format: format.to_string(),
        }
    }
}

/// Dated default file name for a report export
pub fn report_file_name() -> String {
    format!("milking-report-{}.json", chrono::Local::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn totals_over_seed_data() {
        let cows = seed::cows();
        let robots = seed::robots();
        assert!((total_yield_today(&cows) - 117.6).abs() < 1e-9);
        assert_eq!(active_robots(&robots), 1);
        assert_eq!(total_sessions_today(&robots), 63);
        assert_eq!(waiting_cows(&cows), 2);
    }

    #[test]
    fn weekly_data_ends_with_live_today_row() {
        let cows = seed::cows();
        let data = weekly_data(&cows);
        assert_eq!(data.len(), 7);
        assert_eq!(data[0].day, "Monday");
        let today = data.last().unwrap();
        assert_eq!(today.day, "Today");
        assert_eq!(today.yield_litres, 118); // 117.6 rounded
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = Report::build(&seed::robots(), &seed::cows(), "week", "pdf");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["period"], "week");
        assert!(json["totalYield"].is_number());
        assert_eq!(json["activeRobots"], 1);
        assert_eq!(json["weeklyData"].as_array().unwrap().len(), 7);
        assert!(json["exportDate"].is_string());
        assert_eq!(json["weeklyData"][0]["yield"], 245);
    }

    #[test]
    fn empty_collections_are_fine() {
        assert_eq!(total_yield_today(&[]), 0.0);
        assert_eq!(active_robots(&[]), 0);
        assert_eq!(waiting_cows(&[]), 0);
        let data = weekly_data(&[]);
        assert_eq!(data.last().unwrap().yield_litres, 0);
    }
}
