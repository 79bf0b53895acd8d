//! Forecast aggregation
//!
//! Collapses the provider's flat 3-hour forecast series into per-day
//! summaries. Calendar days are taken in an explicitly supplied time zone;
//! [`DayBucketing`] picks between the server's zone and the location's.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{DailySummary, ForecastPoint, ForecastSeries};

/// Days shown in the dashboard's daily forecast
pub const DEFAULT_FORECAST_DAYS: usize = 5;

/// Points shown in the dashboard's hourly strip
pub const DEFAULT_HOURLY_POINTS: usize = 10;

/// Local hours (inclusive) whose point represents the day's condition
const MIDDAY_HOURS: std::ops::RangeInclusive<u32> = 12..=14;

/// Which calendar the forecast is bucketed in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayBucketing {
    /// Calendar day of the process evaluating the forecast
    #[default]
    ServerLocal,
    /// Calendar day at the forecast location, from the provider's UTC offset
    LocationLocal,
}

/// Group forecast points by calendar date in `tz` and reduce each bucket.
///
/// Output is ordered by date ascending and contains exactly the distinct
/// dates present in the input. Points with an unrepresentable timestamp
/// are skipped.
pub fn group_by_day<Tz: TimeZone>(points: &[ForecastPoint], tz: &Tz) -> Vec<DailySummary> {
    let mut buckets: BTreeMap<NaiveDate, Vec<(&ForecastPoint, u32)>> = BTreeMap::new();

    for point in points {
        let Some(utc) = DateTime::<Utc>::from_timestamp(point.timestamp, 0) else {
            continue;
        };
        let local = utc.with_timezone(tz);
        buckets
            .entry(local.date_naive())
            .or_default()
            .push((point, local.hour()));
    }

    buckets
        .into_iter()
        .filter_map(|(date, mut items)| {
            items.sort_by_key(|(point, _)| point.timestamp);
            summarize_day(date, &items)
        })
        .collect()
}

fn summarize_day(date: NaiveDate, items: &[(&ForecastPoint, u32)]) -> Option<DailySummary> {
    let (first, _) = items.first()?;

    let (min_temp, max_temp) = items.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), (point, _)| (min.min(point.temp), max.max(point.temp)),
    );

    let representative = items
        .iter()
        .find(|(_, hour)| MIDDAY_HOURS.contains(hour))
        .map(|(point, _)| *point)
        .unwrap_or(*first);

    Some(DailySummary {
        date,
        min_temp,
        max_temp,
        condition: representative.condition.clone(),
        representative_timestamp: representative.timestamp,
    })
}

/// Day summaries truncated to the first `days` dates; never padded
pub fn daily_summaries<Tz: TimeZone>(
    points: &[ForecastPoint],
    tz: &Tz,
    days: usize,
) -> Vec<DailySummary> {
    take_days(group_by_day(points, tz), days)
}

/// Keep the first `days` summaries
pub fn take_days(mut summaries: Vec<DailySummary>, days: usize) -> Vec<DailySummary> {
    summaries.truncate(days);
    summaries
}

/// Summarize a series using the configured bucketing calendar
pub fn summarize_series(
    series: &ForecastSeries,
    bucketing: DayBucketing,
    days: usize,
) -> Vec<DailySummary> {
    match bucketing {
        DayBucketing::ServerLocal => daily_summaries(&series.points, &Local, days),
        DayBucketing::LocationLocal => {
            let offset = FixedOffset::east_opt(series.timezone_offset_seconds)
                .unwrap_or_else(|| Utc.fix());
            daily_summaries(&series.points, &offset, days)
        }
    }
}

/// First `count` points of the series, for the hourly strip
pub fn hourly(points: &[ForecastPoint], count: usize) -> &[ForecastPoint] {
    &points[..count.min(points.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    fn point(timestamp: i64, temp: f64, main: &str) -> ForecastPoint {
        ForecastPoint {
            timestamp,
            temp,
            feels_like: temp,
            humidity_percent: 50,
            wind_speed: 3.0,
            pop: 0.0,
            condition: Condition {
                code: 800,
                main: main.to_string(),
                text: main.to_lowercase(),
                icon: "01d".to_string(),
            },
        }
    }

    // 2024-07-01T00:00:00Z
    const JULY_1: i64 = 1_719_792_000;
    const HOUR: i64 = 3600;

    #[test]
    fn test_groups_by_utc_date() {
        let points: Vec<_> = (0..16)
            .map(|i| point(JULY_1 + i * 3 * HOUR, 60.0 + i as f64, "Clear"))
            .collect();

        let days = group_by_day(&points, &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(days[0].min_temp, 60.0);
        assert_eq!(days[0].max_temp, 67.0);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        assert_eq!(days[1].min_temp, 68.0);
        assert_eq!(days[1].max_temp, 75.0);
    }

    #[test]
    fn test_representative_is_midday_point() {
        let points = vec![
            point(JULY_1 + 9 * HOUR, 70.0, "Clouds"),
            point(JULY_1 + 12 * HOUR, 80.0, "Clear"),
            point(JULY_1 + 15 * HOUR, 78.0, "Rain"),
        ];

        let days = group_by_day(&points, &Utc);

        assert_eq!(days[0].condition.main, "Clear");
        assert_eq!(days[0].representative_timestamp, JULY_1 + 12 * HOUR);
    }

    #[test]
    fn test_representative_at_hour_fourteen() {
        let points = vec![
            point(JULY_1 + 2 * HOUR, 65.0, "Mist"),
            point(JULY_1 + 14 * HOUR, 81.0, "Clouds"),
        ];

        let days = group_by_day(&points, &Utc);

        assert_eq!(days[0].condition.main, "Clouds");
    }

    #[test]
    fn test_representative_falls_back_to_first_point() {
        // Partial day: only evening points, delivered out of order
        let points = vec![
            point(JULY_1 + 21 * HOUR, 66.0, "Clouds"),
            point(JULY_1 + 18 * HOUR, 70.0, "Rain"),
        ];

        let days = group_by_day(&points, &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].condition.main, "Rain");
        assert_eq!(days[0].representative_timestamp, JULY_1 + 18 * HOUR);
    }

    #[test]
    fn test_single_point_bucket() {
        let days = group_by_day(&[point(JULY_1, 55.5, "Clear")], &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min_temp, days[0].max_temp);
        assert_eq!(days[0].min_temp, 55.5);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_day(&[], &Utc).is_empty());
    }

    #[test]
    fn test_bucketing_follows_supplied_zone() {
        // 02:00 UTC on July 2nd is still July 1st in New York (UTC-4)
        let points = vec![
            point(JULY_1 + 20 * HOUR, 75.0, "Clear"),
            point(JULY_1 + 26 * HOUR, 68.0, "Clear"),
        ];
        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();

        assert_eq!(group_by_day(&points, &Utc).len(), 2);

        let local = group_by_day(&points, &new_york);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(local[0].min_temp, 68.0);
    }

    #[test]
    fn test_daily_summaries_truncates_without_padding() {
        let points: Vec<_> = (0..8)
            .map(|i| point(JULY_1 + i * 24 * HOUR, 60.0, "Clear"))
            .collect();

        assert_eq!(daily_summaries(&points, &Utc, 5).len(), 5);
        assert_eq!(daily_summaries(&points[..3], &Utc, 5).len(), 3);
    }

    #[test]
    fn test_summarize_series_location_local() {
        let series = ForecastSeries {
            location_name: "New York".to_string(),
            country: "US".to_string(),
            timezone_offset_seconds: -4 * 3600,
            units: crate::types::UnitSystem::Imperial,
            points: vec![
                point(JULY_1 + 20 * HOUR, 75.0, "Clear"),
                point(JULY_1 + 26 * HOUR, 68.0, "Clear"),
            ],
        };

        let days = summarize_series(&series, DayBucketing::LocationLocal, DEFAULT_FORECAST_DAYS);

        assert_eq!(days.len(), 1);
    }

    #[test]
    fn test_hourly_slice() {
        let points: Vec<_> = (0..4).map(|i| point(JULY_1 + i * 3 * HOUR, 60.0, "Clear")).collect();

        assert_eq!(hourly(&points, 10).len(), 4);
        assert_eq!(hourly(&points, 2).len(), 2);
        assert_eq!(hourly(&points, 2)[1].timestamp, JULY_1 + 3 * HOUR);
    }
}
