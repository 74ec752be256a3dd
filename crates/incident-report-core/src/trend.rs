//! # Trend Series
//!
//! Data behind the QPPO2 chart: per-incident resolution times, their daily
//! mean, and a trailing average of the daily means, drawn against the
//! technical specification limit.

use crate::config::ChartConfig;
use crate::duration::Sev3Record;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Mean resolution time of the incidents reported on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyMean {
    pub day: NaiveDate,
    pub mean_days: f64,
    pub incidents: usize,
}

/// Everything the chart renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub title: String,
    /// (reported, days open) per non-excluded Sev3 incident.
    pub points: Vec<(NaiveDateTime, f64)>,
    /// Ascending by day.
    pub daily: Vec<DailyMean>,
    /// Trailing mean over `window` daily rows; `None` until the window fills.
    pub rolling: Vec<(NaiveDate, Option<f64>)>,
    pub window: usize,
    pub baseline_days: f64,
    /// Inclusive X range: January 1 of the report year through the report date.
    pub x_range: (NaiveDate, NaiveDate),
    /// Y range in days.
    pub y_range: (f64, f64),
}

impl TrendSeries {
    /// Build the series from Sev3 records. Excluded tickets are skipped.
    #[must_use]
    pub fn from_sev3(sev3: &[Sev3Record], as_of: NaiveDate, config: &ChartConfig) -> Self {
        let points: Vec<_> = sev3
            .iter()
            .filter(|r| !r.excluded)
            .map(|r| (r.incident.reported, r.open_days))
            .collect();

        let daily = daily_means(&points);
        let rolling = rolling_mean(&daily, config.rolling_window);
        let year_start = NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(as_of);

        Self {
            title: format!("SEV3 Incident Resolution Over Time, {}", as_of.year()),
            points,
            daily,
            rolling,
            window: config.rolling_window,
            baseline_days: config.baseline_days,
            x_range: (year_start, as_of),
            y_range: (0.0, config.y_max_days),
        }
    }

    /// Whether a point falls inside both axis ranges.
    #[must_use]
    pub fn in_view(&self, day: NaiveDate, days_open: f64) -> bool {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        day >= x0 && day <= x1 && days_open >= y0 && days_open <= y1
    }
}

/// Group points by calendar day of report and average them.
#[must_use]
pub fn daily_means(points: &[(NaiveDateTime, f64)]) -> Vec<DailyMean> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (reported, days) in points {
        let entry = by_day.entry(reported.date()).or_insert((0.0, 0));
        entry.0 += days;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(day, (sum, count))| DailyMean {
            day,
            mean_days: sum / count as f64,
            incidents: count,
        })
        .collect()
}

/// Trailing mean over the last `window` daily rows.
///
/// Rows, not calendar days: days with no incidents do not count.
#[must_use]
pub fn rolling_mean(daily: &[DailyMean], window: usize) -> Vec<(NaiveDate, Option<f64>)> {
    let window = window.max(1);
    daily
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let value = (i + 1 >= window).then(|| {
                let slice = &daily[i + 1 - window..=i];
                slice.iter().map(|d| d.mean_days).sum::<f64>() / window as f64
            });
            (row.day, value)
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::tests::incident;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 3, d).unwrap_or_default()
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, 0, 0).unwrap_or_default()
    }

    fn daily(values: &[f64]) -> Vec<DailyMean> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DailyMean {
                day: day(i as u32 + 1),
                mean_days: *v,
                incidents: 1,
            })
            .collect()
    }

    fn record(reported: NaiveDateTime, open_days: f64, excluded: bool) -> Sev3Record {
        let mut i = incident("X", 3, Some(3));
        i.reported = reported;
        Sev3Record {
            incident: i,
            still_open: false,
            open_days,
            excluded,
            compliance_concern: false,
        }
    }

    #[test]
    fn daily_means_group_by_calendar_day() {
        let points = vec![(at(2, 9), 4.0), (at(1, 9), 1.0), (at(2, 17), 2.0)];
        let means = daily_means(&points);

        assert_eq!(means.len(), 2);
        assert_eq!(means[0].day, day(1));
        assert_eq!(means[1].day, day(2));
        assert!((means[1].mean_days - 3.0).abs() < 1e-9);
        assert_eq!(means[1].incidents, 2);
    }

    #[test]
    fn rolling_mean_waits_for_full_window() {
        let rolled = rolling_mean(&daily(&[1.0, 2.0, 3.0, 4.0]), 3);
        let values: Vec<_> = rolled.iter().map(|(_, v)| *v).collect();

        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert!(values[2].is_some_and(|v| (v - 2.0).abs() < 1e-9));
        assert!(values[3].is_some_and(|v| (v - 3.0).abs() < 1e-9));
    }

    #[test]
    fn series_skips_excluded_and_sets_ranges() {
        let as_of = NaiveDate::from_ymd_opt(2017, 6, 22).unwrap_or_default();
        let sev3 = vec![
            record(at(1, 9), 5.0, false),
            record(at(2, 9), 50.0, true),
            record(at(3, 9), 7.0, false),
        ];

        let series = TrendSeries::from_sev3(&sev3, as_of, &ChartConfig::default());

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.daily.len(), 2);
        assert!(series.rolling.iter().all(|(_, v)| v.is_none()));
        assert_eq!(series.title, "SEV3 Incident Resolution Over Time, 2017");
        assert_eq!(series.x_range.0, NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default());
        assert_eq!(series.x_range.1, as_of);
        assert!((series.baseline_days - 21.0).abs() < 1e-9);
    }

    #[test]
    fn in_view_clips_to_axes() {
        let as_of = NaiveDate::from_ymd_opt(2017, 6, 22).unwrap_or_default();
        let series = TrendSeries::from_sev3(&[], as_of, &ChartConfig::default());

        assert!(series.in_view(day(10), 3.0));
        assert!(!series.in_view(day(10), 40.0));
        assert!(!series.in_view(NaiveDate::from_ymd_opt(2016, 12, 31).unwrap_or_default(), 3.0));
        assert!(!series.in_view(NaiveDate::from_ymd_opt(2017, 6, 23).unwrap_or_default(), 3.0));
    }

    proptest! {
        #[test]
        fn rolling_mean_preserves_length_and_prefix(
            values in proptest::collection::vec(0.0f64..100.0, 0..28),
            window in 1usize..10,
        ) {
            let rows = daily(&values);
            let rolled = rolling_mean(&rows, window);

            prop_assert_eq!(rolled.len(), rows.len());
            for (i, (d, v)) in rolled.iter().enumerate() {
                prop_assert_eq!(*d, rows[i].day);
                prop_assert_eq!(v.is_some(), i + 1 >= window);
                if let Some(v) = v {
                    prop_assert!(*v >= 0.0 && *v <= 100.0);
                }
            }
        }
    }
}
