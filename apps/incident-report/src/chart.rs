//! QPPO2 trend chart.
//!
//! Draws per-incident resolution times, the technical specification limit
//! and the rolling average with plotters' SVG backend. SVG text is written
//! as markup, so no font has to be installed on the host.

use chrono::{NaiveDate, TimeDelta};
use incident_report_core::TrendSeries;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;
use tracing::debug;

pub const POINTS_LABEL: &str = "Incident Resolution Time";
pub const BASELINE_LABEL: &str = "Technical Specification Limit";
pub const ROLLING_COLOR: RGBColor = RGBColor(0xD5, 0x5E, 0x00);

const POINT_SIZE: u32 = 4;
const FONT: &str = "sans-serif";

type DayChart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// The series mapped to day offsets from the start of the X range.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub start: NaiveDate,
    pub x_max: f64,
    pub y_range: (f64, f64),
    pub baseline: f64,
    pub points: Vec<(f64, f64)>,
    pub rolling: Vec<(f64, f64)>,
    pub window: usize,
    pub title: String,
}

impl PlotData {
    /// Project the series onto the chart's axes, dropping what is out of view.
    ///
    /// Incidents are placed on the day they were reported.
    #[must_use]
    pub fn from_series(series: &TrendSeries) -> Self {
        let (start, end) = series.x_range;
        let offset = |day: NaiveDate| (day - start).num_days() as f64;

        let points = series
            .points
            .iter()
            .filter(|(reported, days)| series.in_view(reported.date(), *days))
            .map(|(reported, days)| (offset(reported.date()), *days))
            .collect();

        let rolling = series
            .rolling
            .iter()
            .filter_map(|(day, value)| value.map(|v| (*day, v)))
            .filter(|(day, v)| series.in_view(*day, *v))
            .map(|(day, v)| (offset(day), v))
            .collect();

        Self {
            start,
            x_max: offset(end).max(1.0),
            y_range: series.y_range,
            baseline: series.baseline_days,
            points,
            rolling,
            window: series.window,
            title: series.title.clone(),
        }
    }

    /// Axis label for a day offset.
    #[must_use]
    pub fn date_label(&self, x: f64) -> String {
        let day = self.start + TimeDelta::days(x.round() as i64);
        day.format("%Y-%m-%d").to_string()
    }
}

/// Render the chart to an SVG file.
pub fn render_chart(series: &TrendSeries, path: &Path, size: (u32, u32)) -> Result<(), String> {
    let data = PlotData::from_series(series);
    debug!(
        points = data.points.len(),
        rolling = data.rolling.len(),
        "Rendering trend chart"
    );
    draw(&data, path, size).map_err(|e| e.to_string())
}

fn draw(data: &PlotData, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, (FONT, 28))
        .margin(24)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..data.x_max, data.y_range.0..data.y_range.1)?;

    let label = |x: &f64| data.date_label(*x);
    chart
        .configure_mesh()
        .x_desc("Date Reported")
        .y_desc("Time to Resolve Incident (days)")
        .x_labels(12)
        .x_label_formatter(&label)
        .axis_desc_style((FONT, 16))
        .draw()?;

    draw_series(&mut chart, data)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font((FONT, 12))
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_series(chart: &mut DayChart<'_, '_>, data: &PlotData) -> Result<(), Box<dyn Error>> {
    chart
        .draw_series(
            data.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), POINT_SIZE, BLUE.mix(0.6).filled())),
        )?
        .label(POINTS_LABEL)
        .legend(|(x, y)| Circle::new((x, y), POINT_SIZE, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(
            [(0.0, data.baseline), (data.x_max, data.baseline)],
            BLACK.stroke_width(2),
        ))?
        .label(BASELINE_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            data.rolling.iter().copied(),
            ROLLING_COLOR.stroke_width(3),
        ))?
        .label(format!("{}-Day Rolling Average", data.window))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ROLLING_COLOR.stroke_width(3)));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use incident_report_core::trend::DailyMean;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, m, d).unwrap_or_default()
    }

    fn at(m: u32, d: u32) -> NaiveDateTime {
        day(m, d).and_hms_opt(15, 0, 0).unwrap_or_default()
    }

    fn series() -> TrendSeries {
        TrendSeries {
            title: "SEV3 Incident Resolution Over Time, 2017".into(),
            points: vec![(at(1, 2), 3.0), (at(2, 1), 50.0), (at(6, 22), 1.0)],
            daily: vec![DailyMean {
                day: day(1, 2),
                mean_days: 3.0,
                incidents: 1,
            }],
            rolling: vec![
                (day(1, 2), None),
                (day(2, 1), Some(4.0)),
                (day(3, 1), Some(40.0)),
            ],
            window: 7,
            baseline_days: 21.0,
            x_range: (day(1, 1), day(6, 22)),
            y_range: (0.0, 35.0),
        }
    }

    #[test]
    fn projects_days_and_drops_out_of_view() {
        let data = PlotData::from_series(&series());

        assert_eq!(data.points, vec![(1.0, 3.0), (172.0, 1.0)]);
        assert_eq!(data.rolling, vec![(31.0, 4.0)]);
        assert!((data.x_max - 172.0).abs() < 1e-9);
    }

    #[test]
    fn labels_offsets_as_dates() {
        let data = PlotData::from_series(&series());
        assert_eq!(data.date_label(0.0), "2017-01-01");
        assert_eq!(data.date_label(31.0), "2017-02-01");
    }

    #[test]
    fn renders_svg_with_labels() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("chart.svg");

        let result = render_chart(&series(), &path, (640, 480));
        assert!(result.is_ok(), "render failed: {result:?}");

        let svg = std::fs::read_to_string(&path).expect("chart file written");
        assert!(svg.contains("<svg"));
        assert!(svg.contains(BASELINE_LABEL));
        assert!(svg.contains("7-Day Rolling Average"));
    }
}
