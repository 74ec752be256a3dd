//! # Config Module
//!
//! Report thresholds and chart settings.
//!
//! Every value has a default matching the QPPO2 report as it has always been
//! produced; a TOML file can override individual keys. Reading the file is
//! the app's job, this module only parses and validates text.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Impact at or above which an incident is Sev3.
pub const DEFAULT_SEV3_MIN_IMPACT: u8 = 3;

/// QPPO2 limit: Sev3 incidents close within three weeks.
pub const DEFAULT_BASELINE_DAYS: f64 = 21.0;

/// Rolling average window, in daily rows.
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// Upper bound of the chart's Y axis.
pub const DEFAULT_Y_MAX_DAYS: f64 = 35.0;

/// Summary markers of maintenance and root-cause tickets.
pub const DEFAULT_EXCLUSION_MARKERS: [&str; 2] = ["Weekly", "RCA"];

/// Date layouts tried in order. Layouts without a time part parse as
/// midnight of that day.
pub const DEFAULT_DATE_FORMATS: [&str; 12] = [
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%m/%d/%Y",
    "%Y-%m-%d",
];

/// Settings for the QPPO2 trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Technical specification limit drawn as a flat line.
    pub baseline_days: f64,
    /// Number of daily rows in the trailing average.
    pub rolling_window: usize,
    /// Top of the Y axis; points above it are not drawn.
    pub y_max_days: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            baseline_days: DEFAULT_BASELINE_DAYS,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            y_max_days: DEFAULT_Y_MAX_DAYS,
            width: 1280,
            height: 960,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub sev3_min_impact: u8,
    pub exclusion_markers: Vec<String>,
    pub date_formats: Vec<String>,
    pub chart: ChartConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sev3_min_impact: DEFAULT_SEV3_MIN_IMPACT,
            exclusion_markers: DEFAULT_EXCLUSION_MARKERS
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
            date_formats: DEFAULT_DATE_FORMATS
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
            chart: ChartConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.sev3_min_impact) {
            return Err(ReportError::Config(format!(
                "sev3_min_impact must be between 1 and 9, got {}",
                self.sev3_min_impact
            )));
        }
        if self.exclusion_markers.iter().any(|m| m.is_empty()) {
            return Err(ReportError::Config(
                "exclusion_markers must not contain empty strings".to_string(),
            ));
        }
        if self.date_formats.is_empty() {
            return Err(ReportError::Config(
                "date_formats must list at least one format".to_string(),
            ));
        }
        self.chart.validate()
    }
}

impl ChartConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.rolling_window == 0 {
            return Err(ReportError::Config(
                "chart.rolling_window must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("chart.baseline_days", self.baseline_days),
            ("chart.y_max_days", self.y_max_days),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReportError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.width < 200 || self.height < 200 {
            return Err(ReportError::Config(format!(
                "chart size {}x{} is below the 200x200 minimum",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ReportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sev3_min_impact, 3);
        assert_eq!(config.exclusion_markers, vec!["Weekly", "RCA"]);
        assert_eq!(config.chart.rolling_window, 7);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ReportConfig::from_toml_str(
            r#"
            exclusion_markers = ["Weekly", "RCA", "Patching"]

            [chart]
            baseline_days = 14.0
            "#,
        );
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.exclusion_markers.len(), 3);
        assert!((config.chart.baseline_days - 14.0).abs() < f64::EPSILON);
        assert_eq!(config.chart.rolling_window, DEFAULT_ROLLING_WINDOW);
        assert_eq!(config.sev3_min_impact, DEFAULT_SEV3_MIN_IMPACT);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = ReportConfig::from_toml_str("baseline = 21");
        assert!(matches!(result, Err(ReportError::Config(_))));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(ReportConfig::from_toml_str("sev3_min_impact = 0").is_err());
        assert!(ReportConfig::from_toml_str("date_formats = []").is_err());
        assert!(ReportConfig::from_toml_str("[chart]\nrolling_window = 0").is_err());
        assert!(ReportConfig::from_toml_str("[chart]\ny_max_days = -1.0").is_err());
        assert!(ReportConfig::from_toml_str("[chart]\nwidth = 10").is_err());
        assert!(ReportConfig::from_toml_str("exclusion_markers = [\"\"]").is_err());
    }
}
