//! # CLI Commands
//!
//! File I/O around the core pipeline, one function per subcommand.
//!
//! - `extract`: read Remedy extracts, write the workbook and the snapshot
//! - `chart`: read the snapshot, write the QPPO2 trend chart
//! - `status`: read the snapshot, print table counts

use crate::chart::render_chart;
use crate::layout::ResultsLayout;
use crate::workbook::write_workbook;
use chrono::NaiveDate;
use incident_report_core::{
    RawRecord, ReportConfig, ReportError, ReportSummary, Snapshot, TrendSeries, build_report,
    concat, decode_snapshot, encode_snapshot, parse_extract,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no extract files given")]
    NoInput,

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error(transparent)]
    Core(#[from] ReportError),

    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("chart error: {0}")]
    Chart(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Load the configuration file, or defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ReportConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(io_error(path))?;
    ReportConfig::from_toml_str(&text).map_err(|e| CliError::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse every extract, in the order given.
pub fn read_extracts(files: &[PathBuf]) -> Result<Vec<RawRecord>, CliError> {
    if files.is_empty() {
        return Err(CliError::NoInput);
    }

    let mut extracts = Vec::with_capacity(files.len());
    for path in files {
        let bytes = std::fs::read(path).map_err(io_error(path))?;
        let records = parse_extract(&bytes, &path.display().to_string())?;
        info!(file = %path.display(), rows = records.len(), "Loaded extract");
        extracts.push(records);
    }

    Ok(concat(extracts))
}

/// Load the snapshot written by `extract` for `as_of`.
pub fn load_snapshot(out_root: &Path, as_of: NaiveDate) -> Result<Snapshot, CliError> {
    let path = ResultsLayout::new(out_root, as_of).snapshot();
    let bytes = std::fs::read(&path).map_err(io_error(&path))?;
    let snapshot = decode_snapshot(&bytes)?;
    debug!(path = %path.display(), "Loaded snapshot");
    Ok(snapshot)
}

// =============================================================================
// EXTRACT COMMAND
// =============================================================================

/// Clean the extracts and write the workbook and snapshot.
pub fn cmd_extract(
    files: &[PathBuf],
    out_root: &Path,
    as_of: NaiveDate,
    config: &ReportConfig,
) -> Result<ReportSummary, CliError> {
    let records = read_extracts(files)?;
    let report = build_report(records, as_of, config);
    let summary = report.summary();

    for rejection in &report.rejections {
        debug!(
            file = %rejection.record.file,
            row = rejection.record.row,
            reason = %rejection.reason,
            "Rejected row"
        );
    }
    if summary.rejected > 0 {
        warn!(
            rejected = summary.rejected,
            "Rows moved to the Misformatted Data sheet"
        );
    }

    let layout = ResultsLayout::new(out_root, as_of);
    std::fs::create_dir_all(layout.dir()).map_err(io_error(layout.dir()))?;

    let workbook = layout.workbook();
    write_workbook(&report.tables(), &workbook)?;
    info!(path = %workbook.display(), "Wrote workbook");

    let snapshot_path = layout.snapshot();
    let bytes = encode_snapshot(&Snapshot::from(&report))?;
    std::fs::write(&snapshot_path, bytes).map_err(io_error(&snapshot_path))?;
    info!(path = %snapshot_path.display(), "Wrote snapshot");

    info!(
        loaded = summary.loaded,
        sev12 = summary.sev12,
        sev3 = summary.sev3,
        qppo2 = summary.qppo2_concerns,
        mismatches = summary.mismatches,
        "Report complete"
    );
    Ok(summary)
}

// =============================================================================
// CHART COMMAND
// =============================================================================

/// Render the QPPO2 trend chart from the day's snapshot.
pub fn cmd_chart(
    out_root: &Path,
    as_of: NaiveDate,
    config: &ReportConfig,
) -> Result<PathBuf, CliError> {
    let snapshot = load_snapshot(out_root, as_of)?;
    let series = TrendSeries::from_sev3(&snapshot.sev3, snapshot.as_of, &config.chart);
    if series.points.is_empty() {
        warn!("No Sev3 incidents to chart; drawing the baseline only");
    }

    let path = ResultsLayout::new(out_root, as_of).chart();
    render_chart(&series, &path, (config.chart.width, config.chart.height))
        .map_err(CliError::Chart)?;

    info!(path = %path.display(), "Wrote chart");
    Ok(path)
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Counts read back from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub as_of: NaiveDate,
    pub remedy: usize,
    pub sev12: usize,
    pub sev3: usize,
    pub qppo2_concerns: usize,
    pub mismatches: usize,
    /// Longest-open QPPO2 concern, in days.
    pub longest_open_days: Option<f64>,
}

impl From<&Snapshot> for StatusReport {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            as_of: snapshot.as_of,
            remedy: snapshot.remedy.len(),
            sev12: snapshot.sev12.len(),
            sev3: snapshot.sev3.len(),
            qppo2_concerns: snapshot.qppo2.len(),
            mismatches: snapshot.mismatches.len(),
            longest_open_days: snapshot.qppo2.first().map(|r| r.open_days),
        }
    }
}

impl StatusReport {
    /// Plain-text rendering for the terminal.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Report date:      {}\n", self.as_of));
        out.push_str(&format!("Incidents:        {}\n", self.remedy));
        out.push_str(&format!("SEV1/SEV2:        {}\n", self.sev12));
        out.push_str(&format!("SEV3:             {}\n", self.sev3));
        out.push_str(&format!("QPPO2 concerns:   {}\n", self.qppo2_concerns));
        out.push_str(&format!("SEV# mismatches:  {}\n", self.mismatches));
        if let Some(days) = self.longest_open_days {
            out.push_str(&format!("Longest open:     {days:.1} days\n"));
        }
        out
    }
}

/// Print counts of the day's snapshot.
pub fn cmd_status(out_root: &Path, as_of: NaiveDate, json: bool) -> Result<StatusReport, CliError> {
    let snapshot = load_snapshot(out_root, as_of)?;
    let status = StatusReport::from(&snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", status.to_text());
    }
    Ok(status)
}
