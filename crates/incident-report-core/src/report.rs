//! # Report Module
//!
//! Runs the cleaning stages over loaded records and lays the results out as
//! the sheets of the Remedy report.
//!
//! Sheet tables are built from typed [`Cell`]s so the spreadsheet writer in
//! the app stays a plain loop over rows.

use crate::config::ReportConfig;
use crate::duration::{Sev3Record, compliance_concerns, open_durations};
use crate::normalize::{rate_fields, resolve_dates};
use crate::record::{Incident, RawRecord, Rejection, columns};
use crate::severity::{Mismatch, mismatches, partition};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// SHEET NAMES
// =============================================================================

pub const SHEET_SEV12: &str = "SEV1, SEV2 Incidents";
pub const SHEET_SEV3: &str = "SEV3 Incidents";
pub const SHEET_QPPO2: &str = "Current QPPO2 Concerns";
pub const SHEET_MISMATCHES: &str = "SEV# mismatches";
pub const SHEET_REMEDY: &str = "Remedy Output";
pub const SHEET_REJECTED: &str = "Misformatted Data";
pub const SHEET_DD_INCIDENT_MANAGEMENT: &str = "DD Incident Management";
pub const SHEET_DD_DATA_QUALITY: &str = "DD Data Quality";

// =============================================================================
// TABLES
// =============================================================================

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    DateTime(NaiveDateTime),
    Bool(bool),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Option<NaiveDateTime>> for Cell {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(Self::Empty, Self::DateTime)
    }
}

impl From<u8> for Cell {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<Option<u8>> for Cell {
    fn from(value: Option<u8>) -> Self {
        value.map_or(Self::Empty, Self::from)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A named sheet: header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    fn new(name: &'static str, headers: &[&'static str]) -> Self {
        Self {
            name,
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Everything the pipeline produces for one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub as_of: NaiveDate,
    /// All cleaned incidents, most recent first.
    pub remedy: Vec<Incident>,
    pub sev12: Vec<Incident>,
    pub sev3: Vec<Sev3Record>,
    /// Open, non-excluded Sev3, longest open first.
    pub qppo2: Vec<Sev3Record>,
    pub mismatches: Vec<Mismatch>,
    /// Rows removed by any stage, in stage order.
    pub rejections: Vec<Rejection>,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub loaded: usize,
    pub cleaned: usize,
    pub sev12: usize,
    pub sev3: usize,
    pub excluded: usize,
    pub qppo2_concerns: usize,
    pub mismatches: usize,
    pub rejected: usize,
}

/// Run the cleaning stages over loaded records.
#[must_use]
pub fn build_report(records: Vec<RawRecord>, as_of: NaiveDate, config: &ReportConfig) -> Report {
    let rated = rate_fields(records);
    let dated = resolve_dates(rated.kept, &config.date_formats);

    let remedy = dated.kept;
    let (sev12, sev3) = partition(&remedy, config.sev3_min_impact);
    let mismatched = mismatches(&remedy);
    let sev3 = open_durations(sev3, as_of, &config.exclusion_markers);
    let qppo2 = compliance_concerns(&sev3);

    let mut rejections = rated.rejected;
    rejections.extend(dated.rejected);

    Report {
        as_of,
        remedy,
        sev12,
        sev3,
        qppo2,
        mismatches: mismatched,
        rejections,
    }
}

impl Report {
    /// Row counts of each table.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let cleaned = self.remedy.len();
        let rejected = self.rejections.len();
        ReportSummary {
            loaded: cleaned + rejected,
            cleaned,
            sev12: self.sev12.len(),
            sev3: self.sev3.len(),
            excluded: self.sev3.iter().filter(|r| r.excluded).count(),
            qppo2_concerns: self.qppo2.len(),
            mismatches: self.mismatches.len(),
            rejected,
        }
    }

    /// All sheets, in workbook order.
    #[must_use]
    pub fn tables(&self) -> Vec<Table> {
        vec![
            self.sev12_table(),
            self.sev3_table(),
            self.qppo2_table(),
            self.mismatch_table(),
            self.remedy_table(),
            self.rejection_table(),
            self.incident_management_table(),
            self.data_quality_table(),
        ]
    }

    fn sev12_table(&self) -> Table {
        let mut table = Table::new(SHEET_SEV12, &SEVERITY_HEADERS);
        table.rows = self.sev12.iter().map(severity_row).collect();
        table
    }

    fn sev3_table(&self) -> Table {
        let mut headers = SEVERITY_HEADERS.to_vec();
        headers.extend(["Still Open", "Days Open", "Weekly Or RCA", "QPPO2 Concern"]);
        let mut table = Table::new(SHEET_SEV3, &headers);
        table.rows = self
            .sev3
            .iter()
            .map(|r| {
                let mut row = severity_row(&r.incident);
                row.extend([
                    Cell::from(r.still_open),
                    Cell::from(r.open_days),
                    Cell::from(r.excluded),
                    Cell::from(r.compliance_concern),
                ]);
                row
            })
            .collect();
        table
    }

    fn qppo2_table(&self) -> Table {
        let mut table = Table::new(
            SHEET_QPPO2,
            &[
                columns::INCIDENT_ID,
                columns::REPORTED_DATE,
                columns::LAST_MODIFIED_DATE,
                columns::LAST_RESOLVED_DATE,
                "Days Open",
                columns::IMPACT,
                columns::URGENCY,
                columns::RESOLUTION,
                columns::ASSIGNED_GROUP,
                columns::SUMMARY,
            ],
        );
        table.rows = self
            .qppo2
            .iter()
            .map(|r| {
                let i = &r.incident;
                vec![
                    Cell::from(&i.incident_id),
                    Cell::from(i.reported),
                    Cell::from(i.last_modified),
                    Cell::from(i.last_resolved),
                    Cell::from(r.open_days),
                    Cell::from(i.impact),
                    Cell::from(i.urgency),
                    Cell::from(&i.resolution),
                    Cell::from(&i.assigned_group),
                    Cell::from(&i.summary),
                ]
            })
            .collect();
        table
    }

    fn mismatch_table(&self) -> Table {
        let mut table = Table::new(
            SHEET_MISMATCHES,
            &[
                columns::INCIDENT_ID,
                columns::REPORTED_DATE,
                columns::IMPACT,
                columns::URGENCY,
                "File",
            ],
        );
        table.rows = self
            .mismatches
            .iter()
            .map(|m| {
                vec![
                    Cell::from(&m.incident_id),
                    Cell::from(m.reported),
                    Cell::from(m.impact),
                    Cell::from(m.urgency),
                    Cell::from(&m.file),
                ]
            })
            .collect();
        table
    }

    fn remedy_table(&self) -> Table {
        let mut headers = columns::KEPT.to_vec();
        headers.push("File");
        let mut table = Table::new(SHEET_REMEDY, &headers);
        table.rows = self
            .remedy
            .iter()
            .map(|i| {
                vec![
                    Cell::from(&i.incident_id),
                    Cell::from(&i.status),
                    Cell::from(&i.priority),
                    Cell::from(&i.notes),
                    Cell::from(i.reported),
                    Cell::from(&i.assigned_group),
                    Cell::from(&i.assignee),
                    Cell::from(&i.resolution),
                    Cell::from(i.last_resolved),
                    Cell::from(&i.responded),
                    Cell::from(i.last_modified),
                    Cell::from(i.impact),
                    Cell::from(i.urgency),
                    Cell::from(&i.incident_type),
                    Cell::from(&i.summary),
                    Cell::from(&i.file),
                ]
            })
            .collect();
        table
    }

    fn rejection_table(&self) -> Table {
        let mut headers = vec!["Reason", "File", "Row"];
        headers.extend(columns::KEPT);
        let mut table = Table::new(SHEET_REJECTED, &headers);
        table.rows = self
            .rejections
            .iter()
            .map(|r| {
                let mut row = vec![
                    Cell::Text(r.reason.to_string()),
                    Cell::from(&r.record.file),
                    Cell::Int(r.record.row as i64),
                ];
                // raw text as found in the extract
                row.extend(columns::KEPT.iter().map(|c| {
                    r.record
                        .fields
                        .get(*c)
                        .map_or(Cell::Empty, |v| Cell::from(v.as_str()))
                }));
                row
            })
            .collect();
        table
    }

    fn incident_management_table(&self) -> Table {
        let mut table = Table::new(
            SHEET_DD_INCIDENT_MANAGEMENT,
            &[
                columns::INCIDENT_ID,
                columns::REPORTED_DATE,
                columns::LAST_RESOLVED_DATE,
            ],
        );
        let mut rows: Vec<&Incident> = self
            .sev3
            .iter()
            .filter(|r| !r.excluded)
            .map(|r| &r.incident)
            .collect();
        rows.sort_by_key(|i| i.reported);
        table.rows = rows
            .into_iter()
            .map(|i| {
                vec![
                    Cell::from(&i.incident_id),
                    Cell::from(i.reported),
                    Cell::from(i.last_resolved),
                ]
            })
            .collect();
        table
    }

    fn data_quality_table(&self) -> Table {
        let mut table = Table::new(
            SHEET_DD_DATA_QUALITY,
            &[
                columns::INCIDENT_ID,
                columns::IMPACT,
                columns::REPORTED_DATE,
                columns::LAST_RESOLVED_DATE,
            ],
        );
        let mut rows: Vec<&Incident> = self.sev12.iter().collect();
        rows.sort_by_key(|i| i.reported);
        table.rows = rows
            .into_iter()
            .map(|i| {
                vec![
                    Cell::from(&i.incident_id),
                    Cell::from(i.impact),
                    Cell::from(i.reported),
                    Cell::from(i.last_resolved),
                ]
            })
            .collect();
        table
    }
}

/// Columns shared by the Sev1/2 and Sev3 sheets.
const SEVERITY_HEADERS: [&str; 9] = [
    columns::INCIDENT_ID,
    columns::REPORTED_DATE,
    columns::LAST_MODIFIED_DATE,
    columns::LAST_RESOLVED_DATE,
    columns::IMPACT,
    columns::URGENCY,
    columns::RESOLUTION,
    columns::ASSIGNED_GROUP,
    columns::SUMMARY,
];

fn severity_row(i: &Incident) -> Vec<Cell> {
    vec![
        Cell::from(&i.incident_id),
        Cell::from(i.reported),
        Cell::from(i.last_modified),
        Cell::from(i.last_resolved),
        Cell::from(i.impact),
        Cell::from(i.urgency),
        Cell::from(&i.resolution),
        Cell::from(&i.assigned_group),
        Cell::from(&i.summary),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
