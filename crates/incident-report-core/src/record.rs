//! # Record Module
//!
//! The record types that flow through the pipeline.
//!
//! - [`RawRecord`]: one CSV row, untyped, tagged with its source file
//! - [`Incident`]: a row that survived field and date coercion
//! - [`Rejection`]: a row removed by some stage, with the reason

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// COLUMN NAMES
// =============================================================================

/// Remedy header names read by the pipeline.
pub mod columns {
    pub const INCIDENT_ID: &str = "Incident ID";
    pub const STATUS: &str = "Status";
    pub const PRIORITY: &str = "Priority";
    pub const NOTES: &str = "Notes";
    pub const REPORTED_DATE: &str = "Reported Date";
    pub const ASSIGNED_GROUP: &str = "Assigned Group";
    pub const ASSIGNEE: &str = "Assignee";
    pub const RESOLUTION: &str = "Resolution";
    pub const LAST_RESOLVED_DATE: &str = "Last Resolved Date";
    pub const RESPONDED_DATE: &str = "Responded Date";
    pub const LAST_MODIFIED_DATE: &str = "Last Modified Date";
    pub const IMPACT: &str = "Impact";
    pub const URGENCY: &str = "Urgency";
    pub const INCIDENT_TYPE: &str = "Incident Type";
    pub const SUMMARY: &str = "Summary";

    /// Columns kept from the extract, in report order.
    pub const KEPT: [&str; 15] = [
        INCIDENT_ID,
        STATUS,
        PRIORITY,
        NOTES,
        REPORTED_DATE,
        ASSIGNED_GROUP,
        ASSIGNEE,
        RESOLUTION,
        LAST_RESOLVED_DATE,
        RESPONDED_DATE,
        LAST_MODIFIED_DATE,
        IMPACT,
        URGENCY,
        INCIDENT_TYPE,
        SUMMARY,
    ];
}

// =============================================================================
// RAW RECORD
// =============================================================================

/// One data row of an extract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Name of the extract the row came from.
    pub file: String,
    /// 1-based data row number inside `file` (the header is row 0).
    pub row: u64,
    /// Cell text keyed by header name.
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Create an empty record for the given file and row.
    #[must_use]
    pub fn new(file: impl Into<String>, row: u64) -> Self {
        Self {
            file: file.into(),
            row,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style setter, mostly for tests.
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.fields.insert(column.to_string(), value.into());
        self
    }

    /// Trimmed cell text, or `None` when the cell is missing or blank.
    #[must_use]
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed cell text, empty when missing.
    #[must_use]
    pub fn text(&self, column: &str) -> String {
        self.field(column).unwrap_or_default().to_string()
    }
}

// =============================================================================
// INCIDENT
// =============================================================================

/// An incident whose impact and required dates have been coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    pub status: String,
    pub priority: String,
    pub notes: String,
    pub reported: NaiveDateTime,
    pub assigned_group: String,
    pub assignee: String,
    pub resolution: String,
    pub last_resolved: Option<NaiveDateTime>,
    /// Kept as text; the report never computes with it.
    pub responded: String,
    pub last_modified: NaiveDateTime,
    pub impact: u8,
    /// `None` when the extract's urgency could not be coerced.
    pub urgency: Option<u8>,
    pub incident_type: String,
    /// Extract the incident came from.
    pub file: String,
    pub row: u64,
    pub summary: String,
}

impl Incident {
    /// Whether the incident has no resolution date yet.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.last_resolved.is_none()
    }
}

// =============================================================================
// REJECTIONS
// =============================================================================

/// The date fields the date normalizer coerces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DateField {
    Reported,
    LastModified,
    LastResolved,
}

impl DateField {
    /// Remedy header name of the field.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Reported => columns::REPORTED_DATE,
            Self::LastModified => columns::LAST_MODIFIED_DATE,
            Self::LastResolved => columns::LAST_RESOLVED_DATE,
        }
    }
}

/// Why a row was removed from the cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Impact is missing or does not start with a digit.
    ImpactUnreadable,
    /// A required date is missing or matches no known format.
    DateUnreadable(DateField),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImpactUnreadable => write!(f, "unreadable impact"),
            Self::DateUnreadable(field) => write!(f, "unreadable {}", field.column()),
        }
    }
}

/// A row removed by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: RejectReason,
    pub record: RawRecord,
}

impl Rejection {
    #[must_use]
    pub fn new(reason: RejectReason, record: RawRecord) -> Self {
        Self { reason, record }
    }
}

// =============================================================================
// TESTS
// =============================================================================
