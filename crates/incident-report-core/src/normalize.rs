//! # Normalize Module
//!
//! The two coercion stages of the pipeline.
//!
//! 1. [`rate_fields`] reads Impact and Urgency as single digits. A row whose
//!    impact cannot be read is rejected; an unreadable urgency is kept as
//!    `None`.
//! 2. [`resolve_dates`] parses the reported, last-modified and
//!    last-resolved dates. Only the first two are required.

use crate::record::{DateField, Incident, RawRecord, RejectReason, Rejection, columns};
use chrono::{NaiveDate, NaiveDateTime};

/// Output of a stage: rows that passed, and rows that were removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Staged<T> {
    pub kept: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> Default for Staged<T> {
    fn default() -> Self {
        Self {
            kept: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// A raw record with its impact and urgency coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedRecord {
    pub record: RawRecord,
    pub impact: u8,
    pub urgency: Option<u8>,
}

// =============================================================================
// IMPACT / URGENCY
// =============================================================================

/// Read the leading digit of a Remedy rating such as `"3-Moderate/Limited"`.
#[must_use]
pub fn leading_digit(value: &str) -> Option<u8> {
    value
        .trim_start()
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

/// Coerce Impact and Urgency on every record.
#[must_use]
pub fn rate_fields(records: Vec<RawRecord>) -> Staged<RatedRecord> {
    let mut staged = Staged::default();

    for record in records {
        let impact = record.field(columns::IMPACT).and_then(leading_digit);
        let urgency = record.field(columns::URGENCY).and_then(leading_digit);

        match impact {
            Some(impact) => staged.kept.push(RatedRecord {
                record,
                impact,
                urgency,
            }),
            None => staged
                .rejected
                .push(Rejection::new(RejectReason::ImpactUnreadable, record)),
        }
    }

    staged
}

// =============================================================================
// DATES
// =============================================================================

/// Parse date text against `formats`, in order.
///
/// Each format is first tried as a date-time; a format with no time part
/// is then tried as a plain date at midnight.
#[must_use]
pub fn parse_date<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    formats.iter().find_map(|format| {
        let format: &str = format.as_ref();
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    })
}

/// Coerce the date fields and build typed incidents.
///
/// Reported is checked before Last Modified, so a row with both broken is
/// rejected for its reported date. Survivors are sorted by reported date,
/// most recent first.
#[must_use]
pub fn resolve_dates<S: AsRef<str>>(rated: Vec<RatedRecord>, formats: &[S]) -> Staged<Incident> {
    let mut staged = Staged::default();

    for RatedRecord {
        record,
        impact,
        urgency,
    } in rated
    {
        let date = |field: DateField| {
            record
                .field(field.column())
                .and_then(|v| parse_date(v, formats))
        };

        let Some(reported) = date(DateField::Reported) else {
            staged.rejected.push(Rejection::new(
                RejectReason::DateUnreadable(DateField::Reported),
                record,
            ));
            continue;
        };
        let Some(last_modified) = date(DateField::LastModified) else {
            staged.rejected.push(Rejection::new(
                RejectReason::DateUnreadable(DateField::LastModified),
                record,
            ));
            continue;
        };
        let last_resolved = date(DateField::LastResolved);

        staged.kept.push(Incident {
            incident_id: record.text(columns::INCIDENT_ID),
            status: record.text(columns::STATUS),
            priority: record.text(columns::PRIORITY),
            notes: record.text(columns::NOTES),
            reported,
            assigned_group: record.text(columns::ASSIGNED_GROUP),
            assignee: record.text(columns::ASSIGNEE),
            resolution: record.text(columns::RESOLUTION),
            last_resolved,
            responded: record.text(columns::RESPONDED_DATE),
            last_modified,
            impact,
            urgency,
            incident_type: record.text(columns::INCIDENT_TYPE),
            summary: record.text(columns::SUMMARY),
            file: record.file,
            row: record.row,
        });
    }

    // stable: equal timestamps keep extract order
    staged.kept.sort_by(|a, b| b.reported.cmp(&a.reported));
    staged
}

// =============================================================================
// TESTS
// =============================================================================
