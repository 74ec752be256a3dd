//! # Open-Duration Calculator
//!
//! QPPO2: close 100% of Sev3 incidents within three weeks of the reported
//! date. Weekly maintenance and RCA tickets stay open by nature and are
//! left out of the compliance subset.

use crate::record::Incident;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A Sev3 incident with its open duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sev3Record {
    pub incident: Incident,
    /// No resolution date yet.
    pub still_open: bool,
    /// Days between report and resolution, or report and the report date.
    pub open_days: f64,
    /// Weekly maintenance or RCA ticket.
    pub excluded: bool,
    /// Still open and not excluded.
    pub compliance_concern: bool,
}

/// Midnight of the report date; open incidents are measured up to it.
#[must_use]
pub fn as_of_instant(as_of: NaiveDate) -> NaiveDateTime {
    as_of.and_time(chrono::NaiveTime::MIN)
}

/// Whole seconds of `delta` as fractional days.
#[must_use]
pub fn fractional_days(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 / SECONDS_PER_DAY
}

/// Whether the summary carries a maintenance/RCA marker (case-sensitive).
#[must_use]
pub fn is_excluded<S: AsRef<str>>(summary: &str, markers: &[S]) -> bool {
    markers.iter().any(|m| summary.contains(m.as_ref()))
}

/// Compute open durations for Sev3 incidents.
///
/// An open incident reported on the report date itself is measured as
/// zero days. A resolution recorded before the report keeps its negative
/// value so the bad data stays visible on the Sev3 sheet.
#[must_use]
pub fn open_durations<S: AsRef<str>>(
    sev3: Vec<Incident>,
    as_of: NaiveDate,
    markers: &[S],
) -> Vec<Sev3Record> {
    let now = as_of_instant(as_of);

    sev3.into_iter()
        .map(|incident| {
            let still_open = incident.is_open();
            let open_days = match incident.last_resolved {
                Some(resolved) => fractional_days(resolved - incident.reported),
                None => fractional_days(now - incident.reported).max(0.0),
            };
            let excluded = is_excluded(&incident.summary, markers);
            Sev3Record {
                still_open,
                open_days,
                excluded,
                compliance_concern: still_open && !excluded,
                incident,
            }
        })
        .collect()
}

/// Current QPPO2 concerns, longest open first.
#[must_use]
pub fn compliance_concerns(sev3: &[Sev3Record]) -> Vec<Sev3Record> {
    let mut concerns: Vec<_> = sev3
        .iter()
        .filter(|r| r.compliance_concern)
        .cloned()
        .collect();
    concerns.sort_by(|a, b| b.open_days.total_cmp(&a.open_days));
    concerns
}

// =============================================================================
// TESTS
// =============================================================================
