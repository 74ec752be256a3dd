//! # Severity Partitioner
//!
//! Splits cleaned incidents into Sev1/2 and Sev3 by impact, and lists the
//! incidents whose urgency disagrees with their impact.

use crate::record::Incident;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tier derived from an incident's impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Sev1,
    Sev2,
    Sev3,
}

impl Severity {
    /// Tier for `impact` given the Sev3 threshold.
    ///
    /// Impact 1 is Sev1; anything else below the threshold is Sev2.
    #[must_use]
    pub fn from_impact(impact: u8, sev3_min_impact: u8) -> Self {
        if impact >= sev3_min_impact {
            Self::Sev3
        } else if impact == 1 {
            Self::Sev1
        } else {
            Self::Sev2
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sev1 => write!(f, "SEV1"),
            Self::Sev2 => write!(f, "SEV2"),
            Self::Sev3 => write!(f, "SEV3"),
        }
    }
}

/// Split incidents into (Sev1/2, Sev3), preserving order.
#[must_use]
pub fn partition(incidents: &[Incident], sev3_min_impact: u8) -> (Vec<Incident>, Vec<Incident>) {
    incidents
        .iter()
        .cloned()
        .partition(|i| Severity::from_impact(i.impact, sev3_min_impact) != Severity::Sev3)
}

/// An incident whose urgency is not its impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub incident_id: String,
    pub reported: NaiveDateTime,
    pub impact: u8,
    pub urgency: Option<u8>,
    pub file: String,
}

/// Incidents with urgency different from impact, in input order.
///
/// An unreadable urgency never matches.
#[must_use]
pub fn mismatches(incidents: &[Incident]) -> Vec<Mismatch> {
    incidents
        .iter()
        .filter(|i| i.urgency != Some(i.impact))
        .map(|i| Mismatch {
            incident_id: i.incident_id.clone(),
            reported: i.reported,
            impact: i.impact,
            urgency: i.urgency,
            file: i.file.clone(),
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Minimal incident for stage tests.
    pub(crate) fn incident(id: &str, impact: u8, urgency: Option<u8>) -> Incident {
        let at = NaiveDate::from_ymd_opt(2017, 5, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap_or_default();
        Incident {
            incident_id: id.to_string(),
            status: String::new(),
            priority: String::new(),
            notes: String::new(),
            reported: at,
            assigned_group: String::new(),
            assignee: String::new(),
            resolution: String::new(),
            last_resolved: None,
            responded: String::new(),
            last_modified: at,
            impact,
            urgency,
            incident_type: String::new(),
            file: "a.csv".to_string(),
            row: 1,
            summary: String::new(),
        }
    }

    #[test]
    fn severity_from_impact() {
        assert_eq!(Severity::from_impact(1, 3), Severity::Sev1);
        assert_eq!(Severity::from_impact(2, 3), Severity::Sev2);
        assert_eq!(Severity::from_impact(0, 3), Severity::Sev2);
        assert_eq!(Severity::from_impact(3, 3), Severity::Sev3);
        assert_eq!(Severity::from_impact(4, 3), Severity::Sev3);
        assert_eq!(Severity::from_impact(2, 2), Severity::Sev3);
    }

    #[test]
    fn partition_splits_on_threshold() {
        let incidents = vec![
            incident("A", 1, Some(1)),
            incident("B", 3, Some(3)),
            incident("C", 2, Some(2)),
            incident("D", 4, Some(4)),
        ];

        let (sev12, sev3) = partition(&incidents, 3);
        let ids = |v: &[Incident]| v.iter().map(|i| i.incident_id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&sev12), vec!["A", "C"]);
        assert_eq!(ids(&sev3), vec!["B", "D"]);
    }

    #[test]
    fn mismatches_include_missing_urgency() {
        let incidents = vec![
            incident("SAME", 3, Some(3)),
            incident("DIFF", 3, Some(1)),
            incident("NONE", 2, None),
        ];

        let found = mismatches(&incidents);
        let ids: Vec<_> = found.iter().map(|m| m.incident_id.as_str()).collect();
        assert_eq!(ids, vec!["DIFF", "NONE"]);
        assert_eq!(found[0].urgency, Some(1));
        assert_eq!(found[1].file, "a.csv");
    }
}
