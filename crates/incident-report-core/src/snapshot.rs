//! # Snapshot Format
//!
//! Binary hand-off between `extract` and `chart`.
//!
//! ```text
//! ┌──────────────┬──────────────┬─────────────────────────────┐
//! │ magic (8 B)  │ version (u16)│ postcard(Snapshot)          │
//! │ "IRSNAP\0\0" │ little-endian│                             │
//! └──────────────┴──────────────┴─────────────────────────────┘
//! ```
//!
//! Decoding is strict: wrong magic, unknown version, truncation and
//! trailing bytes are all errors.

use crate::duration::Sev3Record;
use crate::error::{ReportError, Result};
use crate::record::Incident;
use crate::report::Report;
use crate::severity::Mismatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// File magic.
pub const SNAPSHOT_MAGIC: [u8; 8] = *b"IRSNAP\0\0";

/// Current format version.
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 2;

/// The tables the chart step needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub as_of: NaiveDate,
    pub sev12: Vec<Incident>,
    pub sev3: Vec<Sev3Record>,
    pub remedy: Vec<Incident>,
    pub qppo2: Vec<Sev3Record>,
    pub mismatches: Vec<Mismatch>,
}

impl From<&Report> for Snapshot {
    fn from(report: &Report) -> Self {
        Self {
            as_of: report.as_of,
            sev12: report.sev12.clone(),
            sev3: report.sev3.clone(),
            remedy: report.remedy.clone(),
            qppo2: report.qppo2.clone(),
            mismatches: report.mismatches.clone(),
        }
    }
}

/// Encode a snapshot with header.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let body = postcard::to_stdvec(snapshot)
        .map_err(|e| ReportError::Snapshot(format!("encode failed: {e}")))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&SNAPSHOT_MAGIC);
    bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode a snapshot, checking header and length.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot> {
    if bytes.len() < HEADER_LEN {
        return Err(ReportError::Snapshot(format!(
            "truncated header: {} bytes",
            bytes.len()
        )));
    }

    let (magic, rest) = bytes.split_at(SNAPSHOT_MAGIC.len());
    if magic != SNAPSHOT_MAGIC {
        return Err(ReportError::Snapshot("not a snapshot file".to_string()));
    }

    let (version, body) = rest.split_at(2);
    let version = u16::from_le_bytes([version[0], version[1]]);
    if version != SNAPSHOT_VERSION {
        return Err(ReportError::Snapshot(format!(
            "unsupported version {version} (expected {SNAPSHOT_VERSION})"
        )));
    }

    let (snapshot, trailing) = postcard::take_from_bytes::<Snapshot>(body)
        .map_err(|e| ReportError::Snapshot(format!("decode failed: {e}")))?;
    if !trailing.is_empty() {
        return Err(ReportError::Snapshot(format!(
            "{} trailing bytes after snapshot",
            trailing.len()
        )));
    }

    Ok(snapshot)
}

// =============================================================================
// TESTS
// =============================================================================
