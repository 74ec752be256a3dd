//! # Incident Report Core
//!
//! The cleaning and classification pipeline for Remedy incident extracts.
//!
//! The pipeline is a fixed sequence of pure stages over one in-memory table:
//!
//! ```text
//! CSV bytes ──► loader ──► normalize (impact/urgency) ──► normalize (dates)
//!                                                            │
//!          ┌─────────────────────────────────────────────────┘
//!          ▼
//!      severity ──► duration ──► report (sheet tables) ──► snapshot
//!                                                            │
//!                                                            ▼
//!                                                          trend
//! ```
//!
//! Rows that fail a stage are never errors: they become [`Rejection`]s and
//! end up in the "Misformatted Data" sheet. Only whole-file problems
//! (unreadable CSV, bad snapshot, bad configuration) surface as
//! [`ReportError`].
//!
//! This crate does no file I/O. The `incident-report` app reads and writes
//! every file and hands bytes to the functions here.

pub mod config;
pub mod duration;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod record;
pub mod report;
pub mod severity;
pub mod snapshot;
pub mod trend;

pub use config::{ChartConfig, ReportConfig};
pub use duration::Sev3Record;
pub use error::{ReportError, Result};
pub use loader::{concat, parse_extract};
pub use normalize::{RatedRecord, Staged, rate_fields, resolve_dates};
pub use record::{DateField, Incident, RawRecord, RejectReason, Rejection};
pub use report::{Cell, Report, ReportSummary, Table, build_report};
pub use severity::{Mismatch, Severity};
pub use snapshot::{Snapshot, decode_snapshot, encode_snapshot};
pub use trend::{DailyMean, TrendSeries};
