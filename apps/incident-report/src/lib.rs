//! # Incident Report Library
//!
//! This library exposes the incident-report modules for testing and
//! integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod chart;
pub mod cli;
pub mod layout;
pub mod workbook;

// Re-export incident_report_core for convenience
pub use incident_report_core;
