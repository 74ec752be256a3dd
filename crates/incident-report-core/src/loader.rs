//! # Loader
//!
//! Turns the bytes of Remedy CSV extracts into [`RawRecord`]s.
//!
//! Remedy writes extracts in Latin-1 more often than not, so text is read as
//! UTF-8 when it is valid and as Windows-1252 otherwise. Rows are tagged with
//! the extract name so problems can be traced back to the file.

use crate::error::{ReportError, Result};
use crate::record::RawRecord;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;

/// Header prefix that spreadsheet tools give to unnamed columns.
const UNNAMED_PREFIX: &str = "Unnamed:";

/// Decode an extract to text.
///
/// Valid UTF-8 (with or without BOM) is used as-is; anything else is read
/// as Windows-1252, which is a superset of ISO-8859-1 for printable text.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _encoding, _had_errors) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}

/// Parse one extract into raw records.
///
/// Columns with a blank or `Unnamed:` header are dropped. Short rows leave
/// the trailing columns missing; surplus cells are ignored.
pub fn parse_extract(bytes: &[u8], file: &str) -> Result<Vec<RawRecord>> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let csv_error = |e: csv::Error| ReportError::Csv {
        file: file.to_string(),
        message: e.to_string(),
    };

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ReportError::EmptyExtract {
            file: file.to_string(),
        });
    }

    // (position, name) of every column worth keeping
    let kept: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (i, h.trim().to_string()))
        .filter(|(_, h)| !h.is_empty() && !h.starts_with(UNNAMED_PREFIX))
        .collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        let mut record = RawRecord::new(file, index as u64 + 1);
        for (position, name) in &kept {
            if let Some(value) = row.get(*position) {
                record.fields.insert(name.clone(), value.to_string());
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Concatenate parsed extracts, keeping file order then row order.
#[must_use]
pub fn concat(extracts: Vec<Vec<RawRecord>>) -> Vec<RawRecord> {
    extracts.into_iter().flatten().collect()
}

// =============================================================================
// TESTS
// =============================================================================
