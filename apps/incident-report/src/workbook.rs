//! Spreadsheet output.
//!
//! One worksheet per report table, header row in bold and frozen, dates in
//! a sortable `yyyy-mm-dd hh:mm:ss` layout.

use incident_report_core::{Cell, Table};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use std::path::Path;

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DAYS_NUM_FORMAT: &str = "0.00";
const DATE_COLUMN_WIDTH: f64 = 20.0;

/// Build a workbook from report tables, in the order given.
pub fn build_workbook(tables: &[Table]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        write_table(worksheet, table, &formats)?;
    }

    Ok(workbook)
}

/// Build and save a workbook.
pub fn write_workbook(tables: &[Table], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = build_workbook(tables)?;
    workbook.save(path)
}

struct Formats {
    header: Format,
    date: Format,
    days: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            date: Format::new().set_num_format(DATE_NUM_FORMAT),
            days: Format::new().set_num_format(DAYS_NUM_FORMAT),
        }
    }
}

fn write_table(worksheet: &mut Worksheet, table: &Table, formats: &Formats) -> Result<(), XlsxError> {
    worksheet.set_name(table.name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, *header, &formats.header)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let mut date_columns = vec![false; table.headers.len()];
    for (index, row) in table.rows.iter().enumerate() {
        let r = index as RowNum + 1;
        for (col, cell) in row.iter().enumerate() {
            let c = col as ColNum;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) => {
                    worksheet.write_string(r, c, text)?;
                }
                Cell::Int(n) => {
                    worksheet.write_number(r, c, *n as f64)?;
                }
                Cell::Number(x) => {
                    worksheet.write_number_with_format(r, c, *x, &formats.days)?;
                }
                Cell::DateTime(dt) => {
                    worksheet.write_datetime_with_format(r, c, dt, &formats.date)?;
                    if let Some(flag) = date_columns.get_mut(col) {
                        *flag = true;
                    }
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
            }
        }
    }

    for (col, is_date) in date_columns.iter().enumerate() {
        if *is_date {
            worksheet.set_column_width(col as ColNum, DATE_COLUMN_WIDTH)?;
        }
    }

    Ok(())
}
