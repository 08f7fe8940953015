//! Download payloads for a computed timeline.
//!
//! All three formats carry the same columns in the same row order:
//! `Phase`, `Start Date`, `End Date`, `Duration (weeks)`.

use std::fmt;

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Table, TableColumn, Workbook};
use serde::Serialize;

use crate::error::{Result, TimelineError};
use crate::timeline::TimelineEntry;

pub const SHEET_NAME: &str = "Timeline";
pub const COLUMNS: [&str; 4] = ["Phase", "Start Date", "End Date", "Duration (weeks)"];

const CSV_DATE_FORMAT: &str = "%Y-%m-%d";
const JSON_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const SHEET_DATE_FORMAT: &str = "yyyy-mm-dd";

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Spreadsheet,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "xlsx",
            Self::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Json => "application/json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "excel" | "spreadsheet" => Some(Self::Spreadsheet),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Render `entries` in this format.
    pub fn render(&self, entries: &[TimelineEntry]) -> Result<Vec<u8>> {
        match self {
            Self::Csv => to_csv(entries),
            Self::Spreadsheet => to_spreadsheet(entries),
            Self::Json => to_json(entries),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One exported row. Dates are pre-formatted per target format.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Phase")]
    phase: &'a str,
    #[serde(rename = "Start Date")]
    start: String,
    #[serde(rename = "End Date")]
    end: String,
    #[serde(rename = "Duration (weeks)")]
    duration_weeks: u32,
}

impl<'a> ExportRow<'a> {
    fn new(entry: &'a TimelineEntry, date_format: &str) -> Self {
        Self {
            phase: &entry.phase_name,
            start: format_date(&entry.start, date_format),
            end: format_date(&entry.end, date_format),
            duration_weeks: entry.duration_weeks,
        }
    }
}

fn format_date(datetime: &NaiveDateTime, format: &str) -> String {
    datetime.format(format).to_string()
}

/// Comma-separated text with a header row.
pub fn to_csv(entries: &[TimelineEntry]) -> Result<Vec<u8>> {
    // Header written by hand so an empty timeline still carries one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for entry in entries {
        writer.serialize(ExportRow::new(entry, CSV_DATE_FORMAT))?;
    }
    writer
        .into_inner()
        .map_err(|e| TimelineError::Io(e.into_error()))
}

/// Single-sheet workbook with the rows typed as a table.
pub fn to_spreadsheet(entries: &[TimelineEntry]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(SHEET_DATE_FORMAT);
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (i, entry) in entries.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, &entry.phase_name)?;
        worksheet.write_datetime_with_format(row, 1, &entry.start, &date_format)?;
        worksheet.write_datetime_with_format(row, 2, &entry.end, &date_format)?;
        worksheet.write_number(row, 3, entry.duration_weeks)?;
    }

    if !entries.is_empty() {
        let columns: Vec<TableColumn> = COLUMNS
            .iter()
            .map(|title| TableColumn::new().set_header(*title))
            .collect();
        let table = Table::new().set_columns(&columns);
        worksheet.add_table(0, 0, entries.len() as u32, (COLUMNS.len() - 1) as u16, &table)?;
    }

    worksheet.set_column_width(0, 28)?;
    worksheet.set_column_width(1, 14)?;
    worksheet.set_column_width(2, 14)?;
    worksheet.set_column_width(3, 18)?;

    Ok(workbook.save_to_buffer()?)
}

/// Array of records with ISO 8601 date-times.
pub fn to_json(entries: &[TimelineEntry]) -> Result<Vec<u8>> {
    let rows: Vec<ExportRow> = entries
        .iter()
        .map(|entry| ExportRow::new(entry, JSON_DATE_FORMAT))
        .collect();
    Ok(serde_json::to_vec_pretty(&rows)?)
}

/// Download filename for a project's timeline, e.g. `Website_timeline.csv`.
pub fn file_name(project_name: &str, format: ExportFormat) -> String {
    let stem: String = project_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() {
        format!("timeline.{}", format.extension())
    } else {
        format!("{}_timeline.{}", stem, format.extension())
    }
}
