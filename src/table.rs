//! Tabular input: CSV/text and spreadsheet files loaded into memory.
//!
//! The first row of every input is the header. Cells keep enough type
//! information to be stringified the same way a spreadsheet user sees them.

use crate::error::{Error, Result};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field values treated as missing in delimited input.
static NA_VALUES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
        "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ]
    .into_iter()
    .collect()
});

/// A single raw cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value
    Empty,
    /// Text as stored
    Text(String),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Date/time, already rendered as `YYYY-MM-DD HH:MM:SS`
    DateTime(String),
}

impl Cell {
    /// Returns true for the missing-value marker.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Builds a cell from a delimited-text field.
    fn from_field(field: &str) -> Self {
        if NA_VALUES.contains(field) {
            Self::Empty
        } else {
            Self::Text(field.to_string())
        }
    }

    fn from_spreadsheet(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Int(i) => Self::Int(*i),
            Data::Float(f) if f.is_nan() => Self::Empty,
            Data::Float(f) => Self::Float(*f),
            Data::Bool(b) => Self::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => Self::DateTime(format_datetime(naive)),
                None => Self::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
        }
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) | Self::DateTime(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
        }
    }
}

/// Input formats recognized by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-delimited text with a header row (`.csv`, `.txt`)
    Delimited,
    /// Workbook, first sheet (`.xlsx`, `.xlsm`, `.xls`)
    Spreadsheet,
}

impl TableFormat {
    /// Detects the format from the path's extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        match extension.as_str() {
            ".csv" | ".txt" => Ok(Self::Delimited),
            ".xlsx" | ".xlsm" | ".xls" => Ok(Self::Spreadsheet),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

/// In-memory table: a header and rows of equal width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table, padding short rows with [`Cell::Empty`].
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column names in header order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows (header excluded).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of the column at `index`, top to bottom.
    ///
    /// `index` must come from [`crate::ColumnSelector::resolve`].
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }
}

/// Loads a table from `path`.
///
/// # Errors
///
/// Returns an error if:
/// - The path does not exist ([`Error::FileNotFound`])
/// - The extension is not supported ([`Error::UnsupportedFormat`])
/// - The content cannot be parsed ([`Error::Table`])
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let table = match TableFormat::from_path(path)? {
        TableFormat::Delimited => read_delimited(path)?,
        TableFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    debug!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

fn read_delimited(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::table(path, e.to_string()))?;

    let columns = header_names(
        reader
            .headers()
            .map_err(|e| Error::table(path, e.to_string()))?
            .iter()
            .map(str::to_string),
    );

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::table(path, e.to_string()))?;
        if record.len() > columns.len() {
            return Err(Error::table(
                path,
                format!(
                    "Expected {} fields in line {}, saw {}",
                    columns.len(),
                    line + 2,
                    record.len()
                ),
            ));
        }
        rows.push(record.iter().map(Cell::from_field).collect());
    }

    Ok(Table::new(columns, rows))
}

fn read_spreadsheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::table(path, e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::table(path, "workbook contains no sheets"))?
        .map_err(|e| Error::table(path, e.to_string()))?;

    let mut row_iter = range.rows();
    let Some(header) = row_iter.next() else {
        return Ok(Table::default());
    };

    let columns = header_names(header.iter().map(|data| {
        let cell = Cell::from_spreadsheet(data);
        cell.to_string()
    }));
    let rows = row_iter
        .map(|row| row.iter().map(Cell::from_spreadsheet).collect())
        .collect();

    Ok(Table::new(columns, rows))
}

/// Fills blank header cells with `Unnamed: <index>`.
fn header_names(names: impl Iterator<Item = String>) -> Vec<String> {
    names
        .enumerate()
        .map(|(index, name)| {
            if name.is_empty() {
                format!("Unnamed: {index}")
            } else {
                name
            }
        })
        .collect()
}
