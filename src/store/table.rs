//! Tabular store backed by CSV, workbook and JSON files.

use super::{Sheet, TabularStore};
use crate::detect::{detect_sheet_format, SheetFormat};
use crate::error::{Error, Result};
use crate::model::CellValue;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::NaiveTime;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const UTF8_BOM: char = '\u{feff}';

/// Reads sheets from files under a root directory.
///
/// Sheet ids are file paths, resolved against the root like
/// [`FileDocumentStore`](super::FileDocumentStore) ids. The display name of
/// a sheet is its file stem. Workbooks contribute their first worksheet.
#[derive(Debug, Clone)]
pub struct FileTabularStore {
    root: PathBuf,
}

impl FileTabularStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TabularStore for FileTabularStore {
    fn open(&self, id: &str) -> Result<Sheet> {
        let path = self.root.join(id);
        if !path.is_file() {
            return Err(Error::SheetNotFound(id.to_string()));
        }

        let format = detect_sheet_format(&path)?;
        let rows = match format {
            SheetFormat::Csv => read_csv(&path)?,
            SheetFormat::Workbook => read_workbook(&path)?,
            SheetFormat::Json => read_json(&path)?,
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(
            "Read {} sheet '{}' with {} rows from {}",
            format,
            name,
            rows.len(),
            path.display()
        );
        Ok(Sheet::new(name, rows))
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                if rows.is_empty() && idx == 0 {
                    CellValue::from_field(field.trim_start_matches(UTF8_BOM))
                } else {
                    CellValue::from_field(field)
                }
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::InvalidSheet(format!("{} has no worksheets", path.display())))??;

    // A range starts at its first used cell; pad back to A1.
    let (row_offset, col_offset) = range
        .start()
        .map_or((0, 0), |(r, c)| (r as usize, c as usize));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for cells in range.rows() {
        let mut row = vec![CellValue::Empty; col_offset];
        row.extend(cells.iter().map(cell_from_data));
        rows.push(row);
    }
    Ok(rows)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => cell_from_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Dates become ISO 8601 text: the date alone at midnight, the full
/// datetime otherwise. Durations become `h:mm:ss`.
fn cell_from_datetime(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let secs = duration.num_seconds();
            let text = format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60);
            return CellValue::Text(text);
        }
    } else if let Some(datetime) = dt.as_datetime() {
        let text = if datetime.time() == NaiveTime::MIN {
            datetime.date().to_string()
        } else {
            datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
        };
        return CellValue::Text(text);
    }
    CellValue::Number(dt.as_f64())
}

fn read_json(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let reader = BufReader::new(File::open(path)?);
    let grid: Vec<Vec<serde_json::Value>> = serde_json::from_reader(reader)?;

    grid.into_iter()
        .enumerate()
        .map(|(row_idx, row)| {
            row.into_iter()
                .enumerate()
                .map(|(col_idx, value)| {
                    cell_from_json(value).ok_or_else(|| {
                        Error::InvalidSheet(format!(
                            "non-scalar value at row {}, column {}",
                            row_idx + 1,
                            col_idx + 1
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

fn cell_from_json(value: serde_json::Value) -> Option<CellValue> {
    use serde_json::Value;
    match value {
        Value::Null => Some(CellValue::Empty),
        Value::Bool(b) => Some(CellValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::String(s) => Some(CellValue::Text(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}
