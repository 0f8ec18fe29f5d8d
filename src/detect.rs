//! Input format detection for templates and tabular sources.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Format of a tabular data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Comma-separated values
    Csv,
    /// Spreadsheet workbook (xlsx, xlsm, xlsb, xls, ods)
    Workbook,
    /// JSON array of rows, each an array of scalars
    Json,
}

/// Format of a template document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Native JSON document model
    Json,
    /// Plain text, one paragraph per line
    PlainText,
}

impl std::fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetFormat::Csv => write!(f, "CSV"),
            SheetFormat::Workbook => write!(f, "workbook"),
            SheetFormat::Json => write!(f, "JSON"),
        }
    }
}

/// ZIP local file header: xlsx, xlsm, xlsb and ods are ZIP containers.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE2 compound document header used by legacy xls.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Detect the sheet format of a path from its extension.
///
/// Falls back to sniffing the file header when the extension is missing.
pub fn detect_sheet_format<P: AsRef<Path>>(path: P) -> Result<SheetFormat> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("csv") => Ok(SheetFormat::Csv),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(SheetFormat::Workbook),
        Some("json") => Ok(SheetFormat::Json),
        Some(_) => Err(Error::UnsupportedFormat(path.display().to_string())),
        None => {
            let mut header = [0u8; 8];
            let read = File::open(path)?.read(&mut header)?;
            detect_sheet_format_from_bytes(&header[..read])
                .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// Detect a binary workbook from its leading bytes.
pub fn detect_sheet_format_from_bytes(data: &[u8]) -> Option<SheetFormat> {
    if data.starts_with(ZIP_MAGIC) || data.starts_with(OLE_MAGIC) {
        Some(SheetFormat::Workbook)
    } else {
        None
    }
}

/// Detect the template document format of a path from its extension.
pub fn detect_document_format<P: AsRef<Path>>(path: P) -> Result<DocumentFormat> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("json") => Ok(DocumentFormat::Json),
        Some("txt" | "md" | "text") => Ok(DocumentFormat::PlainText),
        _ => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}
