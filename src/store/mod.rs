//! External collaborators: where documents and tabular data live.
//!
//! The merge core never touches files or services directly. It reads
//! templates from and writes merged output to a [`DocumentStore`], and reads
//! data rows from a [`TabularStore`]. File-backed and in-memory
//! implementations are provided.

mod file;
mod memory;
mod table;

pub use file::FileDocumentStore;
pub use memory::{MemoryDocumentStore, MemoryTabularStore};
pub use table::FileTabularStore;

use crate::error::Result;
use crate::model::{CellValue, Document};

/// Storage for template and output documents.
pub trait DocumentStore {
    /// Open an existing document by id.
    ///
    /// Returns [`Error::DocumentNotFound`](crate::Error::DocumentNotFound)
    /// when no such document exists.
    fn open(&self, id: &str) -> Result<Document>;

    /// Create a new, empty document with the given name.
    ///
    /// The returned document carries the id assigned by the store. Creating
    /// never replaces an existing document.
    fn create(&mut self, name: &str) -> Result<Document>;

    /// Persist a document under its id.
    fn save(&mut self, doc: &Document) -> Result<()>;
}

/// Read access to tabular data sources.
pub trait TabularStore {
    /// Open a tabular source by id and return its first (active) sheet.
    ///
    /// Returns [`Error::SheetNotFound`](crate::Error::SheetNotFound) when no
    /// such source exists.
    fn open(&self, id: &str) -> Result<Sheet>;
}

/// A raw grid of cells with the display name of its source.
///
/// Row and column arguments are 1-based, matching spreadsheet addressing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Display name of the spreadsheet
    pub name: String,

    /// Cell rows; rows may have different lengths
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a sheet from rows of cells.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Create a sheet from rows of text. Blank cells are empty, the rest
    /// are kept as text.
    pub fn from_text_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| CellValue::from_field(cell.as_ref()))
                    .collect()
            })
            .collect();
        Self::new(name, rows)
    }

    /// Index (1-based) of the last row holding a non-empty cell, 0 if none.
    pub fn last_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_empty()))
            .map_or(0, |idx| idx + 1)
    }

    /// Index (1-based) of the last column holding a non-empty cell, 0 if none.
    pub fn last_column(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
            .max()
            .map_or(0, |idx| idx + 1)
    }

    /// Get a rectangular block of values.
    ///
    /// Cells outside the stored grid read as [`CellValue::Empty`]. Row 0 or
    /// column 0 are treated as 1.
    pub fn values(
        &self,
        row: usize,
        column: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Vec<Vec<CellValue>> {
        let first_row = row.max(1) - 1;
        let first_col = column.max(1) - 1;
        (first_row..first_row + num_rows)
            .map(|r| {
                (first_col..first_col + num_columns)
                    .map(|c| {
                        self.rows
                            .get(r)
                            .and_then(|cells| cells.get(c))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}
