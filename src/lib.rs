//! # docmerge
//!
//! Document mail merge for Rust.
//!
//! Given a template document and a table of data, docmerge produces one
//! document holding a copy of the template per data row, with `{{key}}`
//! placeholders replaced by that row's values and a page break between rows.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docmerge::MailMerge;
//!
//! fn main() -> docmerge::Result<()> {
//!     // letter.json holds "Hello {{name}}, you live at {{address}}."
//!     // addresses.csv holds a "Name,Address" header and one row per letter
//!     let outcome = MailMerge::new()
//!         .with_output_dir("out")
//!         .run("letter.json", "addresses.csv")?;
//!
//!     println!("{} letters", outcome.report.record_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Run-aware substitution**: placeholders split across styled runs are
//!   still replaced, keeping the style of the run they start in
//! - **Single pass**: substituted values are never expanded again
//! - **Layout copy**: the output keeps the template's page size and margins
//! - **Pluggable stores**: documents and sheets come from injected stores;
//!   CSV, XLSX/XLS/ODS and JSON sheets are supported out of the box
//! - **Output formats**: JSON document model, plain text, Markdown

pub mod compose;
pub mod detect;
pub mod error;
pub mod merge;
pub mod model;
pub mod reader;
pub mod render;
pub mod store;
pub mod template;

// Re-export commonly used types
pub use compose::{append_record_block, copy_page_geometry, create_copy_shell};
pub use detect::{detect_document_format, detect_sheet_format, DocumentFormat, SheetFormat};
pub use error::{Error, Result};
pub use merge::{merge_documents, run, MergeOptions, MergeOutcome, MergeReport};
pub use model::{
    Alignment, Block, CellValue, DataSet, Document, InlineContent, Metadata, PageGeometry,
    Paragraph, ParagraphStyle, Record, TextRun, TextStyle,
};
pub use reader::read_data_set;
pub use render::{JsonFormat, RenderOptions};
pub use store::{
    DocumentStore, FileDocumentStore, FileTabularStore, MemoryDocumentStore, MemoryTabularStore,
    Sheet, TabularStore,
};
pub use template::{fill_template, placeholders};

use std::path::{Path, PathBuf};

/// Open a template document from a file.
///
/// `.json` files hold the document model; `.txt` and `.md` files are read
/// as one paragraph per line.
///
/// # Example
///
/// ```no_run
/// use docmerge::open_template;
///
/// let doc = open_template("letter.json").unwrap();
/// println!("{} paragraphs", doc.paragraph_count());
/// ```
pub fn open_template<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = absolute(path.as_ref())?;
    FileDocumentStore::new(parent_dir(&path)).open(&path.to_string_lossy())
}

/// Read the data set and its name from a CSV, workbook or JSON file.
///
/// # Example
///
/// ```no_run
/// use docmerge::open_data_set;
///
/// let (data, name) = open_data_set("addresses.csv").unwrap();
/// println!("{}: {} records", name, data.len());
/// ```
pub fn open_data_set<P: AsRef<Path>>(path: P) -> Result<(DataSet, String)> {
    let path = absolute(path.as_ref())?;
    let store = FileTabularStore::new(parent_dir(&path));
    read_data_set(&store, &path.to_string_lossy())
}

/// Builder for file-based merge runs.
///
/// # Example
///
/// ```no_run
/// use docmerge::MailMerge;
///
/// let outcome = MailMerge::new()
///     .with_separator(" for ")
///     .with_output_dir("./letters")
///     .strict()
///     .run("letter.json", "addresses.xlsx")?;
/// # Ok::<(), docmerge::Error>(())
/// ```
pub struct MailMerge {
    options: MergeOptions,
    output_dir: Option<PathBuf>,
}

impl MailMerge {
    /// Create a new MailMerge builder.
    pub fn new() -> Self {
        Self {
            options: MergeOptions::default(),
            output_dir: None,
        }
    }

    /// Set the separator between template name and data set name.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.options = self.options.with_separator(separator);
        self
    }

    /// Set the directory the merged document is written to.
    ///
    /// Defaults to the template's directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Fail when the template uses placeholders no column provides.
    pub fn strict(mut self) -> Self {
        self.options = self.options.with_strict(true);
        self
    }

    /// Merge a template file with a sheet file.
    pub fn run<P, Q>(&self, template: P, sheet: Q) -> Result<MergeOutcome>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        self.run_with_progress(template, sheet, |_, _| {})
    }

    /// Merge a template file with a sheet file, reporting progress per record.
    pub fn run_with_progress<P, Q, F>(
        &self,
        template: P,
        sheet: Q,
        progress: F,
    ) -> Result<MergeOutcome>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: FnMut(usize, usize),
    {
        let template = absolute(template.as_ref())?;
        let sheet = absolute(sheet.as_ref())?;
        let output_dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => parent_dir(&template),
        };

        let mut documents = FileDocumentStore::new(output_dir);
        let tables = FileTabularStore::new(parent_dir(&sheet));
        merge::run_with_progress(
            &mut documents,
            &tables,
            &template.to_string_lossy(),
            &sheet.to_string_lossy(),
            &self.options,
            progress,
        )
    }

    /// Get the merge options.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }
}

impl Default for MailMerge {
    fn default() -> Self {
        Self::new()
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
