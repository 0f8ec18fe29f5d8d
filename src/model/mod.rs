//! Document and data model types for mail merge.
//!
//! The document side (document, page geometry, paragraphs) is the in-memory
//! representation that templates are read into and merged output is built
//! from. The data side (cell values, records, data sets) is what tabular
//! sources are read into.

mod document;
mod page;
mod paragraph;
mod record;

pub use document::{Document, Metadata};
pub use page::{Block, PageGeometry};
pub use paragraph::{Alignment, InlineContent, Paragraph, ParagraphStyle, TextRun, TextStyle};
pub use record::{CellValue, DataSet, Record};
