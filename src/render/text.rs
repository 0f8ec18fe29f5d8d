//! Plain text rendering for documents.

use crate::error::Result;
use crate::model::{Block, Document};

use super::options::TEXT_PAGE_BREAK;
use super::RenderOptions;

/// Convert a document to plain text.
///
/// Paragraphs are separated by blank lines; page breaks become a line
/// holding the page break marker (a form feed by default).
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let marker = options.page_break_or(TEXT_PAGE_BREAK);

    let sections: Vec<String> = doc
        .sections()
        .into_iter()
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(Block::as_paragraph)
                .map(|p| p.plain_text())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .collect();

    Ok(sections.join(&format!("\n{}\n", marker)))
}
