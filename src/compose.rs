//! Building the merged output document.

use crate::error::Result;
use crate::model::{Document, Paragraph};
use crate::store::DocumentStore;
use log::debug;

/// Separator between the template name and the data set name in the output
/// document's name.
pub const DEFAULT_SEPARATOR: &str = " - ";

/// Name of the merged document: `"<source name><separator><data set name>"`.
pub fn target_name(source: &Document, data_set_name: &str, separator: &str) -> String {
    format!("{}{}{}", source.name(), separator, data_set_name)
}

/// Copy page size and margins from `source` to `target`.
pub fn copy_page_geometry(source: &Document, target: &mut Document) {
    target.geometry = source.geometry;
}

/// Create an empty output document with the layout of `source`.
///
/// The new document is created in `store`, gets the page geometry of
/// `source`, and is saved once so the store holds the shell before any
/// record content is added. No body content is copied.
pub fn create_copy_shell<S>(
    store: &mut S,
    source: &Document,
    data_set_name: &str,
    separator: &str,
) -> Result<Document>
where
    S: DocumentStore + ?Sized,
{
    let name = target_name(source, data_set_name, separator);
    let mut target = store.create(&name)?;
    copy_page_geometry(source, &mut target);
    store.save(&target)?;

    debug!(
        "Created '{}' with page {}x{}pt",
        name, target.geometry.page_width, target.geometry.page_height
    );
    Ok(target)
}

/// Append one record's block of paragraphs to `target`.
///
/// Every block except the first is preceded by a page break. Returns the
/// number of paragraphs appended.
pub fn append_record_block<I>(target: &mut Document, units: I, is_first: bool) -> usize
where
    I: IntoIterator<Item = Paragraph>,
{
    if !is_first {
        target.append_page_break();
    }

    let mut appended = 0;
    for unit in units {
        target.append_paragraph(unit);
        appended += 1;
    }
    appended
}
