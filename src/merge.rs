//! The merge run: template + data set in, one paginated document out.

use crate::compose::{append_record_block, create_copy_shell, DEFAULT_SEPARATOR};
use crate::error::{Error, Result};
use crate::model::{DataSet, Document, Paragraph};
use crate::reader::read_data_set;
use crate::store::{DocumentStore, TabularStore};
use crate::template::{fill_template_counted, paragraph_placeholders};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Options for a merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Separator between template name and data set name in the output name
    pub separator: String,

    /// Fail when the template uses placeholders no column provides
    pub strict: bool,
}

impl MergeOptions {
    /// Create new merge options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output name separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Enable or disable strict placeholder checking.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            strict: false,
        }
    }
}

/// Statistics collected during a merge run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Number of records merged
    pub record_count: usize,

    /// Number of paragraphs written to the output
    pub paragraph_count: usize,

    /// Number of page breaks written to the output
    pub page_break_count: usize,

    /// Number of placeholder tokens replaced
    pub replacement_count: usize,

    /// Placeholder names used by the template, in first-occurrence order
    pub placeholders: Vec<String>,

    /// Template placeholders that no column provides
    pub unmatched_placeholders: Vec<String>,
}

/// Result of a merge run.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged document, as saved to the document store
    pub document: Document,

    /// Run statistics
    pub report: MergeReport,
}

/// Merge `data` into `source`, writing the output into `store`.
pub fn merge_documents<S>(
    store: &mut S,
    source: &Document,
    data: &DataSet,
    data_set_name: &str,
    options: &MergeOptions,
) -> Result<MergeOutcome>
where
    S: DocumentStore + ?Sized,
{
    merge_documents_with_progress(store, source, data, data_set_name, options, |_, _| {})
}

/// Like [`merge_documents`], calling `progress(done, total)` after each
/// record block is appended.
///
/// The template paragraphs are read once; every record gets fresh clones of
/// them. Record `n` of the data set becomes block `n` of the output, and all
/// blocks but the first are preceded by a page break. An empty data set
/// produces a document with the template's geometry and an empty body.
pub fn merge_documents_with_progress<S, F>(
    store: &mut S,
    source: &Document,
    data: &DataSet,
    data_set_name: &str,
    options: &MergeOptions,
    mut progress: F,
) -> Result<MergeOutcome>
where
    S: DocumentStore + ?Sized,
    F: FnMut(usize, usize),
{
    let template: Vec<Paragraph> = source.paragraphs().cloned().collect();
    let skipped = source.body.len() - template.len();
    if skipped > 0 {
        debug!(
            "Skipping {} non-paragraph blocks in template '{}'",
            skipped,
            source.name()
        );
    }

    let mut report = MergeReport {
        placeholders: paragraph_placeholders(&template),
        ..Default::default()
    };
    report.unmatched_placeholders = report
        .placeholders
        .iter()
        .filter(|name| !data.has_column(name))
        .cloned()
        .collect();

    if !report.unmatched_placeholders.is_empty() {
        if options.strict {
            return Err(Error::UnmatchedPlaceholders(
                report.unmatched_placeholders.clone(),
            ));
        }
        warn!(
            "Template '{}' uses placeholders with no matching column: {}",
            source.name(),
            report.unmatched_placeholders.join(", ")
        );
    }

    let mut target = create_copy_shell(store, source, data_set_name, &options.separator)?;
    target.metadata.source = Some(source.name().to_string());
    target.metadata.data_set = Some(data_set_name.to_string());

    let total = data.len();
    for (index, record) in data.iter().enumerate() {
        let mut block = Vec::with_capacity(template.len());
        for unit in &template {
            let (filled, replaced) = fill_template_counted(unit.clone(), record);
            report.replacement_count += replaced;
            block.push(filled);
        }
        report.paragraph_count += append_record_block(&mut target, block, index == 0);
        progress(index + 1, total);
    }

    report.record_count = total;
    report.page_break_count = target.page_break_count();
    target.metadata.record_count = Some(total);
    store.save(&target)?;

    info!(
        "Merged {} records into '{}' ({} paragraphs, {} page breaks, {} replacements)",
        report.record_count,
        target.name(),
        report.paragraph_count,
        report.page_break_count,
        report.replacement_count
    );

    Ok(MergeOutcome {
        document: target,
        report,
    })
}

/// Run a full merge: open the template and the data set, then merge.
///
/// Both sources are read before the output document is created, so a
/// missing template or sheet leaves the document store untouched.
pub fn run<D, T>(
    documents: &mut D,
    tables: &T,
    document_id: &str,
    sheet_id: &str,
    options: &MergeOptions,
) -> Result<MergeOutcome>
where
    D: DocumentStore + ?Sized,
    T: TabularStore + ?Sized,
{
    run_with_progress(documents, tables, document_id, sheet_id, options, |_, _| {})
}

/// Like [`run`], reporting progress per record.
pub fn run_with_progress<D, T, F>(
    documents: &mut D,
    tables: &T,
    document_id: &str,
    sheet_id: &str,
    options: &MergeOptions,
    progress: F,
) -> Result<MergeOutcome>
where
    D: DocumentStore + ?Sized,
    T: TabularStore + ?Sized,
    F: FnMut(usize, usize),
{
    let source = documents.open(document_id)?;
    let (data, data_set_name) = read_data_set(tables, sheet_id)?;
    merge_documents_with_progress(documents, &source, &data, &data_set_name, options, progress)
}
