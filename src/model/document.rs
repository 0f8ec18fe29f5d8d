//! Document-level types.

use super::{Block, PageGeometry, Paragraph};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document: page geometry plus an ordered body of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store identifier, assigned by the document store that holds it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Document metadata (name, merge provenance)
    #[serde(default)]
    pub metadata: Metadata,

    /// Page size and margins
    #[serde(default)]
    pub geometry: PageGeometry,

    /// Body content blocks
    #[serde(default)]
    pub body: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: None,
            metadata: Metadata::default(),
            geometry: PageGeometry::default(),
            body: Vec::new(),
        }
    }

    /// Create a new empty document with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.metadata.name = name.into();
        doc
    }

    /// Get the document name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Iterate over the paragraphs of the body, skipping other blocks.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(Block::as_paragraph)
    }

    /// Append a paragraph to the body.
    pub fn append_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(Block::Paragraph(paragraph));
    }

    /// Append a page break marker to the body.
    pub fn append_page_break(&mut self) {
        self.body.push(Block::PageBreak);
    }

    /// Get the number of paragraphs in the body.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Get the number of page break markers in the body.
    pub fn page_break_count(&self) -> usize {
        self.body.iter().filter(|b| b.is_page_break()).count()
    }

    /// Check if the body has no blocks.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Split the body at page break markers.
    ///
    /// A body with `n` page breaks yields `n + 1` sections; an empty body
    /// yields none.
    pub fn sections(&self) -> Vec<&[Block]> {
        if self.body.is_empty() {
            return Vec::new();
        }
        self.body.split(Block::is_page_break).collect()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document name
    pub name: String,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Name of the template this document was merged from
    pub source: Option<String>,

    /// Name of the data set this document was merged with
    pub data_set: Option<String>,

    /// Number of records merged into the document
    pub record_count: Option<usize>,
}

impl Metadata {
    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("name: \"{}\"", escape_yaml(&self.name)));
        if let Some(ref created) = self.created {
            lines.push(format!("created: {}", created.to_rfc3339()));
        }
        if let Some(ref source) = self.source {
            lines.push(format!("source: \"{}\"", escape_yaml(source)));
        }
        if let Some(ref data_set) = self.data_set {
            lines.push(format!("data_set: \"{}\"", escape_yaml(data_set)));
        }
        if let Some(records) = self.record_count {
            lines.push(format!("records: {}", records));
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
