//! In-memory stores, for embedding and tests.

use super::{DocumentStore, Sheet, TabularStore};
use crate::error::{Error, Result};
use crate::model::Document;
use chrono::Utc;
use std::collections::HashMap;

/// Keeps documents in a map keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: HashMap<String, Document>,
    next_id: usize,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document under `id`, replacing any previous one.
    pub fn insert(&mut self, id: impl Into<String>, mut doc: Document) {
        let id = id.into();
        doc.id = Some(id.clone());
        self.documents.insert(id, doc);
    }

    /// Get a stored document.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Get the number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn open(&self, id: &str) -> Result<Document> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }

    fn create(&mut self, name: &str) -> Result<Document> {
        let id = loop {
            self.next_id += 1;
            let candidate = format!("doc-{}", self.next_id);
            if !self.documents.contains_key(&candidate) {
                break candidate;
            }
        };

        let mut doc = Document::named(name);
        doc.id = Some(id.clone());
        doc.metadata.created = Some(Utc::now());
        self.documents.insert(id, doc.clone());
        Ok(doc)
    }

    fn save(&mut self, doc: &Document) -> Result<()> {
        let id = doc
            .id
            .clone()
            .ok_or_else(|| Error::Store(format!("document '{}' has no id", doc.name())))?;
        self.documents.insert(id, doc.clone());
        Ok(())
    }
}

/// Keeps sheets in a map keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryTabularStore {
    sheets: HashMap<String, Sheet>,
}

impl MemoryTabularStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sheet under `id`, replacing any previous one.
    pub fn insert(&mut self, id: impl Into<String>, sheet: Sheet) {
        self.sheets.insert(id.into(), sheet);
    }
}

impl TabularStore for MemoryTabularStore {
    fn open(&self, id: &str) -> Result<Sheet> {
        self.sheets
            .get(id)
            .cloned()
            .ok_or_else(|| Error::SheetNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    #[test]
    fn test_document_lifecycle() {
        let mut store = MemoryDocumentStore::new();
        store.insert("doc-1", Document::named("Template"));

        let mut created = store.create("Output").unwrap();
        assert_eq!(created.id.as_deref(), Some("doc-2"));
        assert_eq!(store.len(), 2);

        created.append_paragraph(Paragraph::with_text("Hi"));
        store.save(&created).unwrap();
        assert_eq!(store.get("doc-2").unwrap().paragraph_count(), 1);
    }

    #[test]
    fn test_missing_entries() {
        let docs = MemoryDocumentStore::new();
        assert!(matches!(docs.open("x"), Err(Error::DocumentNotFound(_))));

        let sheets = MemoryTabularStore::new();
        assert!(matches!(sheets.open("x"), Err(Error::SheetNotFound(_))));
    }
}
