//! Document store backed by a directory of JSON files.

use super::DocumentStore;
use crate::detect::{detect_document_format, DocumentFormat};
use crate::error::{Error, Result};
use crate::model::{Document, Paragraph};
use chrono::Utc;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Characters that cannot appear in file names on common platforms.
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Stores documents as JSON files under a root directory.
///
/// Document ids are file paths. Relative ids are resolved against the root;
/// absolute ids are used as-is. Created documents get their file name as
/// id. Templates may also be plain text files, read as one paragraph per
/// line.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    /// Create a store rooted at `root`. The directory is created on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the file path of a document id.
    pub fn path_of(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    fn read_text_template(path: &Path) -> Result<Document> {
        let text = fs::read_to_string(path)?;
        let mut doc = Document::new();
        for line in text.lines() {
            doc.append_paragraph(Paragraph::with_text(line));
        }
        Ok(doc)
    }

    /// Reserve a fresh file for `name`, adding " (2)", " (3)", ... when taken.
    ///
    /// Returns the file name (the new document id), its path and the file.
    fn create_unique(&self, name: &str) -> Result<(String, PathBuf, File)> {
        fs::create_dir_all(&self.root).map_err(|e| write_error(&self.root, e))?;

        let stem = sanitize_file_name(name);
        for attempt in 1u32.. {
            let file_name = if attempt == 1 {
                format!("{}.json", stem)
            } else {
                format!("{} ({}).json", stem, attempt)
            };
            let path = self.root.join(&file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file_name, path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(write_error(&path, e)),
            }
        }
        Err(Error::Store(format!("no free file name for {}", name)))
    }
}

impl DocumentStore for FileDocumentStore {
    fn open(&self, id: &str) -> Result<Document> {
        let path = self.path_of(id);
        if !path.is_file() {
            return Err(Error::DocumentNotFound(id.to_string()));
        }

        let mut doc = match detect_document_format(&path)? {
            DocumentFormat::Json => {
                let reader = BufReader::new(File::open(&path)?);
                serde_json::from_reader::<_, Document>(reader)?
            }
            DocumentFormat::PlainText => Self::read_text_template(&path)?,
        };

        if doc.metadata.name.is_empty() {
            doc.metadata.name = file_stem(&path);
        }
        doc.id = Some(id.to_string());
        debug!(
            "Opened document '{}' ({} blocks) from {}",
            doc.name(),
            doc.body.len(),
            path.display()
        );
        Ok(doc)
    }

    fn create(&mut self, name: &str) -> Result<Document> {
        let (id, path, file) = self.create_unique(name)?;

        let mut doc = Document::named(name);
        doc.id = Some(id);
        doc.metadata.created = Some(Utc::now());

        write_json(file, &doc).map_err(|e| match e {
            Error::Io(io) => write_error(&path, io),
            other => other,
        })?;
        debug!("Created document '{}' at {}", name, path.display());
        Ok(doc)
    }

    fn save(&mut self, doc: &Document) -> Result<()> {
        let id = doc
            .id
            .as_deref()
            .ok_or_else(|| Error::Store(format!("document '{}' has no id", doc.name())))?;
        let path = self.path_of(id);

        let file = File::create(&path).map_err(|e| write_error(&path, e))?;
        write_json(file, doc).map_err(|e| match e {
            Error::Io(io) => write_error(&path, io),
            other => other,
        })?;
        debug!("Saved document '{}' to {}", doc.name(), path.display());
        Ok(())
    }
}

fn write_json(file: File, doc: &Document) -> Result<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_error(path: &Path, err: io::Error) -> Error {
    Error::Store(format!("{}: {}", path.display(), err))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Turn a document name into a safe file stem.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if RESERVED_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
