//! PDF Document abstraction
//! Author: kartik4905

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info};

use crate::error::{CleanerError, Error, Result};

/// PDF Document wrapper for loading, editing and saving
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub document: Document,
    pub file_path: PathBuf,
}

impl PdfDocument {
    /// Load a PDF document from file path
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::InvalidInput(format!("Input file does not exist: {}", path.display())));
        }
        let document = Document::load(path)?;
        debug!("Loaded {} ({} objects)", path.display(), document.objects.len());

        Ok(Self {
            document,
            file_path: path.to_path_buf(),
        })
    }

    /// Parse a document held in memory; `label` stands in for the file path
    pub fn from_bytes(bytes: &[u8], label: impl Into<PathBuf>) -> Result<Self> {
        let document = Document::load_mem(bytes)?;
        Ok(Self {
            document,
            file_path: label.into(),
        })
    }

    /// Page object ids in page order
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().into_values().collect()
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Object id of the catalog referenced by the trailer's `/Root`
    pub fn catalog_id(&self) -> Result<ObjectId> {
        let root = self.document.trailer.get(b"Root")?;
        Ok(root.as_reference()?)
    }

    /// Resolves a page's `/Contents` entry: a stream reference, an array of
    /// stream references, or a reference to such an array. A page without
    /// contents yields nothing.
    pub fn content_stream_ids(&self, page_id: ObjectId) -> Result<Vec<ObjectId>> {
        let page = self.document.get_object(page_id)?.as_dict()?;
        let contents = match page.get(b"Contents") {
            Ok(obj) => obj,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(id) => match self.document.get_object(*id) {
                Ok(Object::Array(items)) => stream_references(items, page_id),
                _ => Ok(vec![*id]),
            },
            Object::Array(items) => stream_references(items, page_id),
            _ => Err(CleanerError::ContentError(format!(
                "/Contents of page {:?} is neither a reference nor an array",
                page_id
            ))
            .into()),
        }
    }

    /// Serializes the document to memory
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Serializes the whole document before touching the file system so a
    /// failed save never leaves a partial output behind.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

fn stream_references(items: &[Object], page_id: ObjectId) -> Result<Vec<ObjectId>> {
    items
        .iter()
        .map(|item| {
            item.as_reference().map_err(|_| {
                Error::from(CleanerError::ContentError(format!(
                    "/Contents array of page {:?} holds a non-reference entry",
                    page_id
                )))
            })
        })
        .collect()
}

/// `<dir of input>/<prefix><basename>`; an input without a parent resolves
/// to the current directory.
pub fn output_path_for(input: &Path, prefix: &str) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("Input has no file name: {}", input.display())))?;

    let mut name = prefix.to_owned();
    name.push_str(&file_name.to_string_lossy());

    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(name))
}
