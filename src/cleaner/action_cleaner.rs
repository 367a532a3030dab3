//! Link annotation and action remover
//! Author: kartik4091
//! Created: 2025-06-03
//!
//! Deletes annotation, action and form entries from page dictionaries and
//! the document catalog.

use lopdf::{Dictionary, ObjectId};
use tracing::{debug, info};

use crate::config::{CatalogMode, StripConfig};
use crate::error::{CleanerError, Result};
use crate::pdf_document::PdfDocument;

/// Catalog entries kept when the catalog is rebuilt
const FRESH_CATALOG_KEYS: [&[u8]; 2] = [b"Type", b"Pages"];

#[derive(Debug, Clone)]
pub struct ActionCleaner {
    page_keys: Vec<Vec<u8>>,
    root_keys: Vec<Vec<u8>>,
    catalog: CatalogMode,
}

impl ActionCleaner {
    pub fn new(config: &StripConfig) -> Self {
        Self {
            page_keys: config.page_key_names(),
            root_keys: config.root_key_names(),
            catalog: config.catalog,
        }
    }

    /// Removes the configured keys from one page; returns the names removed
    pub fn strip_page(&self, doc: &mut PdfDocument, page_id: ObjectId) -> Result<Vec<String>> {
        let page = doc
            .document
            .get_object_mut(page_id)?
            .as_dict_mut()
            .map_err(|_| CleanerError::StructureError(format!("page {:?} is not a dictionary", page_id)))?;

        let removed = remove_keys(page, &self.page_keys);
        if !removed.is_empty() {
            debug!("Page {:?}: removed {}", page_id, removed.join(", "));
        }
        Ok(removed)
    }

    /// Strips the document catalog; returns the names removed
    pub fn strip_catalog(&self, doc: &mut PdfDocument) -> Result<Vec<String>> {
        let catalog_id = doc.catalog_id()?;
        let catalog = doc
            .document
            .get_object_mut(catalog_id)?
            .as_dict_mut()
            .map_err(|_| CleanerError::StructureError("document catalog is not a dictionary".into()))?;

        let mut removed = match self.catalog {
            CatalogMode::Fresh => {
                let extra: Vec<Vec<u8>> = catalog
                    .iter()
                    .map(|(key, _)| key.clone())
                    .filter(|key| !FRESH_CATALOG_KEYS.contains(&key.as_slice()))
                    .collect();
                catalog.set("Type", "Catalog");
                remove_keys(catalog, &extra)
            }
            CatalogMode::Preserve => Vec::new(),
        };
        removed.extend(remove_keys(catalog, &self.root_keys));

        if !removed.is_empty() {
            info!("Removed catalog entries: {}", removed.join(", "));
        }
        Ok(removed)
    }
}

fn remove_keys(dict: &mut Dictionary, keys: &[Vec<u8>]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| dict.remove(key).map(|_| String::from_utf8_lossy(key).into_owned()))
        .collect()
}
