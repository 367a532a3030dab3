//! Output Verifier Module
//! Author: kartik4091
//! Created: 2025-06-04 10:24:00 UTC
//!
//! Re-reads a written file and reports any link entries or link-looking
//! content that survived the pass.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cleaner::content_scrubber::decode_stream;
use crate::cleaner::ContentScrubber;
use crate::config::StripConfig;
use crate::error::{Error, Result};
use crate::pdf_document::PdfDocument;
use crate::utils::has_pdf_header;

/// Category of a verification issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum IssueCategory {
    PageEntry,
    CatalogEntry,
    Content,
}

/// Individual finding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationIssue {
    pub category: IssueCategory,
    /// One-based page number, when the finding belongs to a page
    pub page: Option<usize>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub passed: bool,
    pub issues: Vec<VerificationIssue>,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OutputVerifier {
    page_keys: Vec<Vec<u8>>,
    root_keys: Vec<Vec<u8>>,
    scrubber: Option<ContentScrubber>,
}

impl OutputVerifier {
    /// Checks for the same keys and patterns the configuration removes
    pub fn from_config(config: &StripConfig) -> Result<Self> {
        let scrubber = if config.scrub_content {
            Some(ContentScrubber::new(config)?)
        } else {
            None
        };
        Ok(Self {
            page_keys: config.page_key_names(),
            root_keys: config.root_key_names(),
            scrubber,
        })
    }

    pub fn verify_file(&self, path: &Path) -> Result<VerificationReport> {
        if !path.is_file() {
            return Err(Error::VerificationError(format!("Output file does not exist: {}", path.display())));
        }
        let bytes = fs::read(path)?;
        self.verify_bytes(&bytes, path)
    }

    pub fn verify_bytes(&self, bytes: &[u8], label: &Path) -> Result<VerificationReport> {
        if !has_pdf_header(bytes) {
            return Err(Error::VerificationError(format!("{} is not a valid PDF", label.display())));
        }
        let doc = PdfDocument::from_bytes(bytes, label)
            .map_err(|e| Error::VerificationError(format!("{} cannot be reloaded: {}", label.display(), e)))?;

        let mut issues = Vec::new();
        for (index, page_id) in doc.page_ids().into_iter().enumerate() {
            let page_number = index + 1;
            if let Ok(page) = doc.document.get_object(page_id).and_then(|o| o.as_dict()) {
                for key in &self.page_keys {
                    if page.has(key) {
                        issues.push(VerificationIssue {
                            category: IssueCategory::PageEntry,
                            page: Some(page_number),
                            description: format!("page still has /{}", String::from_utf8_lossy(key)),
                        });
                    }
                }
            }
            if let Some(scrubber) = &self.scrubber {
                let finding = match page_content_matches(&doc, page_id, scrubber) {
                    Ok(true) => Some("content stream still matches a link pattern".to_string()),
                    Ok(false) => None,
                    Err(e) => Some(format!("content stream could not be read: {}", e)),
                };
                if let Some(description) = finding {
                    issues.push(VerificationIssue {
                        category: IssueCategory::Content,
                        page: Some(page_number),
                        description,
                    });
                }
            }
        }

        let catalog = doc.catalog_id().and_then(|id| Ok(doc.document.get_object(id)?.as_dict()?.clone()));
        match catalog {
            Ok(catalog) => {
                for key in &self.root_keys {
                    if catalog.has(key) {
                        issues.push(VerificationIssue {
                            category: IssueCategory::CatalogEntry,
                            page: None,
                            description: format!("catalog still has /{}", String::from_utf8_lossy(key)),
                        });
                    }
                }
            }
            Err(e) => debug!("No readable catalog in {}: {}", label.display(), e),
        }

        for issue in &issues {
            warn!("{}: {}", label.display(), issue.description);
        }
        Ok(VerificationReport {
            passed: issues.is_empty(),
            issues,
            verified_at: Utc::now(),
        })
    }
}

fn page_content_matches(doc: &PdfDocument, page_id: lopdf::ObjectId, scrubber: &ContentScrubber) -> Result<bool> {
    for id in doc.content_stream_ids(page_id)? {
        let stream = doc.document.get_object(id)?.as_stream()?;
        if scrubber.matches_any(&decode_stream(stream)?) {
            return Ok(true);
        }
    }
    Ok(false)
}
