//! Configuration types and validation for the link stripping pass
//! Author: kartik4091

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cleaner::content_scrubber::compile_extra_pattern;
use crate::error::{Error, Result};

/// Default prefix placed in front of the input file name
pub const DEFAULT_OUTPUT_PREFIX: &str = "no_links_";

/// Built-in link patterns, applied in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPattern {
    /// `/URI (...)` action strings
    Uri,
    /// `/A << ... >>` inline action dictionaries
    InlineAction,
    /// `/GoTo` actions up to the next name
    GoTo,
    TMe,
    TCom,
    Http,
    Https,
}

impl LinkPattern {
    pub const ALL: [LinkPattern; 7] = [
        LinkPattern::Uri,
        LinkPattern::InlineAction,
        LinkPattern::GoTo,
        LinkPattern::TMe,
        LinkPattern::TCom,
        LinkPattern::Http,
        LinkPattern::Https,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LinkPattern::Uri => "uri",
            LinkPattern::InlineAction => "inline_action",
            LinkPattern::GoTo => "go_to",
            LinkPattern::TMe => "t_me",
            LinkPattern::TCom => "t_com",
            LinkPattern::Http => "http",
            LinkPattern::Https => "https",
        }
    }
}

/// How the document catalog is treated after the page pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogMode {
    /// Rebuild the catalog with only `/Type` and `/Pages`
    Fresh,
    /// Keep the catalog, deleting only the configured root keys
    Preserve,
}

/// Settings for one link stripping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    pub page_keys: Vec<String>,
    pub root_keys: Vec<String>,
    pub scrub_content: bool,
    pub patterns: Vec<LinkPattern>,
    pub extra_patterns: Vec<String>,
    pub catalog: CatalogMode,
    pub prune_unreferenced: bool,
    pub compress_output: bool,
    pub output_prefix: String,
    pub overwrite: bool,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            page_keys: vec!["Annots".into(), "AA".into(), "OpenAction".into(), "AcroForm".into()],
            root_keys: vec!["OpenAction".into(), "AA".into()],
            scrub_content: true,
            patterns: LinkPattern::ALL.to_vec(),
            extra_patterns: Vec::new(),
            catalog: CatalogMode::Fresh,
            prune_unreferenced: true,
            compress_output: false,
            output_prefix: DEFAULT_OUTPUT_PREFIX.into(),
            overwrite: false,
        }
    }
}

impl StripConfig {
    /// Loads a configuration file, trying JSON first and then YAML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: StripConfig = serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .map_err(|e| Error::ConfigError(format!("Config parsing error: {}", e)))?;

        debug!("Loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_prefix.is_empty() {
            return Err(Error::ConfigError("Output prefix must not be empty".into()));
        }
        if self.output_prefix.contains(['/', '\\']) {
            return Err(Error::ConfigError(format!(
                "Output prefix must not contain path separators: {}",
                self.output_prefix
            )));
        }
        for key in self.page_keys.iter().chain(self.root_keys.iter()) {
            if normalize_key(key).is_empty() {
                return Err(Error::ConfigError("Dictionary keys must not be empty".into()));
            }
        }
        for pattern in &self.extra_patterns {
            compile_extra_pattern(pattern)
                .map_err(|e| Error::ConfigError(format!("Invalid extra pattern: {}", e)))?;
        }
        Ok(())
    }

    /// Page keys as raw PDF names, without a leading slash
    pub fn page_key_names(&self) -> Vec<Vec<u8>> {
        self.page_keys.iter().map(|k| normalize_key(k).as_bytes().to_vec()).collect()
    }

    pub fn root_key_names(&self) -> Vec<Vec<u8>> {
        self.root_keys.iter().map(|k| normalize_key(k).as_bytes().to_vec()).collect()
    }
}

/// Accepts both `Annots` and `/Annots`
fn normalize_key(key: &str) -> &str {
    key.trim().trim_start_matches('/')
}
