//! Content Stream Link Scrubber
//! Author: kartik4091
//!
//! Deletes link-looking byte runs from page content streams. This is a text
//! heuristic over raw operator bytes, not a structural edit: it can hit
//! unrelated text and cannot promise that every link is gone.

use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use lopdf::{ObjectId, Stream};
use regex::bytes::{Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::config::{LinkPattern, StripConfig};
use crate::error::{CleanerError, Result};
use crate::pdf_document::PdfDocument;

/// Whitespace as seen by Latin-1 text matching: ASCII whitespace plus the
/// information separators 0x1C-0x1F, NEL and NBSP.
const LATIN1_SPACE: &str = r"\t\n\x0B\x0C\r \x1C-\x1F\x85\xA0";

lazy_static! {
    static ref URI_ACTION: Regex = builtin(&format!(r"/URI[{LATIN1_SPACE}]*\([^)]*\)"));
    static ref INLINE_ACTION: Regex = builtin(&format!(r"/A[{LATIN1_SPACE}]*<<[^>]*>>"));
    static ref GOTO_ACTION: Regex = builtin(r"/GoTo[^/]*");
    static ref T_ME: Regex = builtin(&format!(r"t\.me[^{LATIN1_SPACE}>]*"));
    static ref T_COM: Regex = builtin(&format!(r"t\.com[^{LATIN1_SPACE}>]*"));
    static ref HTTP: Regex = builtin(&format!(r"http[^{LATIN1_SPACE}>]*"));
    static ref HTTPS: Regex = builtin(&format!(r"https[^{LATIN1_SPACE}>]*"));
}

// Unicode off: every byte is one character, exactly like Latin-1 text.
fn builtin(pattern: &str) -> Regex {
    Regex::new(&format!("(?i-u){}", pattern)).unwrap()
}

fn builtin_regex(pattern: LinkPattern) -> &'static Regex {
    match pattern {
        LinkPattern::Uri => &*URI_ACTION,
        LinkPattern::InlineAction => &*INLINE_ACTION,
        LinkPattern::GoTo => &*GOTO_ACTION,
        LinkPattern::TMe => &*T_ME,
        LinkPattern::TCom => &*T_COM,
        LinkPattern::Http => &*HTTP,
        LinkPattern::Https => &*HTTPS,
    }
}

/// Compiles a user supplied pattern the way built-ins are matched: case-insensitive
pub fn compile_extra_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Returns the stream's bytes with its filters undone
pub fn decode_stream(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    label: String,
    regex: Regex,
}

/// Result of scrubbing one buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrubOutcome {
    pub data: Vec<u8>,
    /// Matches removed, keyed by pattern label
    pub matches: BTreeMap<String, usize>,
}

impl ScrubOutcome {
    pub fn total_matches(&self) -> usize {
        self.matches.values().sum()
    }

    pub fn changed(&self) -> bool {
        self.total_matches() > 0
    }
}

/// What scrubbing did to one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScrub {
    pub streams_scrubbed: usize,
    pub matches: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct ContentScrubber {
    patterns: Vec<CompiledPattern>,
}

impl ContentScrubber {
    pub fn new(config: &StripConfig) -> Result<Self> {
        let mut scrubber = Self::with_patterns(&config.patterns);
        for (index, pattern) in config.extra_patterns.iter().enumerate() {
            let regex = compile_extra_pattern(pattern)
                .map_err(|e| CleanerError::PatternError(format!("{}: {}", pattern, e)))?;
            scrubber.patterns.push(CompiledPattern {
                label: format!("extra_{}", index),
                regex,
            });
        }
        Ok(scrubber)
    }

    pub fn with_patterns(patterns: &[LinkPattern]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| CompiledPattern {
                label: p.name().to_string(),
                regex: builtin_regex(*p).clone(),
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Applies every pattern in order, each one to the output of the last
    pub fn scrub(&self, data: &[u8]) -> ScrubOutcome {
        let mut text = data.to_vec();
        let mut matches = BTreeMap::new();

        for pattern in &self.patterns {
            let count = pattern.regex.find_iter(&text).count();
            if count == 0 {
                continue;
            }
            trace!("Pattern {} matched {} time(s)", pattern.label, count);
            *matches.entry(pattern.label.clone()).or_insert(0) += count;
            text = pattern.regex.replace_all(&text, &b""[..]).into_owned();
        }

        ScrubOutcome { data: text, matches }
    }

    pub fn matches_any(&self, data: &[u8]) -> bool {
        self.patterns.iter().any(|p| p.regex.is_match(data))
    }

    /// Scrubs every content stream of a page. All streams are decoded and
    /// scrubbed before any is written back, so an error leaves the page
    /// untouched. Streams already in `seen` belong to an earlier page, whether
    /// or not that page could be scrubbed.
    pub fn scrub_page(
        &self,
        doc: &mut PdfDocument,
        page_id: ObjectId,
        seen: &mut HashSet<ObjectId>,
    ) -> Result<PageScrub> {
        let mut result = PageScrub::default();
        let mut pending = Vec::new();
        let mut rewrites = Vec::new();

        for id in doc.content_stream_ids(page_id)? {
            if !seen.contains(&id) && !pending.contains(&id) {
                pending.push(id);
            }
        }
        // Claimed before decoding so a failed page keeps its shared streams.
        seen.extend(pending.iter().copied());

        for &id in &pending {
            let stream = doc.document.get_object(id)?.as_stream()?;
            let outcome = self.scrub(&decode_stream(stream)?);
            if outcome.changed() {
                for (label, count) in &outcome.matches {
                    *result.matches.entry(label.clone()).or_insert(0) += count;
                }
                rewrites.push((id, outcome.data));
            }
        }

        for (id, data) in rewrites {
            let stream = doc.document.get_object_mut(id)?.as_stream_mut()?;
            stream.set_plain_content(data);
            result.streams_scrubbed += 1;
            debug!("Rewrote content stream {:?} of page {:?}", id, page_id);
        }

        Ok(result)
    }
}
