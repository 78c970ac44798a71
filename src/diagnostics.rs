//! Flags whole words written entirely in uppercase.
//!
//! A pass matches maximal runs of two or more ASCII capitals bounded by ASCII word
//! boundaries (word characters are `[A-Za-z0-9_]`), left to right and non-overlapping,
//! and emits one warning per match. `"McABCson"` is
//! therefore clean while `"é ABC."` and `"(ABC)"` are flagged. Each pass is a pure function
//! of the text and settings; its output replaces whatever the previous pass published.

use crate::settings::Settings;
use crate::text::{LineIndex, TextRange};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range as ByteRange;

static UPPERCASE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[A-Z]{2,}(?-u:\b)").expect("uppercase run pattern is valid")
});

pub const SPELLING_NOTE: &str = "Spelling matters";
pub const NAMES_NOTE: &str = "Particularly for names";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// Secondary annotation pointing back into the same document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedNote {
    pub range: TextRange,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub range: TextRange,
    pub span: ByteRange<usize>,
    pub message: String,
    pub source: String,
    pub related: Vec<RelatedNote>,
}

/// Per-client knobs that shape findings without affecting which runs match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Attach related-information notes (client advertised support for them).
    pub related_information: bool,
    /// Source tag reported on every finding.
    pub source: String,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            related_information: false,
            source: "notate".to_string(),
        }
    }
}

/// Report every uppercase run in `text`, in document order.
///
/// At most `settings.max_number_of_problems` findings are returned; a limit of zero
/// yields none. Related notes are attached only when `options.related_information` is set.
pub fn validate(text: &str, settings: &Settings, options: &ValidationOptions) -> Vec<Finding> {
    let limit = settings.max_number_of_problems;
    if limit == 0 {
        return Vec::new();
    }
    let index = LineIndex::new(text);
    UPPERCASE_RUN
        .find_iter(text)
        .take(limit)
        .map(|m| {
            let span = m.range();
            let range = index.range(&span);
            let related = if options.related_information {
                vec![
                    RelatedNote {
                        range,
                        message: SPELLING_NOTE.to_string(),
                    },
                    RelatedNote {
                        range,
                        message: NAMES_NOTE.to_string(),
                    },
                ]
            } else {
                Vec::new()
            };
            Finding {
                severity: Severity::Warning,
                range,
                span,
                message: format!("{} is all uppercase.", m.as_str()),
                source: options.source.clone(),
                related,
            }
        })
        .collect()
}
