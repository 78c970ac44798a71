//! Rewrites one backslash mnemonic per pass into its glyph.
//!
//! A mnemonic token is `\` + mnemonic + a literal space. A token at the very end of the
//! buffer without its trailing space never matches. Hosts are expected to apply the edit,
//! which triggers another change event and thus another pass, until the buffer holds no
//! tokens.

use crate::symbols::SymbolTable;
use crate::text::{LineIndex, TextRange};
use std::ops::Range as ByteRange;

/// Prefix that introduces a mnemonic token.
pub const TOKEN_PREFIX: char = '\\';
/// Terminator that completes a mnemonic token.
pub const TOKEN_SUFFIX: char = ' ';

/// A single replacement computed against the pre-edit text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub mnemonic: &'static str,
    pub glyph: &'static str,
    /// Byte span of the full token, trailing space included.
    pub span: ByteRange<usize>,
    /// Host addressing of `span`.
    pub range: TextRange,
}

impl Substitution {
    /// Materialise the edit over the text it was computed from.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() - self.span.len() + self.glyph.len());
        out.push_str(&text[..self.span.start]);
        out.push_str(self.glyph);
        out.push_str(&text[self.span.end..]);
        out
    }
}

/// The literal token searched for `mnemonic`.
pub fn token_for(mnemonic: &str) -> String {
    let mut token = String::with_capacity(mnemonic.len() + 2);
    token.push(TOKEN_PREFIX);
    token.push_str(mnemonic);
    token.push(TOKEN_SUFFIX);
    token
}

/// Find the single edit for this pass, or `None` when the buffer holds no token.
///
/// The table is walked in enumeration order and the first mnemonic whose token occurs
/// anywhere wins, even when another mnemonic's token appears earlier in the text. The
/// winner's leftmost occurrence is replaced:
///
///     table order: ..., x, ..., theta, ...
///     text:        "\theta val \x val"
///     edit:        replaces "\x " (x is enumerated first)
pub fn scan_and_substitute(text: &str, table: &SymbolTable) -> Option<Substitution> {
    if !text.contains(TOKEN_PREFIX) {
        return None;
    }
    table.iter().find_map(|entry| {
        let token = token_for(entry.mnemonic);
        let start = text.find(&token)?;
        let span = start..start + token.len();
        let range = LineIndex::new(text).range(&span);
        tracing::trace!(mnemonic = entry.mnemonic, %range, "mnemonic token found");
        Some(Substitution {
            mnemonic: entry.mnemonic,
            glyph: entry.glyph,
            span,
            range,
        })
    })
}

/// Apply passes until the buffer holds no tokens, the way a host converges when it
/// re-triggers a pass after every applied edit.
pub fn substitute_all(text: &str, table: &SymbolTable) -> String {
    let mut current = text.to_string();
    while let Some(substitution) = scan_and_substitute(&current, table) {
        current = substitution.apply(&current);
    }
    current
}
