//! Conversions from core engine output to protocol types.

pub mod completion;
pub mod diagnostics;
pub mod substitution;

#[cfg(test)]
pub(crate) mod test_support;

use notate::text::{TextPosition, TextRange};
use lsp_types::{Position, Range};

pub(crate) fn to_lsp_position(position: &TextPosition) -> Position {
    Position::new(position.line, position.character)
}

pub(crate) fn to_lsp_range(range: &TextRange) -> Range {
    Range {
        start: to_lsp_position(&range.start),
        end: to_lsp_position(&range.end),
    }
}
