//! # notate
//!
//! Live notation substitution and uppercase-run diagnostics for text buffers.
//!
//! Two independent engines react to the full text of a changed document:
//!
//! - [`substitution`] rewrites the first pending backslash mnemonic (`\alpha `, `\le `,
//!   `\1/2 `, ...) into its glyph from the [`symbols`] table, one edit per pass.
//! - [`diagnostics`] reports runs of two or more uppercase ASCII letters as warnings, up to
//!   the limit resolved through the [`settings`] cache.
//!
//! Both engines are pure functions of their inputs; positions are produced through
//! [`text::LineIndex`] in the UTF-16 line/column scheme editors speak. The protocol layer
//! lives in the `notate-lsp` crate.

pub mod completion;
pub mod diagnostics;
pub mod settings;
pub mod substitution;
pub mod symbols;
pub mod text;

pub use diagnostics::{validate, Finding, Severity, ValidationOptions};
pub use settings::{Settings, SettingsCache, SettingsError};
pub use substitution::{scan_and_substitute, Substitution};
pub use symbols::SymbolTable;
