//! Language Server Protocol (LSP) front end for notate
//!
//!     This crate connects the notate engines to any LSP-compatible editor. The server keeps
//!     the latest full text of every open document and, on each open or change, runs two
//!     independent passes against that text:
//!
//!         1. Substitution: the first pending backslash mnemonic (`\alpha `, `\le `, ...) is
//!            replaced with its glyph through a `workspace/applyEdit` request. The client
//!            applies it, sends the new text, and the next pass picks up the next mnemonic.
//!
//!         2. Validation: runs of two or more uppercase letters are published as warnings,
//!            capped by the client's `maxNumberOfProblems` setting.
//!
//!     The passes do not coordinate. A pass started against older text still completes,
//!     and whatever a later pass publishes overwrites it.
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC transport, capability negotiation, request routing
//!
//!     Server Layer (this crate):
//!         - Implements the LanguageServer trait
//!         - Holds document snapshots, negotiated client capabilities and the settings cache
//!         - Talks to the client through [`server::LspClient`] so tests can record traffic
//!
//!     Feature Layer (the `notate` crate):
//!         - Pure functions over text, settings and the symbol table
//!         - Converted into protocol types by [`features`]
//!
//! Settings
//!
//!     Clients that answer `workspace/configuration` get per-document settings, cached until
//!     the next `workspace/didChangeConfiguration`. Other clients push one global settings
//!     object with that notification. Fallback values come from `notate-config`.
//!
//! Usage
//!
//!     $ notate-lsp --stdio
//!     Starts the language server on stdin/stdout for editor integration.
//!

pub mod error;
pub mod features;
pub mod server;

pub use error::ServerError;
pub use server::NotateLanguageServer;
