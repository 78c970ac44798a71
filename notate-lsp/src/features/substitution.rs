use super::to_lsp_range;
use lsp_types::{TextEdit, Url, WorkspaceEdit};
use notate::Substitution;
use std::collections::HashMap;

/// Wrap a substitution as a single-edit `workspace/applyEdit` payload.
pub fn workspace_edit(uri: &Url, substitution: &Substitution) -> WorkspaceEdit {
    let edit = TextEdit {
        range: to_lsp_range(&substitution.range),
        new_text: substitution.glyph.to_string(),
    };
    WorkspaceEdit::new(HashMap::from([(uri.clone(), vec![edit])]))
}
