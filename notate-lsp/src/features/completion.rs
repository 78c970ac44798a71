use lsp_types::{CompletionItem, CompletionItemKind, Documentation};
use notate::completion::{CompletionCandidate, CompletionDetail};
use serde_json::Value;

pub fn to_lsp_completion_item(candidate: &CompletionCandidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label.to_string(),
        kind: Some(CompletionItemKind::TEXT),
        data: Some(Value::from(candidate.id)),
        ..Default::default()
    }
}

/// Opaque candidate id carried in `CompletionItem::data`.
pub fn candidate_id(item: &CompletionItem) -> Option<u64> {
    item.data.as_ref().and_then(Value::as_u64)
}

pub fn apply_detail(mut item: CompletionItem, detail: &CompletionDetail) -> CompletionItem {
    item.detail = Some(detail.detail.to_string());
    item.documentation = Some(Documentation::String(detail.documentation.to_string()));
    item
}
