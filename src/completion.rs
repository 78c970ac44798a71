//! Fixed completion list offered in every position.
//!
//! Candidates carry an opaque numeric id so a client can ask for details lazily.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub id: u64,
    pub label: &'static str,
}

/// Extra text shown once the client resolves a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionDetail {
    pub detail: &'static str,
    pub documentation: &'static str,
}

struct Keyword {
    id: u64,
    label: &'static str,
    detail: &'static str,
    documentation: &'static str,
}

const KEYWORDS: &[Keyword] = &[
    Keyword {
        id: 1,
        label: "where",
        detail: "TypeScript details",
        documentation: "TypeScript documentation",
    },
    Keyword {
        id: 2,
        label: "given",
        detail: "JavaScript details",
        documentation: "JavaScript documentation",
    },
];

pub fn completion_candidates() -> Vec<CompletionCandidate> {
    KEYWORDS
        .iter()
        .map(|keyword| CompletionCandidate {
            id: keyword.id,
            label: keyword.label,
        })
        .collect()
}

pub fn resolve_candidate(id: u64) -> Option<CompletionDetail> {
    KEYWORDS
        .iter()
        .find(|keyword| keyword.id == id)
        .map(|keyword| CompletionDetail {
            detail: keyword.detail,
            documentation: keyword.documentation,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_where_and_given() {
        let labels: Vec<_> = completion_candidates()
            .into_iter()
            .map(|c| (c.id, c.label))
            .collect();
        assert_eq!(labels, [(1, "where"), (2, "given")]);
    }

    #[test]
    fn resolves_known_ids_only() {
        let first = resolve_candidate(1).unwrap();
        assert_eq!(first.detail, "TypeScript details");
        assert_eq!(first.documentation, "TypeScript documentation");
        let second = resolve_candidate(2).unwrap();
        assert_eq!(second.detail, "JavaScript details");
        assert_eq!(second.documentation, "JavaScript documentation");
        assert_eq!(resolve_candidate(3), None);
    }
}
