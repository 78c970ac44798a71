use super::to_lsp_range;
use lsp_types::{Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, Location, Url};
use notate::{Finding, Severity};

fn to_lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}

pub fn to_lsp_diagnostic(uri: &Url, finding: &Finding) -> Diagnostic {
    let related_information = if finding.related.is_empty() {
        None
    } else {
        Some(
            finding
                .related
                .iter()
                .map(|note| DiagnosticRelatedInformation {
                    location: Location {
                        uri: uri.clone(),
                        range: to_lsp_range(&note.range),
                    },
                    message: note.message.clone(),
                })
                .collect(),
        )
    };

    Diagnostic {
        range: to_lsp_range(&finding.range),
        severity: Some(to_lsp_severity(finding.severity)),
        code: None,
        code_description: None,
        source: Some(finding.source.clone()),
        message: finding.message.clone(),
        related_information,
        tags: None,
        data: None,
    }
}
