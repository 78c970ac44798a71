use crate::server::LspClient;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower_lsp::async_trait;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{
    ApplyWorkspaceEditResponse, ClientCapabilities, ConfigurationItem, Diagnostic, MessageType,
    PublishDiagnosticsClientCapabilities, Registration, TextDocumentClientCapabilities, Url,
    WorkspaceClientCapabilities, WorkspaceEdit,
};

pub(crate) const SAMPLE: &str = "Let \\alpha be in \\R where\n  NASA and ESA agree, A is \\le B.\n";

pub(crate) fn sample_uri() -> Url {
    Url::parse("file:///notes/sample.txt").unwrap()
}

/// Client capabilities with configuration, workspace folders and related information.
pub(crate) fn full_capabilities() -> ClientCapabilities {
    ClientCapabilities {
        workspace: Some(WorkspaceClientCapabilities {
            configuration: Some(true),
            workspace_folders: Some(true),
            ..Default::default()
        }),
        text_document: Some(TextDocumentClientCapabilities {
            publish_diagnostics: Some(PublishDiagnosticsClientCapabilities {
                related_information: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[derive(Default)]
pub(crate) struct Recorded {
    pub published: Mutex<Vec<(Url, Vec<Diagnostic>, Option<i32>)>>,
    pub edits: Mutex<Vec<WorkspaceEdit>>,
    pub configuration_requests: Mutex<Vec<ConfigurationItem>>,
    pub configuration: Mutex<Value>,
    pub registrations: Mutex<Vec<Registration>>,
    pub logs: Mutex<Vec<String>>,
    pub reject_edits: AtomicBool,
    pub fail_configuration: AtomicBool,
    /// Suspend once inside `configuration` so other handlers can interleave.
    pub yield_in_configuration: AtomicBool,
    pub configuration_calls: AtomicUsize,
}

/// Client double that records every outbound call.
#[derive(Clone, Default)]
pub(crate) struct RecordingClient {
    pub recorded: Arc<Recorded>,
}

impl RecordingClient {
    pub fn with_max_problems(max: u64) -> Self {
        let client = Self::default();
        client.set_max_problems(max);
        client
    }

    pub fn set_max_problems(&self, max: u64) {
        *self.recorded.configuration.lock().unwrap() = json!({ "maxNumberOfProblems": max });
    }

    pub fn configuration_calls(&self) -> usize {
        self.recorded.configuration_calls.load(Ordering::SeqCst)
    }

    /// Diagnostics from the most recent publish for `uri`.
    pub fn last_published(&self, uri: &Url) -> Option<Vec<Diagnostic>> {
        self.recorded
            .published
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(published, _, _)| published == uri)
            .map(|(_, diagnostics, _)| diagnostics.clone())
    }

    pub fn publish_count(&self) -> usize {
        self.recorded.published.lock().unwrap().len()
    }

    pub fn edits(&self) -> Vec<WorkspaceEdit> {
        self.recorded.edits.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.recorded.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl LspClient for RecordingClient {
    async fn publish_diagnostics(&self, uri: Url, diags: Vec<Diagnostic>, version: Option<i32>) {
        self.recorded
            .published
            .lock()
            .unwrap()
            .push((uri, diags, version));
    }

    async fn apply_edit(&self, edit: WorkspaceEdit) -> jsonrpc::Result<ApplyWorkspaceEditResponse> {
        self.recorded.edits.lock().unwrap().push(edit);
        let applied = !self.recorded.reject_edits.load(Ordering::SeqCst);
        Ok(ApplyWorkspaceEditResponse {
            applied,
            failure_reason: (!applied).then(|| "document changed".to_string()),
            failed_change: None,
        })
    }

    async fn configuration(&self, items: Vec<ConfigurationItem>) -> jsonrpc::Result<Vec<Value>> {
        self.recorded.configuration_calls.fetch_add(1, Ordering::SeqCst);
        if self.recorded.yield_in_configuration.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        if self.recorded.fail_configuration.load(Ordering::SeqCst) {
            return Err(jsonrpc::Error::internal_error());
        }
        let value = self.recorded.configuration.lock().unwrap().clone();
        let answers = items.iter().map(|_| value.clone()).collect();
        self.recorded
            .configuration_requests
            .lock()
            .unwrap()
            .extend(items);
        Ok(answers)
    }

    async fn register_capability(&self, registrations: Vec<Registration>) -> jsonrpc::Result<()> {
        self.recorded
            .registrations
            .lock()
            .unwrap()
            .extend(registrations);
        Ok(())
    }

    async fn log_message(&self, _: MessageType, message: String) {
        self.recorded.logs.lock().unwrap().push(message);
    }
}
