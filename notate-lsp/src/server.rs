//! Main language server implementation

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::error::ServerError;
use crate::features::completion::{apply_detail, candidate_id, to_lsp_completion_item};
use crate::features::diagnostics::to_lsp_diagnostic;
use crate::features::substitution::workspace_edit;
use lsp_types::notification::{DidChangeConfiguration, Notification};
use notate::completion::{self, CompletionCandidate, CompletionDetail};
use notate::{Finding, Settings, SettingsCache, Substitution, SymbolTable, ValidationOptions};
use notate_config::NotateConfig;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::{self, Result};
use tower_lsp::lsp_types::{
    ApplyWorkspaceEditResponse, CompletionItem, CompletionOptions, CompletionParams,
    CompletionResponse, ConfigurationItem, Diagnostic, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidChangeWatchedFilesParams, DidChangeWorkspaceFoldersParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, InitializeParams,
    InitializeResult, InitializedParams, MessageType, OneOf, Registration, ServerCapabilities,
    ServerInfo, TextDocumentItem, TextDocumentSyncCapability, TextDocumentSyncKind, Url,
    WorkspaceEdit, WorkspaceFoldersServerCapabilities, WorkspaceServerCapabilities,
};
use tower_lsp::Client;
use tracing::{debug, info, warn};

/// Outbound half of the connection, abstracted so tests can record traffic.
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(&self, uri: Url, diags: Vec<Diagnostic>, version: Option<i32>);
    async fn apply_edit(&self, edit: WorkspaceEdit) -> Result<ApplyWorkspaceEditResponse>;
    async fn configuration(&self, items: Vec<ConfigurationItem>) -> Result<Vec<Value>>;
    async fn register_capability(&self, registrations: Vec<Registration>) -> Result<()>;
    async fn log_message(&self, typ: MessageType, message: String);
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(&self, uri: Url, diags: Vec<Diagnostic>, version: Option<i32>) {
        self.publish_diagnostics(uri, diags, version).await;
    }

    async fn apply_edit(&self, edit: WorkspaceEdit) -> Result<ApplyWorkspaceEditResponse> {
        self.apply_edit(edit).await
    }

    async fn configuration(&self, items: Vec<ConfigurationItem>) -> Result<Vec<Value>> {
        self.configuration(items).await
    }

    async fn register_capability(&self, registrations: Vec<Registration>) -> Result<()> {
        self.register_capability(registrations).await
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        self.log_message(typ, message).await;
    }
}

pub trait FeatureProvider: Send + Sync + 'static {
    fn substitute(&self, text: &str) -> Option<Substitution>;
    fn validate(&self, text: &str, settings: &Settings, options: &ValidationOptions)
        -> Vec<Finding>;
    fn completion_candidates(&self) -> Vec<CompletionCandidate>;
    fn resolve_completion(&self, id: u64) -> Option<CompletionDetail>;
}

pub struct DefaultFeatureProvider {
    symbols: &'static SymbolTable,
}

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::standard(),
        }
    }
}

impl Default for DefaultFeatureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn substitute(&self, text: &str) -> Option<Substitution> {
        notate::scan_and_substitute(text, self.symbols)
    }

    fn validate(
        &self,
        text: &str,
        settings: &Settings,
        options: &ValidationOptions,
    ) -> Vec<Finding> {
        notate::validate(text, settings, options)
    }

    fn completion_candidates(&self) -> Vec<CompletionCandidate> {
        completion::completion_candidates()
    }

    fn resolve_completion(&self, id: u64) -> Option<CompletionDetail> {
        completion::resolve_candidate(id)
    }
}

/// What the client said it supports during `initialize`. Fixed for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientCapabilitySet {
    /// `workspace/configuration` requests can be scoped to a document.
    pub configuration: bool,
    pub workspace_folders: bool,
    /// Diagnostics may carry `relatedInformation`.
    pub related_information: bool,
}

impl ClientCapabilitySet {
    pub fn from_params(params: &InitializeParams) -> Self {
        let workspace = params.capabilities.workspace.as_ref();
        let related_information = params
            .capabilities
            .text_document
            .as_ref()
            .and_then(|text_document| text_document.publish_diagnostics.as_ref())
            .and_then(|publish| publish.related_information)
            .unwrap_or(false);
        Self {
            configuration: workspace
                .and_then(|workspace| workspace.configuration)
                .unwrap_or(false),
            workspace_folders: workspace
                .and_then(|workspace| workspace.workspace_folders)
                .unwrap_or(false),
            related_information,
        }
    }
}

/// Text of an open document as of its latest change notification.
#[derive(Debug, Clone)]
struct DocumentSnapshot {
    text: Arc<String>,
    version: i32,
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, DocumentSnapshot>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, text: String, version: i32) -> DocumentSnapshot {
        let snapshot = DocumentSnapshot {
            text: Arc::new(text),
            version,
        };
        self.entries.write().await.insert(uri, snapshot.clone());
        snapshot
    }

    async fn all(&self) -> Vec<(Url, DocumentSnapshot)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(uri, snapshot)| (uri.clone(), snapshot.clone()))
            .collect()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }

    async fn contains(&self, uri: &Url) -> bool {
        self.entries.read().await.contains_key(uri)
    }
}

pub struct NotateLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: DocumentStore,
    features: Arc<P>,
    config: NotateConfig,
    capabilities: OnceLock<ClientCapabilitySet>,
    settings: OnceLock<SettingsCache>,
}

impl NotateLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, config: NotateConfig) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()), config)
    }
}

impl<C, P> NotateLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>, config: NotateConfig) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            features,
            config,
            capabilities: OnceLock::new(),
            settings: OnceLock::new(),
        }
    }

    fn client_capabilities(&self) -> ClientCapabilitySet {
        self.capabilities.get().copied().unwrap_or_default()
    }

    fn default_settings(&self) -> Settings {
        Settings {
            max_number_of_problems: self.config.diagnostics.max_number_of_problems,
        }
    }

    /// The settings cache, in global mode if `initialize` has not run yet.
    fn settings_cache(&self) -> &SettingsCache {
        self.settings.get_or_init(|| {
            SettingsCache::new(
                self.client_capabilities().configuration,
                self.default_settings(),
            )
        })
    }

    fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            related_information: self.client_capabilities().related_information,
            source: self.config.diagnostics.source.clone(),
        }
    }

    async fn document_settings(&self, uri: &Url) -> std::result::Result<Settings, ServerError> {
        let defaults = self.default_settings();
        self.settings_cache()
            .resolve(uri.as_str(), || async {
                debug!(%uri, "fetching document settings");
                let items = vec![ConfigurationItem {
                    scope_uri: Some(uri.clone()),
                    section: Some(self.config.server.settings_section.clone()),
                }];
                let values = self
                    .client
                    .configuration(items)
                    .await
                    .map_err(ServerError::ConfigurationRequest)?;
                let value = values
                    .into_iter()
                    .next()
                    .ok_or(ServerError::MissingConfiguration)?;
                Ok::<_, ServerError>(Settings::from_value(&value, &defaults)?)
            })
            .await
    }

    async fn on_content_change(&self, uri: Url, text: String, version: i32) {
        let snapshot = self.documents.upsert(uri.clone(), text, version).await;
        tokio::join!(
            self.convert_document(&uri, &snapshot),
            self.validate_document(&uri, &snapshot)
        );
    }

    async fn convert_document(&self, uri: &Url, snapshot: &DocumentSnapshot) {
        if let Err(error) = self.try_convert_document(uri, snapshot).await {
            warn!(%uri, %error, "substitution pass dropped");
        }
    }

    async fn try_convert_document(
        &self,
        uri: &Url,
        snapshot: &DocumentSnapshot,
    ) -> std::result::Result<(), ServerError> {
        let Some(substitution) = self.features.substitute(&snapshot.text) else {
            return Ok(());
        };
        debug!(
            %uri,
            mnemonic = substitution.mnemonic,
            range = %substitution.range,
            "requesting substitution"
        );
        let edit = workspace_edit(uri, &substitution);
        let response = self
            .client
            .apply_edit(edit)
            .await
            .map_err(ServerError::ApplyEdit)?;
        debug!(%uri, ?response, "workspace edit acknowledged");
        if response.applied {
            Ok(())
        } else {
            Err(ServerError::EditRejected(response.failure_reason))
        }
    }

    async fn validate_document(&self, uri: &Url, snapshot: &DocumentSnapshot) {
        if let Err(error) = self.try_validate_document(uri, snapshot).await {
            warn!(%uri, %error, "validation pass dropped");
        }
    }

    async fn try_validate_document(
        &self,
        uri: &Url,
        snapshot: &DocumentSnapshot,
    ) -> std::result::Result<(), ServerError> {
        if !self.documents.contains(uri).await {
            debug!(%uri, "document closed; skipping validation");
            return Ok(());
        }
        let settings = self.document_settings(uri).await?;
        // closed while the settings were in flight
        if !self.documents.contains(uri).await {
            self.settings_cache().remove(uri.as_str()).await;
            debug!(%uri, "document closed; skipping validation");
            return Ok(());
        }
        let findings =
            self.features
                .validate(&snapshot.text, &settings, &self.validation_options());
        debug!(%uri, count = findings.len(), "publishing diagnostics");
        let diagnostics = findings
            .iter()
            .map(|finding| to_lsp_diagnostic(uri, finding))
            .collect();
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(snapshot.version))
            .await;
        Ok(())
    }

    async fn revalidate_all(&self) {
        for (uri, snapshot) in self.documents.all().await {
            self.validate_document(&uri, &snapshot).await;
        }
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for NotateLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ClientCapabilitySet::from_params(&params);
        info!(?capabilities, "client capabilities negotiated");
        if self.capabilities.set(capabilities).is_err() {
            warn!("initialize received more than once; keeping the first capability set");
        }
        let cache = SettingsCache::new(capabilities.configuration, self.default_settings());
        if self.settings.set(cache).is_err() {
            warn!("settings cache already in use; keeping its mode");
        }

        let mut server_capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            completion_provider: Some(CompletionOptions {
                resolve_provider: Some(true),
                ..Default::default()
            }),
            ..ServerCapabilities::default()
        };
        if capabilities.workspace_folders {
            server_capabilities.workspace = Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            });
        }

        Ok(InitializeResult {
            capabilities: server_capabilities,
            server_info: Some(ServerInfo {
                name: "notate-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if !self.client_capabilities().configuration {
            return;
        }
        let registration = Registration {
            id: "notate.didChangeConfiguration".to_string(),
            method: DidChangeConfiguration::METHOD.to_string(),
            register_options: None,
        };
        if let Err(error) = self.client.register_capability(vec![registration]).await {
            warn!(%error, "could not register for configuration changes");
        }
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        self.on_content_change(uri, text, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            let document = params.text_document;
            self.on_content_change(document.uri, change.text, document.version)
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri).await;
        self.settings_cache().remove(uri.as_str()).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let cache = self.settings_cache();
        if cache.is_scoped() {
            cache.clear().await;
        } else {
            let section = params
                .settings
                .get(&self.config.server.settings_section)
                .unwrap_or(&Value::Null);
            match Settings::from_value(section, &self.default_settings()) {
                Ok(settings) => cache.set_global(settings).await,
                Err(error) => warn!(%error, "ignoring global settings update"),
            }
        }
        self.revalidate_all().await;
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        info!(
            added = params.event.added.len(),
            removed = params.event.removed.len(),
            "workspace folders changed"
        );
        self.client
            .log_message(
                MessageType::LOG,
                "Workspace folder change event received.".to_string(),
            )
            .await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        info!(changes = params.changes.len(), "watched files changed");
        self.client
            .log_message(
                MessageType::LOG,
                "We received an file change event".to_string(),
            )
            .await;
    }

    async fn completion(&self, _: CompletionParams) -> Result<Option<CompletionResponse>> {
        let items = self
            .features
            .completion_candidates()
            .iter()
            .map(to_lsp_completion_item)
            .collect();
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> jsonrpc::Result<CompletionItem> {
        let detail = candidate_id(&item).and_then(|id| self.features.resolve_completion(id));
        Ok(match detail {
            Some(detail) => apply_detail(item, &detail),
            None => item,
        })
    }
}
