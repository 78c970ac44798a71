use notate::SettingsError;
use thiserror::Error;
use tower_lsp::jsonrpc;

/// Failure of a single substitution or validation pass.
///
/// Passes are never retried; the handler logs the error and the next change event
/// starts a fresh pass.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("configuration request failed: {0}")]
    ConfigurationRequest(jsonrpc::Error),
    #[error("client returned no value for the requested configuration section")]
    MissingConfiguration,
    #[error("workspace edit request failed: {0}")]
    ApplyEdit(jsonrpc::Error),
    #[error("client rejected workspace edit: {}", .0.as_deref().unwrap_or("no reason given"))]
    EditRejected(Option<String>),
}
