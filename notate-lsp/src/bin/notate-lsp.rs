use clap::Parser;
use notate_config::{ConfigError, Loader, NotateConfig};
use notate_lsp::NotateLanguageServer;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NOTATE_LOG";
const DEFAULT_FILTER: &str = "notate=info,notate_lsp=info";

#[derive(Debug, Parser)]
#[command(name = "notate-lsp", version, about = "Notation substitution language server")]
struct Args {
    /// Talk LSP over stdin/stdout (the only transport; accepted for client compatibility)
    #[arg(long)]
    stdio: bool,

    /// Process id of the editor that launched the server
    #[arg(long = "clientProcessId", value_name = "PID")]
    client_process_id: Option<u32>,

    /// TOML file layered over the built-in defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `notate_lsp=trace` (overrides NOTATE_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<NotateConfig, ConfigError> {
    let loader = Loader::new();
    match path {
        Some(path) => loader.with_file(path).build(),
        None => loader.build(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error loading configuration: {error}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        stdio = args.stdio,
        client_process_id = ?args.client_process_id,
        section = %config.server.settings_section,
        "starting notate-lsp"
    );

    let (service, socket) = LspService::new(|client| NotateLanguageServer::new(client, config));
    Server::new(stdin(), stdout(), socket).serve(service).await;
    ExitCode::SUCCESS
}
