use std::sync::Arc;

use clap::Parser;
use tower_lsp::LspService;
use tower_lsp::Server;

use repletion::Backend;
use repletion::session::SessionRegistry;

/// REPL-backed completion language server, speaking LSP over stdio.
#[derive(Parser)]
#[command(name = "repletion", version, about)]
struct Args {
    /// Log filter directive, e.g. "info" or "repletion=debug".
    /// Overridden by RUST_LOG when set.
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // stdout carries the LSP stream, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    let sessions = Arc::new(SessionRegistry::new());

    let (service, socket) = LspService::new(move |client| Backend::new(client, sessions.clone()));
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
}
