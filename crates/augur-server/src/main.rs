//! Augur server - HTTP inference API for image and audio classifiers.

use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod state;

use augur_core::InferenceService;
use state::AppState;

/// Inference API serving pre-trained classification models.
#[derive(Debug, Parser)]
#[command(name = "augur-server", version, about)]
struct Args {
    /// Directory holding `{name}.onnx` models and `{name}_labels.txt` files.
    #[arg(long, default_value = "models")]
    model_dir: PathBuf,

    /// IP address to bind the API to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the API to.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur_server=info,augur_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // The model directory must exist; operators drop model files in later.
    std::fs::create_dir_all(&args.model_dir)?;
    info!("model directory: {}", args.model_dir.display());

    let service = InferenceService::new(&args.model_dir);
    let state = AppState::new(service);

    let app = api::create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
