//! ML Frontend server.
//!
//! Loads configuration from the environment, wires the model API client,
//! session store and renderer into the axum router, and serves until Ctrl-C
//! or SIGTERM.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{fmt, EnvFilter};

use ml_frontend::adapters::http::{build_router, AppState, FrontendSettings};
use ml_frontend::adapters::storage::spawn_session_sweeper;
use ml_frontend::adapters::{HtmlRenderer, HttpMlBackend, InMemorySessionStore};
use ml_frontend::config::AppConfig;
use ml_frontend::ports::SessionStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    init_tracing(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        let _ = fmt().json().with_env_filter(filter).try_init();
    } else {
        let _ = fmt().with_env_filter(filter).with_target(false).try_init();
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    let backend =
        HttpMlBackend::new(&config.backend)?.with_upload_limit(config.upload.max_file_bytes);
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let sweeper = spawn_session_sweeper(sessions.clone(), config.session.sweep_interval());

    let state = AppState::new(
        Arc::new(backend),
        sessions,
        Arc::new(HtmlRenderer::new()),
        FrontendSettings::from_config(&config),
    );
    let app = build_router(state);

    let addr = config.server.resolve().await?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        backend = %config.backend.base_url,
        environment = ?config.server.environment,
        "ML frontend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("ML frontend stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
