//! HTTP API for the Inkwell blog.
//!
//! # Responsibility
//! - Expose the article listing and catalog CRUD as JSON over axum.
//! - Own process-level concerns: binding, CORS and graceful shutdown.

pub mod config;
pub mod error;
mod routes;
pub mod state;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::Router;
use inkwell_core::db::open_db;
use log::{info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ServerError};
pub use state::AppState;

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    routes::api_routes().layer(cors).with_state(state)
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!("event=server_start module=server status=ok addr={addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

/// Opens the configured database, binds and serves until Ctrl+C/SIGTERM.
pub async fn run(config: &ServerConfig) -> Result<(), ServerError> {
    let state = AppState::try_new(open_db(&config.db_path)?)?;
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve(listener, state, shutdown_signal()).await
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
        info!("event=shutdown_signal module=server status=ok signal=ctrl_c");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=server status=ok signal=terminate");
            }
            Err(err) => {
                warn!(
                    "event=signal_install module=server status=error signal=terminate error={err}"
                );
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
}
