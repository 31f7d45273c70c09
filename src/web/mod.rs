//! Browser front end.
//!
//! A small axum application: the form page, the conversion endpoint that
//! renders results inline, and per-run download and preview endpoints.
//!
//! ```text
//! GET  /                                  idle page
//! POST /convert                           run, then render results or error
//! GET  /runs/{run_id}/preview             stylesheet-inlined markup (sandboxed)
//! GET  /runs/{run_id}/download/{artifact} markup | stylesheet as attachment
//! ```
//!
//! The conversion itself runs inside the request future. If the browser
//! disconnects, axum drops that future and the converter child is killed.

pub mod handlers;
pub mod page;
pub mod store;

use crate::convert::Converter;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use store::RunStore;
use tracing::info;

/// Settings for the HTTP side of the application.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on. Default: `127.0.0.1:8501`.
    pub bind: SocketAddr,
    /// Completed runs kept for download/preview. Default: 16.
    pub history: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            history: 16,
        }
    }
}

/// Shared state handed to every handler.
pub struct AppState {
    pub converter: Converter,
    pub runs: RunStore,
}

impl AppState {
    pub fn new(converter: Converter, history: usize) -> Self {
        Self {
            converter,
            runs: RunStore::new(history),
        }
    }
}

/// Build the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/convert", post(handlers::convert))
        .route("/runs/{run_id}/preview", get(handlers::preview))
        .route("/runs/{run_id}/download/{artifact}", get(handlers::download))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, converter: Converter) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(converter, config.history));
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}
