//! Local web UI. Axum server for the analysis form and report dashboard.
//!
//! Implements `InputPort`: the browser form is the input collector.

pub mod form;
pub mod handlers;
pub mod state;
pub mod views;

pub use state::WebState;

use crate::domain::DomainError;
use crate::ports::InputPort;
use async_trait::async_trait;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Room for the text fields and multipart framing on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the application router.
///
/// The image part is capped at `max_upload_bytes` while the form is read; the
/// body limit only guards against requests far beyond that.
pub fn create_router(state: WebState, max_upload_bytes: usize) -> Router {
    let state = WebState {
        max_image_bytes: max_upload_bytes,
        ..state
    };
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Web adapter. Serves the form until Ctrl+C.
pub struct WebUi {
    state: WebState,
    bind_addr: String,
    max_upload_bytes: usize,
}

impl WebUi {
    pub fn new(state: WebState, bind_addr: String, max_upload_bytes: usize) -> Self {
        Self {
            state,
            bind_addr,
            max_upload_bytes,
        }
    }
}

#[async_trait]
impl InputPort for WebUi {
    async fn run(&self) -> Result<(), DomainError> {
        let app = create_router(self.state.clone(), self.max_upload_bytes);

        let listener = tokio::net::TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| DomainError::Ui(format!("bind {}: {}", self.bind_addr, e)))?;
        info!(addr = %self.bind_addr, "Web UI listening on http://{}", self.bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DomainError::Ui(e.to_string()))
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        // no signal handler available: serve until the process is killed
        Err(_) => std::future::pending::<()>().await,
    }
}
