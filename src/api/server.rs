//! Review API server lifecycle: starts/stops the axum HTTP server
//! that the review renderer talks to.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::api::router::review_api_router;
use crate::core_state::CoreState;

/// Session metadata for a running review API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewApiSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running review API server.
pub struct ReviewApiServer {
    pub session: ReviewApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ReviewApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Review API server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Review API server task failed: {e}");
            }
        }
    }
}

/// Start the review API server on the configured address.
pub async fn start_review_api_server(
    core: Arc<CoreState>,
) -> Result<ReviewApiServer, String> {
    let addr = core.config.bind_addr;
    start_review_api_server_on(core, addr).await
}

/// Start the review API server on `addr`. Port 0 picks an ephemeral port.
pub async fn start_review_api_server_on(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ReviewApiServer, String> {
    // 1. Bind
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind review API server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "Review API server binding");

    // 2. Build the router
    let app = review_api_router(core);

    // 3. Create session metadata
    let session = ReviewApiSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    // 4. Set up shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // 5. Spawn server in background task
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Review API server received shutdown signal");
        };

        tracing::info!(%addr, "Review API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Review API server error: {e}");
        }

        tracing::info!("Review API server stopped");
    });

    Ok(ReviewApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
