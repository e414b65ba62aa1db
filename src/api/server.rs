//! HTTP server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.
//! The binary instead runs `serve_until_ctrl_c` in the foreground.

use std::net::SocketAddr;

use axum::Router;
use serde::Serialize;
use tokio::sync::oneshot;

/// Metadata for a running server.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSession {
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a server running in a background task.
pub struct ApiServer {
    pub session: ApiSession,
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

async fn bind(addr: SocketAddr) -> Result<(tokio::net::TcpListener, SocketAddr), String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server on {addr}: {e}"))?;
    let local = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;
    Ok((listener, local))
}

/// Start serving `app` on `addr` in a background tokio task.
///
/// Port 0 binds an ephemeral port; the bound address is in the returned
/// handle.
pub async fn start_api_server(app: Router, addr: SocketAddr) -> Result<ApiServer, String> {
    let (listener, addr) = bind(addr).await?;

    let session = ApiSession {
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Serve `app` on `addr` until Ctrl-C.
pub async fn serve_until_ctrl_c(app: Router, addr: SocketAddr) -> Result<(), String> {
    let (listener, addr) = bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {e}");
            }
            tracing::info!("Shutting down");
        })
        .await
        .map_err(|e| format!("API server error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use crate::api::router::api_router;
    use crate::core_state::CoreState;
    use crate::summarization::SummarizationGateway;

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_router(dir: &tempfile::TempDir) -> Router {
        let core = CoreState::initialize(
            dir.path().join("emr.db"),
            SummarizationGateway::unconfigured(),
        )
        .unwrap();
        api_router(Arc::new(core), &[])
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_api_server(test_router(&dir), loopback())
            .await
            .expect("server should start");

        assert!(server.session.port > 0);
        assert_eq!(server.session.server_addr, server.local_addr().to_string());

        server.shutdown();
    }

    #[tokio::test]
    async fn serves_root_and_api_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_api_server(test_router(&dir), loopback())
            .await
            .unwrap();
        let base = format!("http://{}", server.local_addr());
        let client = reqwest::Client::new();

        let root = client.get(format!("{base}/")).send().await.unwrap();
        assert_eq!(root.status(), 200);
        assert_eq!(root.text().await.unwrap(), "Backend is running!");

        let created = client
            .post(format!("{base}/api/patients"))
            .json(&serde_json::json!({"name": "Jane Doe", "dob": "1990-01-01"}))
            .send()
            .await
            .unwrap();
        assert_eq!(created.status(), 201);

        let missing = client
            .get(format!("{base}/api/unknown"))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), 404);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_api_server(test_router(&dir), loopback())
            .await
            .unwrap();

        server.shutdown();
        server.shutdown();
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = start_api_server(test_router(&dir), loopback())
            .await
            .unwrap();

        let err = start_api_server(test_router(&dir), first.local_addr())
            .await
            .err()
            .unwrap();
        assert!(err.contains("Failed to bind"));

        first.shutdown();
    }
}
