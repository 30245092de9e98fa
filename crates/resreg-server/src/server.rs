use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use resreg_store::ResumeStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Résumé registry HTTP server.
pub struct ResumeRegistryServer {
    config: ServerConfig,
    state: AppState,
}

impl ResumeRegistryServer {
    pub fn new(config: ServerConfig, store: Arc<dyn ResumeStore>) -> Self {
        Self {
            config,
            state: AppState::new(store),
        }
    }

    /// A server over a fresh in-memory store.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self {
            config,
            state: AppState::in_memory(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_with_listener<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let app = self.router();
        tracing::info!("resume registry listening on {addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("resume registry stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
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
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use resreg_store::{Bytes, InMemoryResumeStore};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn router_reads_the_given_store() {
        let store = Arc::new(InMemoryResumeStore::new());
        store.submit("shared@example.com", Bytes::from_static(b"cv"));

        let server = ResumeRegistryServer::new(ServerConfig::default(), store);
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/resume/current?email=shared%40example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"cv");
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = ResumeRegistryServer::in_memory(ServerConfig::default());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve_with_listener(listener, async move {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
