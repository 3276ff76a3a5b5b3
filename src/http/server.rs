//! Echo responder.
//!
//! # Responsibilities
//! - Answer every method and path with the request body, verbatim
//! - Optionally log the peer of each request
//!
//! The responder is the target other nodes probe; its answer is never
//! validated beyond being a well-formed HTTP response.

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

#[derive(Clone)]
struct EchoState {
    log_requests: bool,
}

/// HTTP server returning whatever it receives.
pub struct EchoServer {
    router: Router,
}

impl EchoServer {
    pub fn new(config: &ServerConfig) -> Self {
        let state = EchoState {
            log_requests: config.log_requests,
        };

        let router = Router::new()
            .route("/{*path}", any(echo))
            .route("/", any(echo))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Serve on `listener` until the process exits.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Echo server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await?;

        tracing::info!("Echo server stopped");
        Ok(())
    }
}

async fn echo(
    State(state): State<EchoState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Bytes {
    if state.log_requests {
        tracing::info!(peer = %peer, "server: processing request");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_echo(config: ServerConfig) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = EchoServer::new(&config);
        tokio::spawn(async move {
            let _ = server.run(listener).await;
        });
        addr
    }

    #[tokio::test]
    async fn test_echoes_body_on_any_path() {
        let addr = spawn_echo(ServerConfig::default()).await;
        let client = reqwest::Client::builder().no_proxy().build().unwrap();

        let res = client
            .post(format!("http://{}/some/path", addr))
            .body("ping")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), "ping");
    }

    #[tokio::test]
    async fn test_empty_get_returns_empty_body() {
        let addr = spawn_echo(ServerConfig {
            enabled: true,
            log_requests: true,
        })
        .await;
        let client = reqwest::Client::builder().no_proxy().build().unwrap();

        let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
        assert_eq!(res.status(), 200);
        assert!(res.text().await.unwrap().is_empty());
    }
}
