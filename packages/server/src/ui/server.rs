//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{domain::Registry, usecase::JoinRoomUseCase};

use super::{
    error::ServerError,
    handler::{health_check, home_page, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(Registry::new(RoomConfig::default()));
/// let server = Server::new(registry);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// Registry（ルーム名 → ルーム、起動時に生成しプロセス終了まで保持）
    registry: Arc<Registry>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
}

impl Server {
    pub fn new(registry: Arc<Registry>) -> Self {
        let join_room_usecase = Arc::new(JoinRoomUseCase::new(registry.clone()));
        Self {
            registry,
            join_room_usecase,
        }
    }

    /// Build the application router.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase.clone(),
        });

        Router::new()
            // HTTP エンドポイント
            .route("/", get(home_page))
            .route("/api/health", get(health_check))
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind `host:port` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the listener cannot be bound, or
    /// [`ServerError::Serve`] if the server stops with an I/O error.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws?room=<room>&user=<name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves, then stop every room.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        self.registry.close_all().await;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
