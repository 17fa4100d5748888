//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        rejection::QueryRejection,
        ws::{WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    infrastructure::connection::split_socket,
    ui::state::AppState,
    usecase::JoinRequest,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    pub room: Option<String>,
    pub user: Option<String>,
}

/// `GET /ws?room=<name>&user=<name>`
///
/// Parameters are validated before the upgrade headers, so a bad request is
/// rejected with 400 even when it is not a WebSocket handshake.
pub async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<JoinQuery>, QueryRejection>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let request = match query
        .map_err(|e| e.body_text())
        .and_then(|Query(query)| {
            JoinRequest::new(query.room, query.user).map_err(|e| e.to_string())
        }) {
        Ok(request) => request,
        Err(reason) => {
            tracing::warn!("Rejecting connection request: {}", reason);
            return (StatusCode::BAD_REQUEST, "Invalid Request Parameters").into_response();
        }
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!("Rejecting non-WebSocket request: {}", rejection.body_text());
            return rejection.into_response();
        }
    };

    tracing::info!(
        room = request.room(),
        user = request.user(),
        "New connection request"
    );
    ws.on_upgrade(move |socket| handle_socket(socket, state, request))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, request: JoinRequest) {
    let (sink, source) = split_socket(socket);
    let room = request.room().to_string();
    let user = request.user().to_string();

    match state
        .join_room_usecase
        .execute(request, Box::new(sink), Box::new(source))
        .await
    {
        Ok(member_id) => {
            tracing::info!(%room, %user, %member_id, "Client successfully connected");
        }
        Err(e) => {
            tracing::warn!(%room, %user, "Failed to join room: {}", e);
        }
    }
}
