//! WebSocket connection halves.
//!
//! An upgraded socket is split once: the sink goes to the room's broadcast
//! loop, the stream to the member's ingress loop.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::{
    domain::{ChatMessage, MemberError, MessageSink, MessageSource},
    infrastructure::dto::conversion::{decode_chat_message, encode_chat_message},
};

pub fn split_socket(socket: WebSocket) -> (WebSocketSink, WebSocketSource) {
    let (sink, stream) = socket.split();
    (WebSocketSink { sink }, WebSocketSource { stream })
}

/// Write half of a member's WebSocket.
pub struct WebSocketSink {
    sink: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl MessageSink for WebSocketSink {
    async fn send(&mut self, message: &ChatMessage) -> Result<(), MemberError> {
        let json =
            encode_chat_message(message).map_err(|e| MemberError::Transport(e.to_string()))?;
        self.sink
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| MemberError::Transport(e.to_string()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.sink.send(Message::Close(None)).await {
            tracing::debug!("Failed to send close frame: {}", e);
        }
        let _ = self.sink.close().await;
    }
}

/// Read half of a member's WebSocket.
pub struct WebSocketSource {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl MessageSource for WebSocketSource {
    async fn receive(&mut self) -> Result<ChatMessage, MemberError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return decode_chat_message(text.as_bytes()),
                Some(Ok(Message::Binary(data))) => return decode_chat_message(&data),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    // Pong replies are handled by the WebSocket protocol layer
                    tracing::trace!("Received ping/pong");
                }
                Some(Ok(Message::Close(_))) | None => return Err(MemberError::Closed),
                Some(Err(e)) => return Err(MemberError::Transport(e.to_string())),
            }
        }
    }
}
