//! WebSocket client session management.

use std::fmt::Display;

use chrono::Local;
use futures_util::{Sink, SinkExt, StreamExt, stream::SplitStream};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, protocol::Message},
};
use url::Url;

use crate::{dto::ChatMessageDto, error::ClientError};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Build the join URL, e.g. `ws://127.0.0.1:8080/ws?room=lobby&user=alice`.
///
/// Room and user names are percent-encoded.
pub fn join_url(url: &str, room: &str, user: &str) -> Result<String, ClientError> {
    let mut url = Url::parse(url)?;
    url.query_pairs_mut()
        .append_pair("room", room)
        .append_pair("user", user);
    Ok(url.into())
}

/// Perform the WebSocket handshake.
pub async fn connect(join_url: &str) -> Result<WsStream, ClientError> {
    match connect_async(join_url).await {
        Ok((ws_stream, _response)) => Ok(ws_stream),
        Err(tungstenite::Error::Http(response)) => {
            Err(ClientError::Rejected(response.status().as_u16()))
        }
        Err(e) => Err(ClientError::ConnectionError(e.to_string())),
    }
}

/// Run one session on an established connection.
///
/// Lines are taken from `input`, which outlives the session so nothing typed
/// between reconnects is lost. Returns `Ok(())` when the input ends
/// (Ctrl+C / Ctrl+D) and an error when the connection drops.
pub async fn run_client_session(
    ws_stream: WsStream,
    room: &str,
    user: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}' in room '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        user, room
    );

    let (mut write, read) = ws_stream.split();
    let mut read_task = tokio::spawn(print_incoming(read, user.to_string()));

    // If either side finishes, the session is over
    let connection_lost = tokio::select! {
        read_result = &mut read_task => read_result.unwrap_or(true),
        write_lost = forward_input(&mut write, input, user) => {
            read_task.abort();
            write_lost
        }
    };

    if connection_lost {
        return Err(ClientError::ConnectionError("Connection lost".to_string()));
    }

    Ok(())
}

/// Print every chat message until the connection ends. Always reports a lost connection.
async fn print_incoming(mut read: SplitStream<WsStream>, user: String) -> bool {
    while let Some(message) = read.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Binary(data)) => String::from_utf8_lossy(&data).into_owned(),
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                return true;
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                return true;
            }
            _ => continue,
        };

        let formatted = match serde_json::from_str::<ChatMessageDto>(&text) {
            Ok(chat) => MessageFormatter::format_chat_message(&chat.user, &chat.text, &Local::now()),
            Err(_) => MessageFormatter::format_raw_message(&text),
        };
        print!("\r{}\n", formatted);
        redisplay_prompt(&user);
    }

    true
}

/// Send each input line as a chat message.
///
/// Returns true if the connection failed, false once the input ends.
async fn forward_input<S>(
    write: &mut S,
    input: &mut mpsc::UnboundedReceiver<String>,
    user: &str,
) -> bool
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(line) = input.recv().await {
        let msg = ChatMessageDto {
            user: user.to_string(),
            text: line,
        };

        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
                continue;
            }
        };

        if let Err(e) = write.send(Message::Text(json.into())).await {
            tracing::warn!("Failed to send message: {}", e);
            return true;
        }
    }

    let _ = write.close().await;
    false
}
