//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{ReconnectAttempts, should_exit_immediately},
    error::ClientError,
    session::{connect, join_url, run_client_session},
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client, reconnecting when the connection drops.
///
/// One terminal reader serves every session. The retry budget is reset each
/// time a handshake succeeds.
///
/// # Errors
///
/// Returns [`ClientError::Rejected`] or [`ClientError::InvalidUrl`] without
/// retrying, or the last connection error once every attempt has failed.
pub async fn run_client(url: String, room: String, user: String) -> Result<(), ClientError> {
    let join_url = join_url(&url, &room, &user)?;
    let mut input = spawn_line_reader(format!("{}> ", user));
    let mut attempts = ReconnectAttempts::new(MAX_RECONNECT_ATTEMPTS);

    loop {
        tracing::info!(
            "Attempting to connect to {} room '{}' as '{}' (attempt {}/{})",
            url,
            room,
            user,
            attempts.failed() + 1,
            attempts.max()
        );

        let result = match connect(&join_url).await {
            Ok(ws_stream) => {
                attempts.connected();
                run_client_session(ws_stream, &room, &user, &mut input).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) if should_exit_immediately(&e) => {
                tracing::error!("{}. Exiting.", e);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);

                if !attempts.record_failure(&e) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        attempts.max()
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    attempts.failed() + 1,
                    attempts.max()
                );
                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
