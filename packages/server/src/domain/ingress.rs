//! Ingress loop: drains one member's inbound messages into its room.

use super::{MemberSummary, MessageSource, Room, RoomError};

/// Receive from `source` until it fails, enqueueing every message into `room`.
///
/// Messages are re-attributed to the member's display name. On the first
/// receive failure the member leaves the room and the loop ends for good. A
/// full queue drops only the message at hand.
pub(crate) async fn run_ingress(
    room: Room,
    member: MemberSummary,
    mut source: Box<dyn MessageSource>,
) {
    loop {
        let message = match source.receive().await {
            Ok(message) => message.with_sender(member.name.as_str()),
            Err(e) => {
                tracing::info!(
                    room = %room.name(),
                    member = %member.name,
                    "Receive failed, removing member: {}",
                    e
                );
                let _ = room.leave(member.id);
                break;
            }
        };

        tracing::debug!(room = %room.name(), member = %member.name, "Received message");

        match room.enqueue(member.id, message).await {
            Ok(()) => {}
            Err(RoomError::QueueFull) => {
                tracing::warn!(
                    room = %room.name(),
                    member = %member.name,
                    "Room queue is full, dropping message"
                );
            }
            Err(RoomError::Closed) => {
                tracing::debug!(room = %room.name(), member = %member.name, "Room closed");
                break;
            }
        }
    }
}
